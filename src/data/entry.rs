//! Manual data entry table.
//!
//! The table is an ordered list of `(x_text, y_text)` rows as typed by the
//! user. It always ends in exactly one fully blank row that is available for
//! new input; every edit re-establishes that invariant via [`EntryTable::normalize`].
//!
//! Validation is per cell: a cell is valid when it is empty or parses as a
//! finite `f64`. Invalid cells are reported with their 1-based row number and
//! never prevent the other rows from being validated.

use crate::domain::DataSet;
use crate::error::AppError;

/// Which cell of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    X,
    Y,
}

impl Column {
    pub fn label(self) -> &'static str {
        match self {
            Column::X => "X",
            Column::Y => "Y",
        }
    }
}

/// One row of raw user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRow {
    pub x: String,
    pub y: String,
}

impl EntryRow {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::X => &self.x,
            Column::Y => &self.y,
        }
    }

    fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::X => &mut self.x,
            Column::Y => &mut self.y,
        }
    }

    /// Both cells empty (after trimming).
    pub fn is_blank(&self) -> bool {
        self.x.trim().is_empty() && self.y.trim().is_empty()
    }

    /// Both cells non-empty.
    pub fn is_complete(&self) -> bool {
        !self.x.trim().is_empty() && !self.y.trim().is_empty()
    }
}

/// A cell-level parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based row number as shown to the user.
    pub row: usize,
    pub column: Column,
    pub message: String,
}

/// Result of turning the table into numbers.
#[derive(Debug, Clone, Default)]
pub struct EntryReport {
    /// Points from rows where both cells are present and valid.
    pub dataset: DataSet,
    /// Invalid cells, in row order.
    pub errors: Vec<RowError>,
    /// 1-based rows with exactly one filled cell (skipped).
    pub incomplete: Vec<usize>,
}

impl EntryReport {
    /// The first parse error as an `AppError`, if any.
    pub fn first_error(&self) -> Option<AppError> {
        self.errors.first().map(|e| AppError::parse(e.message.clone()))
    }
}

/// Parse one cell: empty → `None`, finite number → `Some`, else an error.
pub fn parse_cell(text: &str) -> Result<Option<f64>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("'{trimmed}' is not a finite number")),
    }
}

/// Growable manual-entry table (always ends in one blank row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTable {
    rows: Vec<EntryRow>,
}

impl Default for EntryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryTable {
    pub fn new() -> Self {
        Self {
            rows: vec![EntryRow::default()],
        }
    }

    /// Build from `(x_text, y_text)` pairs, normalized.
    pub fn from_rows(rows: impl IntoIterator<Item = EntryRow>) -> Self {
        let mut table = Self {
            rows: rows.into_iter().collect(),
        };
        table.normalize();
        table
    }

    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true: the trailing blank row always exists.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace one cell's text. Rows past the end are created as needed.
    pub fn set_cell(&mut self, row: usize, column: Column, text: impl Into<String>) {
        while self.rows.len() <= row {
            self.rows.push(EntryRow::default());
        }
        *self.rows[row].cell_mut(column) = text.into();
        self.normalize();
    }

    /// Append one character to a cell (TUI typing).
    pub fn push_char(&mut self, row: usize, column: Column, c: char) {
        let mut text = self.rows.get(row).map(|r| r.cell(column).to_string()).unwrap_or_default();
        text.push(c);
        self.set_cell(row, column, text);
    }

    /// Remove the last character of a cell (TUI backspace).
    pub fn pop_char(&mut self, row: usize, column: Column) {
        if let Some(r) = self.rows.get(row) {
            let mut text = r.cell(column).to_string();
            text.pop();
            self.set_cell(row, column, text);
        }
    }

    /// Fill the trailing blank row with a new pair.
    pub fn push_row(&mut self, x: impl Into<String>, y: impl Into<String>) {
        let idx = self.rows.len() - 1;
        self.rows[idx] = EntryRow::new(x, y);
        self.normalize();
    }

    /// Delete a row (the trailing blank row is re-created if needed).
    pub fn remove_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
        self.normalize();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.normalize();
    }

    /// Re-establish "exactly one trailing blank row".
    pub fn normalize(&mut self) {
        while self.rows.len() >= 2
            && self.rows[self.rows.len() - 1].is_blank()
            && self.rows[self.rows.len() - 2].is_blank()
        {
            self.rows.pop();
        }
        if self.rows.last().is_none_or(|r| !r.is_blank()) {
            self.rows.push(EntryRow::default());
        }
    }

    /// Validate every cell; errors are reported per row and column.
    pub fn validate(&self) -> Vec<RowError> {
        let mut out = Vec::new();
        for (idx, row) in self.rows.iter().enumerate() {
            for column in [Column::X, Column::Y] {
                if let Err(reason) = parse_cell(row.cell(column)) {
                    out.push(RowError {
                        row: idx + 1,
                        column,
                        message: format!(
                            "Invalid entry in row {} ({}): {reason}. Please use only numeric values.",
                            idx + 1,
                            column.label()
                        ),
                    });
                }
            }
        }
        out
    }

    /// Convert to numbers: complete valid rows become points.
    pub fn to_report(&self) -> EntryReport {
        let mut report = EntryReport {
            errors: self.validate(),
            ..EntryReport::default()
        };

        for (idx, row) in self.rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            if !row.is_complete() {
                report.incomplete.push(idx + 1);
                continue;
            }
            if let (Ok(Some(x)), Ok(Some(y))) = (parse_cell(&row.x), parse_cell(&row.y)) {
                report.dataset.push(x, y);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_single_trailing_blank(table: &EntryTable) {
        let rows = table.rows();
        assert!(rows.last().unwrap().is_blank());
        if rows.len() >= 2 {
            assert!(!rows[rows.len() - 2].is_blank());
        }
    }

    #[test]
    fn starts_with_one_blank_row() {
        let table = EntryTable::new();
        assert_eq!(table.len(), 1);
        assert_single_trailing_blank(&table);
    }

    #[test]
    fn filling_the_last_row_appends_a_blank_one() {
        let mut table = EntryTable::new();
        table.set_cell(0, Column::X, "1");
        assert_eq!(table.len(), 2);
        table.set_cell(0, Column::Y, "2");
        assert_eq!(table.len(), 2);
        table.push_row("3", "4");
        assert_eq!(table.len(), 3);
        assert_single_trailing_blank(&table);
    }

    #[test]
    fn clearing_the_last_filled_row_collapses_blanks() {
        let mut table = EntryTable::new();
        table.push_row("1", "2");
        table.push_row("3", "4");
        table.set_cell(1, Column::X, "");
        table.set_cell(1, Column::Y, "");
        assert_eq!(table.len(), 2);
        assert_single_trailing_blank(&table);
    }

    #[test]
    fn typing_and_backspace_keep_the_invariant() {
        let mut table = EntryTable::new();
        table.push_char(0, Column::X, '4');
        table.push_char(0, Column::X, '2');
        assert_eq!(table.rows()[0].x, "42");
        table.pop_char(0, Column::X);
        table.pop_char(0, Column::X);
        assert_eq!(table.len(), 1);
        assert_single_trailing_blank(&table);
    }

    #[test]
    fn invalid_cell_flags_only_its_row() {
        let table = EntryTable::from_rows([
            EntryRow::new("1", "2"),
            EntryRow::new("abc", "4"),
            EntryRow::new("3", "6"),
        ]);
        let errors = table.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[0].column, Column::X);
        assert!(errors[0].message.contains("row 2"));

        let report = table.to_report();
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.dataset.x(), &[1.0, 3.0]);
        assert_eq!(
            report.first_error().unwrap().kind(),
            crate::error::ErrorKind::Parse
        );
    }

    #[test]
    fn half_filled_rows_are_skipped_and_reported() {
        let table = EntryTable::from_rows([
            EntryRow::new("1", "2"),
            EntryRow::new("", "5"),
            EntryRow::new(" 2.5 ", "1e1"),
        ]);
        let report = table.to_report();
        assert!(report.errors.is_empty());
        assert_eq!(report.incomplete, vec![2]);
        assert_eq!(report.dataset.x(), &[1.0, 2.5]);
        assert_eq!(report.dataset.y(), &[2.0, 10.0]);
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert!(parse_cell("inf").is_err());
        assert!(parse_cell("NaN").is_err());
        assert_eq!(parse_cell("  ").unwrap(), None);
        assert_eq!(parse_cell("-0.5").unwrap(), Some(-0.5));
    }
}
