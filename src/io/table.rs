//! Two-column table ingest.
//!
//! The table is delimited text with no header row: column 0 is x, column 1
//! is y. Every record must have exactly two fields. Shape is checked for the
//! whole file before any cell is parsed, so a malformed table is always
//! reported as a format error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::DataSet;
use crate::error::AppError;

pub const DEFAULT_DELIMITER: u8 = b',';

const TWO_COLUMNS: &str = "The CSV file must contain exactly two columns.";

/// Load a two-column table from disk.
pub fn load_table(path: &Path, delimiter: u8) -> Result<DataSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open table '{}': {e}", path.display())))?;
    let data = read_table(file, delimiter)?;
    info!(path = %path.display(), n = data.len(), "table loaded");
    Ok(data)
}

/// Parse a two-column table from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<DataSet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records: Vec<(u64, StringRecord)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AppError::parse(format!("CSV parse error: {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 2 {
            debug!(line, fields = record.len(), "record has wrong field count");
            return Err(AppError::format(TWO_COLUMNS));
        }
        records.push((line, record));
    }
    if records.is_empty() {
        return Err(AppError::format(TWO_COLUMNS));
    }

    let mut data = DataSet::default();
    for (line, record) in &records {
        let x = parse_field(&record[0], *line, 1)?;
        let y = parse_field(&record[1], *line, 2)?;
        data.push(x, y);
    }
    Ok(data)
}

fn parse_field(raw: &str, line: u64, column: usize) -> Result<f64, AppError> {
    // Spreadsheet exports sometimes prefix the first cell with a BOM.
    let text = raw.trim_start_matches('\u{feff}').trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AppError::parse(format!(
            "Invalid value '{text}' at line {line}, column {column}: expected a finite number."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn reads_headerless_pairs() {
        let data = read_table("1,2\n2, 4\n3,6\n".as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(data.x(), &[1.0, 2.0, 3.0]);
        assert_eq!(data.y(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn honours_custom_delimiter() {
        let data = read_table("1;2.5\n-3;1e2\n".as_bytes(), b';').unwrap();
        assert_eq!(data.x(), &[1.0, -3.0]);
        assert_eq!(data.y(), &[2.5, 100.0]);
    }

    #[test]
    fn three_columns_is_a_format_error() {
        let err = read_table("1,2,3\n4,5,6\n".as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("must contain exactly two columns"));
    }

    #[test]
    fn one_short_row_rejects_the_table() {
        let err = read_table("1,2\n3\n4,5\n".as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn empty_input_is_a_format_error() {
        let err = read_table("".as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn non_numeric_cell_reports_position() {
        let err = read_table("1,2\nx,4\n".as_bytes(), DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().contains("line 2, column 1"), "{}", err.message());
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let data = read_table("\u{feff}1,2\n".as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(data.x(), &[1.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_table(Path::new("/nonexistent/curvefit/table.csv"), b',').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
