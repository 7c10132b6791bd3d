//! Shared fit orchestration used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! data acquisition -> request resolution -> guarded fit -> outcome
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use tracing::{info, warn};

use crate::data::{EntryReport, EntryRow, EntryTable};
use crate::domain::{DEFAULT_DEGREE, DataSet, FitRequest, FitResult, ModelKind};
use crate::error::AppError;
use crate::fit::fit;
use crate::io::load_table;

pub const PROMPT_MESSAGE: &str = "Please choose a fitting method and ensure data is available.";

/// What one fit interaction produced.
#[derive(Debug, Clone)]
pub enum FitOutcome {
    Fitted(FitResult),
    /// No model chosen or no data: nothing was attempted.
    Prompt,
    Failed(AppError),
}

impl FitOutcome {
    /// Text for the status line (not used for `Fitted`).
    pub fn message(&self) -> Option<String> {
        match self {
            FitOutcome::Fitted(_) => None,
            FitOutcome::Prompt => Some(PROMPT_MESSAGE.to_string()),
            FitOutcome::Failed(e) => Some(failure_message(e)),
        }
    }

    /// Convert to a `Result` for the CLI (prompt → `InputIncomplete`).
    pub fn into_result(self) -> Result<FitResult, AppError> {
        match self {
            FitOutcome::Fitted(result) => Ok(result),
            FitOutcome::Prompt => Err(AppError::incomplete(PROMPT_MESSAGE)),
            FitOutcome::Failed(e) => Err(AppError::new(e.kind(), failure_message(&e))),
        }
    }
}

pub fn failure_message(err: &AppError) -> String {
    format!("An error occurred during fitting: {err}")
}

/// Run the chosen fitter if there is something to fit.
///
/// Errors never escape: they become `FitOutcome::Failed`, and `data` is
/// only borrowed, so a failed fit leaves it untouched.
pub fn evaluate(data: &DataSet, request: Option<&FitRequest>) -> FitOutcome {
    let Some(request) = request else {
        return FitOutcome::Prompt;
    };
    if data.is_empty() {
        return FitOutcome::Prompt;
    }
    match fit(data, request) {
        Ok(result) => FitOutcome::Fitted(result),
        Err(e) => {
            warn!(model = %request.label(), error = %e, "fit failed");
            FitOutcome::Failed(e)
        }
    }
}

/// Resolve model + degree flags into a request.
///
/// The degree only applies to polynomial fits (defaulting to 2); for other
/// models it is ignored.
pub fn resolve_request(
    model: Option<ModelKind>,
    degree: Option<u8>,
) -> Result<Option<FitRequest>, AppError> {
    let Some(kind) = model else {
        return Ok(None);
    };
    let degree = if kind == ModelKind::Polynomial {
        Some(degree.unwrap_or(DEFAULT_DEGREE))
    } else {
        if let Some(d) = degree {
            warn!(degree = d, model = kind.display_name(), "degree ignored");
        }
        None
    };
    FitRequest::new(kind, degree).map(Some)
}

/// Build an entry table from `X,Y` strings (a missing comma leaves y empty).
pub fn entry_table_from_points(points: &[String]) -> EntryTable {
    EntryTable::from_rows(points.iter().map(|p| match p.split_once(',') {
        Some((x, y)) => EntryRow::new(x.trim(), y.trim()),
        None => EntryRow::new(p.trim(), ""),
    }))
}

/// Data from a manual entry report; any invalid cell blocks fitting.
pub fn entry_dataset(report: &EntryReport) -> Result<DataSet, AppError> {
    match report.first_error() {
        Some(e) => Err(e),
        None => Ok(report.dataset.clone()),
    }
}

/// Load a table file, logging the outcome.
pub fn load_file(path: &Path, delimiter: u8) -> Result<DataSet, AppError> {
    let data = load_table(path, delimiter)?;
    info!(n = data.len(), "data ready");
    Ok(data)
}

/// Validate a delimiter character (must be a single ASCII byte).
pub fn delimiter_byte(c: char) -> Result<u8, AppError> {
    if c.is_ascii() && c != '\n' && c != '\r' && c != '"' {
        Ok(c as u8)
    } else {
        Err(AppError::parse(format!("Unsupported delimiter '{c}'.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn doubling() -> DataSet {
        DataSet::from_points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)])
    }

    #[test]
    fn no_model_prompts() {
        let outcome = evaluate(&doubling(), None);
        assert!(matches!(outcome, FitOutcome::Prompt));
        assert_eq!(outcome.message().unwrap(), PROMPT_MESSAGE);
    }

    #[test]
    fn empty_data_prompts() {
        let request = FitRequest::simple(ModelKind::Linear).unwrap();
        let err = evaluate(&DataSet::default(), Some(&request))
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputIncomplete);
        assert_eq!(err.message(), PROMPT_MESSAGE);
    }

    #[test]
    fn linear_on_doubling_data() {
        let request = FitRequest::simple(ModelKind::Linear).unwrap();
        let result = evaluate(&doubling(), Some(&request)).into_result().unwrap();
        assert_eq!(result.formula, "y = 2.00x + 0.00");
    }

    #[test]
    fn failures_are_wrapped_and_data_is_untouched() {
        let data = DataSet::from_points(&[(-1.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let before = data.clone();
        let request = FitRequest::simple(ModelKind::PowerLaw).unwrap();
        let outcome = evaluate(&data, Some(&request));
        let msg = outcome.message().unwrap();
        assert!(msg.starts_with("An error occurred during fitting: "), "{msg}");
        assert_eq!(outcome.into_result().unwrap_err().kind(), ErrorKind::Fitting);
        assert_eq!(data, before);
    }

    #[test]
    fn degree_defaults_and_is_ignored_elsewhere() {
        let poly = resolve_request(Some(ModelKind::Polynomial), None).unwrap().unwrap();
        assert_eq!(poly.degree(), Some(DEFAULT_DEGREE));
        let lin = resolve_request(Some(ModelKind::Linear), Some(4)).unwrap().unwrap();
        assert_eq!(lin.degree(), None);
        assert!(resolve_request(None, Some(3)).unwrap().is_none());
    }

    #[test]
    fn points_become_entry_rows() {
        let table = entry_table_from_points(&["1, 2".into(), "3".into(), "x,4".into()]);
        let report = table.to_report();
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.incomplete, vec![2]);
        assert_eq!(report.errors[0].row, 3);
        assert_eq!(entry_dataset(&report).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn delimiters_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('§').is_err());
    }
}
