//! Export per-point residuals to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::{DataSet, FitResult};
use crate::error::AppError;
use crate::models::predict;

/// One observation with its fitted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub x: f64,
    pub y: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// `y - y_fit` for every observation, in data order.
pub fn residuals(data: &DataSet, result: &FitResult) -> Vec<Residual> {
    data.points()
        .map(|(x, y)| {
            let y_fit = predict(result.kind(), x, &result.params);
            Residual {
                x,
                y,
                y_fit,
                residual: y - y_fit,
            }
        })
        .collect()
}

/// Write residuals to a CSV file with header `x,y,y_fit,residual`.
pub fn write_residuals_csv(path: &Path, data: &DataSet, result: &FitResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_residuals(file, data, result)?;
    info!(path = %path.display(), n = data.len(), "residuals written");
    Ok(())
}

/// Write residual rows to any writer.
pub fn write_residuals<W: Write>(out: W, data: &DataSet, result: &FitResult) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["x", "y", "y_fit", "residual"])
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals(data, result) {
        writer
            .write_record([
                r.x.to_string(),
                r.y.to_string(),
                format!("{:.10}", r.y_fit),
                format!("{:.10}", r.residual),
            ])
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write a dataset as a headerless two-column table (readable by `load_table`).
pub fn write_table<W: Write>(out: W, data: &DataSet, delimiter: u8) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(out);
    for (x, y) in data.points() {
        writer
            .write_record([x.to_string(), y.to_string()])
            .map_err(|e| AppError::io(format!("Failed to write table row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush table: {e}")))?;
    Ok(())
}
