//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a fitted curve:
//! - the fit request and parameters
//! - the formula and quality metrics shown to the user
//! - a precomputed fitted grid for quick re-plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::domain::{CurveFile, CurveGrid, DataSet, FitResult};
use crate::error::AppError;

pub const TOOL_NAME: &str = "curvefit";

/// Build the file contents for a fit.
pub fn curve_file(result: &FitResult, data: &DataSet) -> CurveFile {
    let (x, y) = result.curve.iter().copied().unzip();
    CurveFile {
        tool: TOOL_NAME.to_string(),
        generated: Utc::now(),
        request: result.request,
        params: result.params.clone(),
        formula: result.formula.clone(),
        quality: result.quality,
        data: data.stats(),
        grid: CurveGrid { x, y },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, result: &FitResult, data: &DataSet) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &curve_file(result, data))
        .map_err(|e| AppError::io(format!("Failed to write curve JSON: {e}")))?;
    info!(path = %path.display(), "curve JSON written");
    Ok(())
}

/// Read and sanity-check a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::format(format!("Invalid curve JSON: {e}")))?;
    validate_curve(&curve)?;
    Ok(curve)
}

fn validate_curve(curve: &CurveFile) -> Result<(), AppError> {
    // Deserialization bypasses the request constructor.
    curve.request.validate()?;
    if curve.params.len() != curve.request.param_count() {
        return Err(AppError::format(format!(
            "Invalid curve JSON: {} expects {} parameters, found {}.",
            curve.request.label(),
            curve.request.param_count(),
            curve.params.len()
        )));
    }
    if curve.grid.x.len() != curve.grid.y.len() {
        return Err(AppError::format("Invalid curve JSON: grid x and y differ in length."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitRequest, ModelKind};
    use crate::fit::fit;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("curvefit_{}_{name}", std::process::id()))
    }

    #[test]
    fn saved_curve_reads_back() {
        let data = DataSet::from_points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let result = fit(&data, &FitRequest::simple(ModelKind::Linear).unwrap()).unwrap();
        let path = temp_path("curve.json");

        write_curve_json(&path, &result, &data).unwrap();
        let back = read_curve_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, TOOL_NAME);
        assert_eq!(back.request, result.request);
        assert_eq!(back.formula, "y = 2.00x + 0.00");
        assert_eq!(back.grid.x.len(), result.curve.len());
        assert_eq!(back.data.unwrap().n_points, 3);
    }

    #[test]
    fn inconsistent_parameters_are_rejected() {
        let data = DataSet::from_points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let result = fit(&data, &FitRequest::simple(ModelKind::Linear).unwrap()).unwrap();
        let mut curve = curve_file(&result, &data);
        curve.params.push(1.0);
        let err = validate_curve(&curve).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }
}
