//! Debug bundle writer for inspecting a dataset and every model's fit on it.

use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::domain::{DataSet, FitRequest, MAX_DEGREE};
use crate::error::AppError;
use crate::fit::{compare_models, fit};

pub const DEBUG_DIR: &str = "debug";

/// Write `<dir>/curvefit_debug_<timestamp>.md` and return its path.
pub fn write_debug_bundle(
    dir: &Path,
    data: &DataSet,
    request: Option<&FitRequest>,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::io(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("curvefit_debug_{ts}.md"));

    let file = File::create(&path)
        .map_err(|e| AppError::io(format!("Failed to create debug file: {e}")))?;
    let mut out = BufWriter::new(file);
    write_debug_markdown(&mut out, data, request)?;
    out.flush().map_err(write_err)?;
    info!(path = %path.display(), "debug bundle written");
    Ok(path)
}

/// Markdown body of the bundle.
pub fn write_debug_markdown<W: Write>(
    out: &mut W,
    data: &DataSet,
    request: Option<&FitRequest>,
) -> Result<(), AppError> {
    writeln!(out, "# curvefit debug bundle").map_err(write_err)?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339()).map_err(write_err)?;
    writeln!(
        out,
        "- request: {}",
        request.map_or_else(|| "(none selected)".to_string(), FitRequest::label)
    )
    .map_err(write_err)?;
    match data.stats() {
        Some(s) => {
            writeln!(
                out,
                "- points: n={} x=[{:.6}, {:.6}] y=[{:.6}, {:.6}]",
                s.n_points, s.x_min, s.x_max, s.y_min, s.y_max
            )
            .map_err(write_err)?;
        }
        None => {
            writeln!(out, "- points: n={}", data.len()).map_err(write_err)?;
        }
    }

    writeln!(out, "\n## Data").map_err(write_err)?;
    writeln!(out, "| # | x | y |").map_err(write_err)?;
    writeln!(out, "| - | - | - |").map_err(write_err)?;
    for (i, (x, y)) in data.points().enumerate() {
        writeln!(out, "| {} | {x} | {y} |", i + 1).map_err(write_err)?;
    }

    if let Some(request) = request {
        writeln!(out, "\n## Selected fit").map_err(write_err)?;
        match fit(data, request) {
            Ok(result) => {
                writeln!(out, "- formula: {}", result.formula).map_err(write_err)?;
                writeln!(out, "- params: {}", fmt_vec(&result.params)).map_err(write_err)?;
                writeln!(
                    out,
                    "- r2={:.6} mae={:.6} rmse={:.6}",
                    result.quality.r2, result.quality.mae, result.quality.rmse
                )
                .map_err(write_err)?;
            }
            Err(e) => {
                writeln!(out, "- failed: {e}").map_err(write_err)?;
            }
        }
    }

    writeln!(out, "\n## All models").map_err(write_err)?;
    match compare_models(data, MAX_DEGREE) {
        Ok(cmp) => {
            writeln!(out, "| rank | model | formula | r2 | mae | rmse |").map_err(write_err)?;
            writeln!(out, "| - | - | - | - | - | - |").map_err(write_err)?;
            for (i, r) in cmp.ranked.iter().enumerate() {
                writeln!(
                    out,
                    "| {} | {} | {} | {:.6} | {:.6} | {:.6} |",
                    i + 1,
                    r.request.label(),
                    r.formula,
                    r.quality.r2,
                    r.quality.mae,
                    r.quality.rmse
                )
                .map_err(write_err)?;
            }
            for (request, reason) in &cmp.skipped {
                writeln!(out, "- skipped {}: {reason}", request.label()).map_err(write_err)?;
            }
        }
        Err(e) => {
            writeln!(out, "- comparison failed: {e}").map_err(write_err)?;
        }
    }

    Ok(())
}

fn write_err(e: io::Error) -> AppError {
    AppError::io(format!("Failed to write debug file: {e}"))
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;

    fn render(data: &DataSet, request: Option<&FitRequest>) -> String {
        let mut buf = Vec::new();
        write_debug_markdown(&mut buf, data, request).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bundle_lists_data_and_every_model() {
        let data = DataSet::from_points(&[(1.0, 2.1), (2.0, 3.9), (3.0, 6.2), (4.0, 7.8)]);
        let request = FitRequest::simple(ModelKind::Linear).unwrap();
        let md = render(&data, Some(&request));

        assert!(md.starts_with("# curvefit debug bundle\n"));
        assert!(md.contains("- request: Linear Regression"));
        assert!(md.contains("| 4 | 4 | 7.8 |"));
        assert!(md.contains("## Selected fit"));
        assert!(md.contains("Power Law Fit"));
    }

    #[test]
    fn empty_data_still_renders() {
        let md = render(&DataSet::default(), None);
        assert!(md.contains("- request: (none selected)"));
        assert!(md.contains("- comparison failed: No data points to fit."));
    }

    #[test]
    fn bundle_file_is_written() {
        let dir = std::env::temp_dir().join(format!("curvefit_debug_test_{}", std::process::id()));
        let data = DataSet::from_points(&[(1.0, 1.0), (2.0, 2.0)]);
        let path = write_debug_bundle(&dir, &data, None).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("curvefit_debug_"));
        let md = std::fs::read_to_string(&path).unwrap();
        assert!(md.contains("| 2 | 2 | 2 |"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
