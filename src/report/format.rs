//! Formatted terminal output: fit summaries, comparison tables, entry notes.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (snapshot-style tests below)

use crate::data::EntryReport;
use crate::domain::{CurveFile, DataSet, FitResult};
use crate::fit::ModelComparison;
use crate::models::fmt_coef;

/// The four result lines shown after a successful fit.
pub fn format_fit_summary(result: &FitResult) -> String {
    let q = &result.quality;
    let mut out = String::new();
    out.push_str(&format!("Formula: {}\n", result.formula));
    out.push_str(&format!("R² Value: {}\n", fmt_coef(q.r2)));
    out.push_str(&format!("Mean Absolute Error: {}\n", fmt_coef(q.mae)));
    out.push_str(&format!("Root Mean Square Error: {}\n", fmt_coef(q.rmse)));
    out
}

/// One-line description of the data being fitted.
pub fn format_dataset_line(data: &DataSet) -> String {
    match data.stats() {
        Some(s) => format!(
            "Points: n={} | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
            s.n_points, s.x_min, s.x_max, s.y_min, s.y_max
        ),
        None => "Points: n=0\n".to_string(),
    }
}

/// Parse errors and skipped half-filled rows from manual entry.
pub fn format_entry_notes(report: &EntryReport) -> String {
    let mut out = String::new();
    for e in &report.errors {
        out.push_str(&e.message);
        out.push('\n');
    }
    if !report.incomplete.is_empty() {
        let rows: Vec<String> = report.incomplete.iter().map(|r| r.to_string()).collect();
        out.push_str(&format!(
            "Skipped incomplete row(s): {}\n",
            rows.join(", ")
        ));
    }
    out
}

/// Ranked comparison table; the best model is marked with `*`.
pub fn format_comparison(cmp: &ModelComparison) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "  {:<4} {:<28} {:>10} {:>12} {:>12}  {}\n",
            "rank", "model", "r2", "mae", "rmse", "formula"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "  {:-<4} {:-<28} {:-<10} {:-<12} {:-<12}  {:-<7}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, fit) in cmp.ranked.iter().enumerate() {
        let chosen = if i == 0 { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<4} {:<28} {:>10.6} {:>12.6} {:>12.6}  {}\n",
            i + 1,
            truncate(&fit.request.label(), 28),
            fit.quality.r2,
            fit.quality.mae,
            fit.quality.rmse,
            fit.formula
        ));
    }
    for (request, reason) in &cmp.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", request.label()));
    }
    out
}

/// Summary of a saved curve file.
pub fn format_curve_summary(curve: &CurveFile) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Curve: {} (saved by {} at {})\n",
        curve.request.label(),
        curve.tool,
        curve.generated.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Formula: {}\n", curve.formula));
    out.push_str(&format!("R² Value: {}\n", fmt_coef(curve.quality.r2)));
    out.push_str(&format!("Mean Absolute Error: {}\n", fmt_coef(curve.quality.mae)));
    out.push_str(&format!(
        "Root Mean Square Error: {}\n",
        fmt_coef(curve.quality.rmse)
    ));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
