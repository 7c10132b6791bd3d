//! Chart rendering.
//!
//! Every renderer (ASCII for the CLI, Plotters SVG files, the Plotters widget
//! in the TUI) draws the same [`ChartData`]: observed points as markers, the
//! fitted curve as a line, axis labels `x`/`y`, gridlines, the title as both
//! chart title and legend label, and five x ticks spanning the data range.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::domain::{CurveFile, DataSet, FitResult};

/// Number of x-axis ticks (evenly spaced, ends included).
pub const X_TICKS: usize = 5;

pub const X_LABEL: &str = "x";
pub const Y_LABEL: &str = "y";

/// Render-ready chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub points: Vec<(f64, f64)>,
    pub curve: Vec<(f64, f64)>,
}

impl ChartData {
    pub fn for_fit(data: &DataSet, result: &FitResult) -> Self {
        Self {
            title: result.kind().display_name().to_string(),
            points: data.points().collect(),
            curve: result.curve.clone(),
        }
    }

    /// A saved curve without observations.
    pub fn from_curve_file(curve: &CurveFile) -> Self {
        Self {
            title: curve.request.kind().display_name().to_string(),
            points: Vec::new(),
            curve: curve
                .grid
                .x
                .iter()
                .copied()
                .zip(curve.grid.y.iter().copied())
                .collect(),
        }
    }

    /// x extent of the observations (or of the curve when there are none).
    /// Always a non-empty interval.
    pub fn x_bounds(&self) -> (f64, f64) {
        let source = if self.points.is_empty() {
            &self.curve
        } else {
            &self.points
        };
        match finite_range(source.iter().map(|p| p.0)) {
            Some((lo, hi)) if hi > lo => (lo, hi),
            Some((lo, _)) => (lo - 0.5, lo + 0.5),
            None => (0.0, 1.0),
        }
    }

    /// y extent of points and curve, padded by 5% on each side.
    pub fn y_bounds(&self) -> (f64, f64) {
        let ys = self.points.iter().chain(self.curve.iter()).map(|p| p.1);
        match finite_range(ys) {
            Some((lo, hi)) if hi > lo => {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
            Some((lo, _)) => (lo - 0.5, lo + 0.5),
            None => (0.0, 1.0),
        }
    }

    pub fn x_ticks(&self) -> [f64; X_TICKS] {
        let (lo, hi) = self.x_bounds();
        ticks(lo, hi)
    }
}

/// `X_TICKS` evenly spaced values from `lo` to `hi` inclusive.
pub fn ticks(lo: f64, hi: f64) -> [f64; X_TICKS] {
    let mut out = [lo; X_TICKS];
    let step = (hi - lo) / (X_TICKS - 1) as f64;
    for (i, t) in out.iter_mut().enumerate() {
        *t = if i == X_TICKS - 1 { hi } else { lo + step * i as f64 };
    }
    out
}

/// Tick label format shared by all renderers.
pub fn fmt_tick(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitRequest;
    use crate::fit::fit;

    #[test]
    fn ticks_span_the_range() {
        assert_eq!(ticks(0.0, 4.0), [0.0, 1.0, 2.0, 3.0, 4.0]);
        let t = ticks(-1.0, 0.3);
        assert_eq!(t[0], -1.0);
        assert_eq!(t[4], 0.3);
    }

    #[test]
    fn bounds_are_never_empty() {
        let chart = ChartData {
            title: "T".into(),
            points: vec![(2.0, 5.0)],
            curve: vec![],
        };
        assert_eq!(chart.x_bounds(), (1.5, 2.5));
        assert_eq!(chart.y_bounds(), (4.5, 5.5));

        let empty = ChartData {
            title: "T".into(),
            points: vec![],
            curve: vec![],
        };
        assert_eq!(empty.x_bounds(), (0.0, 1.0));
    }

    #[test]
    fn x_bounds_follow_the_data_not_the_curve() {
        let chart = ChartData {
            title: "T".into(),
            points: vec![(1.0, 0.0), (3.0, 1.0)],
            curve: vec![(0.0, 0.0), (10.0, 1.0)],
        };
        assert_eq!(chart.x_bounds(), (1.0, 3.0));
    }

    #[test]
    fn fit_title_is_the_bare_fit_type() {
        let data = DataSet::from_points(&[(0.0, 1.0), (1.0, 0.0), (2.0, 3.0), (3.0, 2.0), (4.0, 5.0)]);
        let request = FitRequest::polynomial(3).unwrap();
        let result = fit(&data, &request).unwrap();
        let chart = ChartData::for_fit(&data, &result);
        assert_eq!(chart.title, "Polynomial Fit");
        assert_eq!(chart.points.len(), 5);
        assert_eq!(chart.curve.len(), result.curve.len());
    }
}
