//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of points sampled along a fitted curve for drawing.
pub const CURVE_POINTS: usize = 500;

/// Smallest polynomial degree offered by the polynomial fitter.
pub const MIN_DEGREE: u8 = 2;

/// Largest polynomial degree offered by the polynomial fitter.
pub const MAX_DEGREE: u8 = 10;

/// Degree used when polynomial fitting is chosen without an explicit degree.
pub const DEFAULT_DEGREE: u8 = 2;

/// Which closed-form model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// `y = a·x + b`
    Linear,
    /// `y = Σ c_i x^(d-i)`
    Polynomial,
    /// `y = a·e^(b·x)`
    Exponential,
    /// `y = a + b·ln(x)`
    Logarithmic,
    /// `y = a·x^b`
    PowerLaw,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Linear,
        ModelKind::Polynomial,
        ModelKind::Exponential,
        ModelKind::Logarithmic,
        ModelKind::PowerLaw,
    ];

    /// Human-readable label, also used as chart title and legend entry.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::Polynomial => "Polynomial Fit",
            ModelKind::Exponential => "Exponential Fit",
            ModelKind::Logarithmic => "Logarithmic Fit",
            ModelKind::PowerLaw => "Power Law Fit",
        }
    }

    /// Whether the model is only defined for strictly positive x.
    pub fn requires_positive_x(self) -> bool {
        matches!(self, ModelKind::Logarithmic | ModelKind::PowerLaw)
    }

    /// Whether the parameters enter the model nonlinearly (iterative solve).
    pub fn is_nonlinear(self) -> bool {
        matches!(
            self,
            ModelKind::Exponential | ModelKind::Logarithmic | ModelKind::PowerLaw
        )
    }
}

/// A validated request to fit one model kind.
///
/// `degree` is present iff `kind == Polynomial`, and then lies in
/// `[MIN_DEGREE, MAX_DEGREE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FitRequest {
    kind: ModelKind,
    degree: Option<u8>,
}

impl FitRequest {
    pub fn new(kind: ModelKind, degree: Option<u8>) -> Result<Self, AppError> {
        let request = Self { kind, degree };
        request.validate()?;
        Ok(request)
    }

    /// Request for a non-polynomial model.
    pub fn simple(kind: ModelKind) -> Result<Self, AppError> {
        Self::new(kind, None)
    }

    pub fn polynomial(degree: u8) -> Result<Self, AppError> {
        Self::new(ModelKind::Polynomial, Some(degree))
    }

    /// Re-check the degree rule (used after deserializing).
    pub fn validate(&self) -> Result<(), AppError> {
        match (self.kind, self.degree) {
            (ModelKind::Polynomial, Some(d)) if (MIN_DEGREE..=MAX_DEGREE).contains(&d) => Ok(()),
            (ModelKind::Polynomial, Some(d)) => Err(AppError::incomplete(format!(
                "Polynomial degree must be between {MIN_DEGREE} and {MAX_DEGREE} (got {d})."
            ))),
            (ModelKind::Polynomial, None) => Err(AppError::incomplete(
                "Polynomial fitting requires a degree.",
            )),
            (kind, Some(_)) => Err(AppError::incomplete(format!(
                "{} does not take a degree.",
                kind.display_name()
            ))),
            (_, None) => Ok(()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn degree(&self) -> Option<u8> {
        self.degree
    }

    /// Number of free parameters of the requested model.
    pub fn param_count(&self) -> usize {
        match self.kind {
            ModelKind::Polynomial => usize::from(self.degree.unwrap_or(DEFAULT_DEGREE)) + 1,
            _ => 2,
        }
    }

    /// Display label including the degree for polynomials.
    pub fn label(&self) -> String {
        match self.degree {
            Some(d) => format!("{} (degree {d})", self.kind.display_name()),
            None => self.kind.display_name().to_string(),
        }
    }
}

/// Ordered (x, y) observations with equal-length x and y sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl DataSet {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, AppError> {
        if x.len() != y.len() {
            return Err(AppError::format(format!(
                "x and y must have the same length (got {} and {}).",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }

    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let (x, y) = points.iter().copied().unzip();
        Self { x, y }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// `(min(x), max(x))`, or `None` when empty or non-finite.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        min_max(&self.x)
    }

    pub fn stats(&self) -> Option<DatasetStats> {
        let (x_min, x_max) = min_max(&self.x)?;
        let (y_min, y_max) = min_max(&self.y)?;
        Some(DatasetStats {
            n_points: self.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}

/// Summary stats about the points used for fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Goodness-of-fit diagnostics on the training data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Fit output, uniform across model kinds.
///
/// `params` are ordered as in the model's formula: `[a, b]` for the
/// two-parameter models, highest power first for polynomials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub request: FitRequest,
    pub params: Vec<f64>,
    pub formula: String,
    pub quality: FitQuality,
    /// `CURVE_POINTS` points evenly spaced over `[min(x), max(x)]`.
    pub curve: Vec<(f64, f64)>,
}

impl FitResult {
    pub fn kind(&self) -> ModelKind {
        self.request.kind()
    }
}

/// A full run's configuration as understood by the CLI front-end.
///
/// This is derived from CLI flags, environment variables, and defaults.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// `None` means "no method selected" and yields a prompt.
    pub request: Option<FitRequest>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub svg: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    pub debug: bool,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub request: FitRequest,
    pub params: Vec<f64>,
    pub formula: String,
    pub quality: FitQuality,
    pub data: Option<DatasetStats>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_requires_degree_in_range() {
        assert!(FitRequest::polynomial(2).is_ok());
        assert!(FitRequest::polynomial(10).is_ok());
        assert!(FitRequest::polynomial(1).is_err());
        assert!(FitRequest::polynomial(11).is_err());
        assert!(FitRequest::new(ModelKind::Polynomial, None).is_err());
    }

    #[test]
    fn degree_rejected_for_other_models() {
        assert!(FitRequest::new(ModelKind::Linear, Some(3)).is_err());
        assert!(FitRequest::simple(ModelKind::PowerLaw).is_ok());
    }

    #[test]
    fn param_counts() {
        assert_eq!(FitRequest::simple(ModelKind::Linear).unwrap().param_count(), 2);
        assert_eq!(FitRequest::polynomial(4).unwrap().param_count(), 5);
        assert_eq!(FitRequest::simple(ModelKind::Exponential).unwrap().param_count(), 2);
    }

    #[test]
    fn dataset_rejects_length_mismatch() {
        let err = DataSet::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }

    #[test]
    fn dataset_stats_cover_both_axes() {
        let data = DataSet::from_points(&[(3.0, -1.0), (1.0, 5.0), (2.0, 0.0)]);
        let stats = data.stats().unwrap();
        assert_eq!(stats.n_points, 3);
        assert_eq!((stats.x_min, stats.x_max), (1.0, 3.0));
        assert_eq!((stats.y_min, stats.y_max), (-1.0, 5.0));
        assert!(DataSet::default().stats().is_none());
    }
}
