//! Per-model fitting routines.
//!
//! Given a `DataSet` (equal-length x and y sequences) each fitter:
//! - checks the model's preconditions (point count, distinct x, x > 0 for
//!   log/power models)
//! - solves for the parameters (SVD least squares for linear/polynomial,
//!   Levenberg–Marquardt from `levenberg-marquardt` for the nonlinear models)
//! - computes r², MAE and RMSE on the training data
//! - samples `CURVE_POINTS` points of the fitted curve for drawing
//!
//! The orchestrator never branches on the model kind itself; it looks the
//! fitter up through [`fitter_for`].

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{Dyn, OMatrix, OVector, U1, U2, Vector2, storage::Owned};
use tracing::{debug, info, warn};

use crate::domain::{CURVE_POINTS, DEFAULT_DEGREE, DataSet, FitQuality, FitRequest, FitResult, ModelKind};
use crate::error::AppError;
use crate::fit::metrics::{errors, r_squared};
use crate::math::polyfit;
use crate::models::{fill_jacobian_row, format_formula, predict, sample_curve};

/// Uniform fitter signature used for dispatch.
pub type FitFn = fn(&DataSet, &FitRequest) -> Result<FitResult, AppError>;

/// Map a model kind to its fitter.
pub fn fitter_for(kind: ModelKind) -> FitFn {
    match kind {
        ModelKind::Linear => dispatch_linear,
        ModelKind::Polynomial => dispatch_polynomial,
        ModelKind::Exponential => dispatch_exponential,
        ModelKind::Logarithmic => dispatch_logarithmic,
        ModelKind::PowerLaw => dispatch_power_law,
    }
}

/// Fit the requested model.
pub fn fit(data: &DataSet, request: &FitRequest) -> Result<FitResult, AppError> {
    info!(model = %request.label(), n = data.len(), "fitting");
    let result = fitter_for(request.kind())(data, request)?;
    info!(
        formula = %result.formula,
        r2 = result.quality.r2,
        rmse = result.quality.rmse,
        "fit finished"
    );
    Ok(result)
}

fn dispatch_linear(data: &DataSet, _: &FitRequest) -> Result<FitResult, AppError> {
    fit_linear(data)
}

fn dispatch_polynomial(data: &DataSet, request: &FitRequest) -> Result<FitResult, AppError> {
    fit_polynomial(data, request.degree().unwrap_or(DEFAULT_DEGREE))
}

fn dispatch_exponential(data: &DataSet, _: &FitRequest) -> Result<FitResult, AppError> {
    fit_exponential(data)
}

fn dispatch_logarithmic(data: &DataSet, _: &FitRequest) -> Result<FitResult, AppError> {
    fit_logarithmic(data)
}

fn dispatch_power_law(data: &DataSet, _: &FitRequest) -> Result<FitResult, AppError> {
    fit_power_law(data)
}

/// `y = a·x + b` by ordinary least squares.
pub fn fit_linear(data: &DataSet) -> Result<FitResult, AppError> {
    let request = FitRequest::simple(ModelKind::Linear)?;
    check_preconditions(data, &request)?;
    let coeffs = polyfit(data.x(), data.y(), 1)
        .ok_or_else(|| AppError::fitting("Least squares solve failed for the linear model."))?;
    finish(request, coeffs, data)
}

/// `y = Σ c_i x^(d-i)` by least squares on the Vandermonde matrix.
pub fn fit_polynomial(data: &DataSet, degree: u8) -> Result<FitResult, AppError> {
    let request = FitRequest::polynomial(degree)?;
    check_preconditions(data, &request)?;
    let coeffs = polyfit(data.x(), data.y(), usize::from(degree)).ok_or_else(|| {
        AppError::fitting(format!(
            "Least squares solve failed for the degree {degree} polynomial."
        ))
    })?;
    finish(request, coeffs, data)
}

/// `y = a·e^(b·x)` by nonlinear least squares.
pub fn fit_exponential(data: &DataSet) -> Result<FitResult, AppError> {
    fit_nonlinear(ModelKind::Exponential, data)
}

/// `y = a + b·ln(x)` by nonlinear least squares (requires x > 0).
pub fn fit_logarithmic(data: &DataSet) -> Result<FitResult, AppError> {
    fit_nonlinear(ModelKind::Logarithmic, data)
}

/// `y = a·x^b` by nonlinear least squares (requires x > 0).
pub fn fit_power_law(data: &DataSet) -> Result<FitResult, AppError> {
    fit_nonlinear(ModelKind::PowerLaw, data)
}

/// Validate that `data` can be fitted by `request`.
pub fn check_preconditions(data: &DataSet, request: &FitRequest) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::incomplete("No data points to fit."));
    }
    if data.points().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return Err(AppError::fitting("All x and y values must be finite."));
    }

    let n = data.len();
    let k = request.param_count();
    if n < k {
        return Err(AppError::fitting(format!(
            "{} needs at least {k} data points, got {n}.",
            request.label()
        )));
    }

    let mut xs = data.x().to_vec();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    if xs.len() < 2 {
        return Err(AppError::fitting(
            "At least two distinct x values are required.",
        ));
    }

    let kind = request.kind();
    if kind.requires_positive_x() && data.x().iter().any(|&x| x <= 0.0) {
        return Err(AppError::fitting(format!(
            "{} requires all x > 0.",
            kind.display_name()
        )));
    }

    Ok(())
}

/// Residuals and Jacobian of a two-parameter curve over fixed samples.
struct CurveProblem<'a> {
    kind: ModelKind,
    x: &'a [f64],
    y: &'a [f64],
    params: Vector2<f64>,
}

impl LeastSquaresProblem<f64, Dyn, U2> for CurveProblem<'_> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, U2>;
    type ParameterStorage = Owned<f64, U2>;

    fn set_params(&mut self, params: &Vector2<f64>) {
        self.params.copy_from(params);
    }

    fn params(&self) -> Vector2<f64> {
        self.params
    }

    fn residuals(&self) -> Option<OVector<f64, Dyn>> {
        let params = self.params.as_slice();
        let r = OVector::<f64, Dyn>::from_iterator_generic(
            Dyn(self.x.len()),
            U1,
            self.x
                .iter()
                .zip(self.y)
                .map(|(&x, &y)| predict(self.kind, x, params) - y),
        );
        r.iter().all(|v| v.is_finite()).then_some(r)
    }

    fn jacobian(&self) -> Option<OMatrix<f64, Dyn, U2>> {
        let params = self.params.as_slice();
        let mut jac = OMatrix::<f64, Dyn, U2>::zeros_generic(Dyn(self.x.len()), U2);
        let mut row = [0.0; 2];
        for (i, &x) in self.x.iter().enumerate() {
            fill_jacobian_row(self.kind, x, params, &mut row);
            jac[(i, 0)] = row[0];
            jac[(i, 1)] = row[1];
        }
        jac.iter().all(|v| v.is_finite()).then_some(jac)
    }
}

/// Evaluation budget is `SOLVER_PATIENCE · (p + 1)`.
const SOLVER_PATIENCE: usize = 200;

fn fit_nonlinear(kind: ModelKind, data: &DataSet) -> Result<FitResult, AppError> {
    let request = FitRequest::simple(kind)?;
    check_preconditions(data, &request)?;

    let initial = initial_guess(kind, data);
    debug!(model = kind.display_name(), ?initial, "initial guess");

    let problem = CurveProblem {
        kind,
        x: data.x(),
        y: data.y(),
        params: Vector2::new(initial[0], initial[1]),
    };
    let (problem, report) = LevenbergMarquardt::new()
        .with_patience(SOLVER_PATIENCE)
        .minimize(problem);

    if !report.termination.was_successful() {
        warn!(model = kind.display_name(), termination = ?report.termination, "solver failed");
        return Err(AppError::fitting(format!(
            "Optimal parameters not found: {:?}",
            report.termination
        )));
    }
    debug!(
        evaluations = report.number_of_evaluations,
        objective = report.objective_function,
        termination = ?report.termination,
        "solver converged"
    );
    finish(request, problem.params.iter().copied().collect(), data)
}

/// Starting point for the nonlinear solve.
///
/// The solver default is all ones. When the data allow a log-linearized fit
/// (`ln|y|` against `x` or `ln x` with y of one sign) that estimate is used
/// instead, which keeps the solve well inside the basin of the optimum.
fn initial_guess(kind: ModelKind, data: &DataSet) -> Vec<f64> {
    let (x, y) = (data.x(), data.y());
    let ones = vec![1.0, 1.0];

    let guess = match kind {
        ModelKind::Exponential => log_linear_guess(x, y),
        ModelKind::PowerLaw => {
            let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();
            log_linear_guess(&ln_x, y)
        }
        ModelKind::Logarithmic => {
            let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();
            polyfit(&ln_x, y, 1).map(|c| vec![c[1], c[0]])
        }
        ModelKind::Linear | ModelKind::Polynomial => None,
    };

    match guess {
        Some(g) if g.iter().all(|v| v.is_finite()) => g,
        _ => ones,
    }
}

/// Fit `ln|y| = ln|a| + b·t` when all y share one sign; returns `[a, b]`.
fn log_linear_guess(t: &[f64], y: &[f64]) -> Option<Vec<f64>> {
    let sign = if y.iter().all(|&v| v > 0.0) {
        1.0
    } else if y.iter().all(|&v| v < 0.0) {
        -1.0
    } else {
        return None;
    };
    let ln_y: Vec<f64> = y.iter().map(|v| (v * sign).ln()).collect();
    let c = polyfit(t, &ln_y, 1)?;
    Some(vec![sign * c[1].exp(), c[0]])
}

fn finish(request: FitRequest, params: Vec<f64>, data: &DataSet) -> Result<FitResult, AppError> {
    if params.iter().any(|p| !p.is_finite()) {
        return Err(AppError::fitting("Fitted parameters are not finite."));
    }
    let kind = request.kind();

    let y_pred: Vec<f64> = data.x().iter().map(|&x| predict(kind, x, &params)).collect();
    if y_pred.iter().any(|v| !v.is_finite()) {
        return Err(AppError::fitting(
            "Non-finite model prediction on the input data.",
        ));
    }

    let r2 = r_squared(data.y(), &y_pred);
    let (mae, rmse) = errors(data.y(), &y_pred);
    let (x_min, x_max) = data
        .x_range()
        .ok_or_else(|| AppError::incomplete("No data points to fit."))?;

    Ok(FitResult {
        request,
        formula: format_formula(kind, &params),
        curve: sample_curve(kind, &params, x_min, x_max, CURVE_POINTS),
        quality: FitQuality {
            r2,
            mae,
            rmse,
            n: data.len(),
        },
        params,
    })
}
