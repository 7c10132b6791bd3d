//! Model comparison: fit every model kind on the same data and rank them.
//!
//! Candidates are Linear, Polynomial(2..=max_degree), Exponential,
//! Logarithmic and PowerLaw. They are fitted in parallel; candidates whose
//! preconditions fail or whose solver does not converge are kept as skips
//! with the reason.
//!
//! Ranking rules:
//! 1. higher r² first (non-finite r² sorts last)
//! 2. ties (equal to 9 decimals) broken by lower RMSE
//! 3. then by fewer parameters (prefer the simpler model)

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::info;

use crate::domain::{DataSet, FitRequest, FitResult, MAX_DEGREE, MIN_DEGREE, ModelKind};
use crate::error::AppError;
use crate::fit::fitter::fit;

/// Output of fitting + ranking.
#[derive(Debug, Clone)]
pub struct ModelComparison {
    /// Successful fits, best first.
    pub ranked: Vec<FitResult>,
    /// Candidates that could not be fitted and why.
    pub skipped: Vec<(FitRequest, String)>,
}

impl ModelComparison {
    pub fn best(&self) -> Option<&FitResult> {
        self.ranked.first()
    }
}

/// All candidate requests, polynomial degrees up to `max_degree`.
pub fn candidate_requests(max_degree: u8) -> Result<Vec<FitRequest>, AppError> {
    let max_degree = max_degree.clamp(MIN_DEGREE, MAX_DEGREE);
    let mut out = Vec::new();
    for kind in ModelKind::ALL {
        if kind == ModelKind::Polynomial {
            for d in MIN_DEGREE..=max_degree {
                out.push(FitRequest::polynomial(d)?);
            }
        } else {
            out.push(FitRequest::simple(kind)?);
        }
    }
    Ok(out)
}

/// Fit every candidate and rank the successes.
pub fn compare_models(data: &DataSet, max_degree: u8) -> Result<ModelComparison, AppError> {
    if data.is_empty() {
        return Err(AppError::incomplete("No data points to fit."));
    }
    let requests = candidate_requests(max_degree)?;

    // Each candidate is independent; results come back in request order.
    let outcomes: Vec<(FitRequest, Result<FitResult, AppError>)> = requests
        .par_iter()
        .map(|request| (*request, fit(data, request)))
        .collect();

    let mut ranked = Vec::new();
    let mut skipped = Vec::new();
    for (request, outcome) in outcomes {
        match outcome {
            Ok(result) => ranked.push(result),
            Err(err) => skipped.push((request, err.to_string())),
        }
    }

    if ranked.is_empty() {
        return Err(AppError::fitting("No model could be fitted to the data."));
    }

    ranked.sort_by(rank_order);
    info!(
        fitted = ranked.len(),
        skipped = skipped.len(),
        best = %ranked[0].request.label(),
        "comparison finished"
    );

    Ok(ModelComparison { ranked, skipped })
}

/// Metrics are compared after rounding to this many decimal places, so
/// floating-point noise between equally good fits counts as a tie.
const RANK_DECIMALS: i32 = 9;

fn rank_order(a: &FitResult, b: &FitResult) -> Ordering {
    let r2 = |r: &FitResult| {
        if r.quality.r2.is_finite() {
            quantize(r.quality.r2)
        } else {
            f64::NEG_INFINITY
        }
    };
    let rmse = |r: &FitResult| quantize(r.quality.rmse);
    r2(b)
        .total_cmp(&r2(a))
        .then_with(|| rmse(a).total_cmp(&rmse(b)))
        .then_with(|| a.params.len().cmp(&b.params.len()))
}

fn quantize(v: f64) -> f64 {
    let scale = 10f64.powi(RANK_DECIMALS);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict;

    #[test]
    fn candidates_cover_every_kind() {
        let reqs = candidate_requests(4).unwrap();
        // linear + 3 polynomials + 3 nonlinear
        assert_eq!(reqs.len(), 7);
        assert!(reqs.iter().any(|r| r.degree() == Some(4)));
        assert!(!reqs.iter().any(|r| r.degree() == Some(5)));
    }

    #[test]
    fn clean_power_law_ranks_first_among_two_parameter_models() {
        let points: Vec<(f64, f64)> = (1..15)
            .map(|i| {
                let x = f64::from(i);
                (x, predict(ModelKind::PowerLaw, x, &[2.0, 0.5]))
            })
            .collect();
        let data = DataSet::from_points(&points);
        let cmp = compare_models(&data, 2).unwrap();

        let two_param: Vec<&FitResult> = cmp
            .ranked
            .iter()
            .filter(|r| r.params.len() == 2)
            .collect();
        assert_eq!(two_param[0].kind(), ModelKind::PowerLaw);
        assert!(cmp.skipped.is_empty());
    }

    #[test]
    fn non_positive_x_skips_log_models() {
        let points: Vec<(f64, f64)> = (-3..6).map(|i| (f64::from(i), 2.0 * f64::from(i) + 1.0)).collect();
        let data = DataSet::from_points(&points);
        let cmp = compare_models(&data, 3).unwrap();

        let skipped: Vec<ModelKind> = cmp.skipped.iter().map(|(r, _)| r.kind()).collect();
        assert!(skipped.contains(&ModelKind::Logarithmic));
        assert!(skipped.contains(&ModelKind::PowerLaw));
        // Exact linear data: the linear model wins ties on parameter count.
        assert_eq!(cmp.best().unwrap().kind(), ModelKind::Linear);
    }
}
