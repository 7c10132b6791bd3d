//! Synthetic sample generation from a known model.
//!
//! x values are evenly spaced over the requested range; each y is the model
//! value plus relative Gaussian noise, `y = m(x) + N(0, noise·|m(x)|)`.
//! Samples are fully determined by the seed.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::domain::{DataSet, FitRequest};
use crate::error::AppError;
use crate::models::predict;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub request: FitRequest,
    /// Model parameters in formula order.
    pub params: Vec<f64>,
    pub count: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Relative noise level (0 = exact model values).
    pub noise: f64,
    pub seed: u64,
}

pub fn generate_sample(config: &SampleConfig) -> Result<DataSet, AppError> {
    let request = &config.request;
    request.validate()?;

    if config.count == 0 {
        return Err(AppError::incomplete("Sample count must be > 0."));
    }
    if config.params.len() != request.param_count() {
        return Err(AppError::incomplete(format!(
            "{} takes {} parameters (got {}).",
            request.label(),
            request.param_count(),
            config.params.len()
        )));
    }
    if config.params.iter().any(|p| !p.is_finite()) {
        return Err(AppError::parse("Sample parameters must be finite."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max >= config.x_min) {
        return Err(AppError::parse("Invalid x range for sample generation."));
    }
    if config.count > 1 && config.x_max == config.x_min {
        return Err(AppError::parse(
            "x range must be non-empty when sampling more than one point.",
        ));
    }
    if request.kind().requires_positive_x() && config.x_min <= 0.0 {
        return Err(AppError::fitting(format!(
            "{} requires all x > 0.",
            request.kind().display_name()
        )));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::parse("Noise level must be a finite value >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::fitting(format!("Noise distribution error: {e}")))?;

    let step = if config.count > 1 {
        (config.x_max - config.x_min) / (config.count - 1) as f64
    } else {
        0.0
    };

    let mut data = DataSet::default();
    for i in 0..config.count {
        let x = if i + 1 == config.count {
            config.x_max
        } else {
            config.x_min + step * i as f64
        };
        let clean = predict(request.kind(), x, &config.params);
        if !clean.is_finite() {
            return Err(AppError::fitting(format!(
                "Model value at x = {x} is not finite."
            )));
        }
        let z = normal.sample(&mut rng);
        data.push(x, clean + config.noise * clean.abs() * z);
    }

    info!(
        model = %request.label(),
        n = data.len(),
        seed = config.seed,
        "sample generated"
    );
    Ok(data)
}
