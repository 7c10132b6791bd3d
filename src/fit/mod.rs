//! Curve fitting.
//!
//! Responsibilities:
//!
//! - goodness-of-fit metrics (r², MAE, RMSE)
//! - one fitter per model kind, dispatched by kind
//! - comparing every model on the same data (parallel)

pub mod fitter;
pub mod metrics;
pub mod selection;

pub use fitter::*;
pub use metrics::*;
pub use selection::*;
