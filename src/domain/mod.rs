//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the model kinds and validated fit requests (`ModelKind`, `FitRequest`)
//! - the observation container (`DataSet`)
//! - fit outputs (`FitResult`, `FitQuality`, `CurveFile`)

pub mod types;

pub use types::*;
