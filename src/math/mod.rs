//! Numerical building blocks: linear least squares on nalgebra.

pub mod ols;

pub use ols::*;
