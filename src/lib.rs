//! `curvefit` library crate.
//!
//! The binary (`curvefit`) is a thin wrapper around this library so that
//! fitting, parsing and rendering are testable without a terminal, and the
//! CLI and TUI share one fit pipeline (`app::pipeline`).

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
