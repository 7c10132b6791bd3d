//! Reporting: everything printed to the terminal after a run.

pub mod format;

pub use format::*;
