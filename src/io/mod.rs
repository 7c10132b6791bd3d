//! Input/output helpers.
//!
//! - two-column table ingest (`table`)
//! - residual and table exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod table;

pub use curve::*;
pub use export::*;
pub use table::*;
