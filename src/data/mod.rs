//! Data acquisition that is not file based: the manual entry table and
//! synthetic samples.

pub mod entry;
pub mod sample;

pub use entry::*;
pub use sample::*;
