//! Persistence of crawl results
//!
//! Output is flat files only: CSV chunks plus a plain-text manifest of URLs
//! that need re-processing.

pub mod sink;

pub use sink::{PersistOutcome, ResultSink, COLUMNS};
