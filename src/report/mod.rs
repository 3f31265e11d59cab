//! Report model for a completed analysis
//!
//! This module holds the immutable result of one analysis run and the JSON
//! error body the HTTP layer returns when a run (or its input) fails.
//!
//! # Components
//!
//! - `AnalysisReport`: the merged result of every extraction unit
//! - `HeadingHistogram`: heading tag name to occurrence count
//! - `LinkTally`: internal/external/inaccessible link counters
//! - `ErrorResponse`: `{status, error}` body for failed requests

mod types;

// Re-export main types
pub use types::{
    AnalysisReport, ErrorResponse, HeadingHistogram, LinkTally, TITLE_NOT_FOUND,
};
