//! sqlscope diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the analysis
//! crates: stable error codes, the analysis error taxonomy and diagnostics.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
