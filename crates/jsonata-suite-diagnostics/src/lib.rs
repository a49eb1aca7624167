//! Conformance suite diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the suite harness:
//! load-time fixture errors, classified evaluator failures with their JSONata
//! error codes, and the per-case failure diagnostics reported after a run.

mod error;
mod error_code;
mod failure;

pub use error::*;
pub use error_code::*;
pub use failure::*;

/// Result type for fixture loading
pub type Result<T> = std::result::Result<T, FixtureError>;
