//! CLI functionality for the conformance harness
//!
//! - Running a suite against an external evaluator process
//! - Listing the cases of a suite
//! - Loading suites and skip configuration
//! - Output formatting and logging

pub mod list;
pub mod output;
pub mod process;
pub mod run;
pub mod suite;
