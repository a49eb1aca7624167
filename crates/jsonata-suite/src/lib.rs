//! Conformance test harness for JSONata expression evaluators
//!
//! This crate ties the harness together:
//! - Loading a suite of datasets and grouped fixtures
//! - Skipping known issues
//! - Running every case against an [`Evaluator`] and comparing results
//! - Reporting to the console and as a markdown compliance report
//!
//! # Example
//!
//! ```ignore
//! use jsonata_suite::{RecordingReporter, SkipRegistry, SuiteLayout, SuiteRunner, SuiteTree};
//!
//! let tree = SuiteTree::load(&SuiteLayout::new("jsonata/test/test-suite"))?;
//! let runner = SuiteRunner::new(my_evaluator, SkipRegistry::known_issues());
//! let summary = runner.run(&tree, &mut RecordingReporter::new());
//! assert!(summary.is_success());
//! ```

// Re-export all public APIs from internal crates
pub use jsonata_suite_diagnostics as diagnostics;
pub use jsonata_suite_fixture as fixture;
pub use jsonata_suite_runner as runner;

// Convenience re-exports
pub use jsonata_suite_diagnostics::{EvaluatorError, Failure, FixtureError, Result};
pub use jsonata_suite_fixture::{Case, SkipRegistry, SuiteLayout, SuiteTree};
pub use jsonata_suite_runner::{
    generate_report, Evaluator, Expression, Outcome, RecordingReporter, Reporter, RunSummary, SuiteRunner,
};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
