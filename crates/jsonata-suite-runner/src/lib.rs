//! JSONata conformance suite runner
//!
//! Drives an evaluator under test through a loaded [`SuiteTree`] and checks
//! every case against its declared expectation.
//!
//! - `evaluator`: the narrow contract an evaluator implements to be tested
//! - `compare`: ordered comparison strategies (canonical text, then structure)
//! - `engine`: the per-case parse, bind, evaluate, compare state machine
//! - `report`: reporter events, run summaries and the markdown report
//!
//! Execution is sequential and deterministic; a failing case never stops its
//! siblings.
//!
//! [`SuiteTree`]: jsonata_suite_fixture::SuiteTree

pub mod compare;
pub mod engine;
pub mod evaluator;
pub mod report;

pub use compare::{canonical_text, CanonicalText, Comparator, Comparison, ComparisonStrategy, Structural};
pub use engine::{Outcome, PassKind, SuiteRunner};
pub use evaluator::{variable_name, Evaluator, Expression, VARIABLE_SIGIL};
pub use report::{generate_report, CaseResult, Event, RecordingReporter, Reporter, RunSummary, TestId};
