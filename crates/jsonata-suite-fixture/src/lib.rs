//! JSONata conformance suite fixtures
//!
//! This crate turns an on-disk suite into an in-memory test tree:
//!
//! - `layout`: where datasets and groups live under a suite root
//! - `dataset`: named, reusable input values
//! - `skip`: known-broken groups and cases, kept apart from fixture content
//! - `fixture`: resolution of one fixture file into one or more cases
//! - `tree`: ordered groups of resolved cases
//!
//! Everything is loaded eagerly and in lexicographic order, so two loads of the
//! same corpus produce identical trees on every platform.
//!
//! # Example
//!
//! ```ignore
//! use jsonata_suite_fixture::{SuiteLayout, SuiteTree};
//!
//! let layout = SuiteLayout::new("target/jsonata/test/test-suite");
//! let tree = SuiteTree::load(&layout)?;
//! println!("{} groups, {} cases", tree.groups.len(), tree.case_count());
//! ```

pub mod dataset;
pub mod fixture;
pub mod layout;
pub mod skip;
pub mod tree;

pub use dataset::Datasets;
pub use fixture::{
    escape_expression, normalize_whole_numbers, resolve_fixture, Bindings, Case, CaseInput,
    Expectation, FixtureContext, FixtureShape,
};
pub use layout::SuiteLayout;
pub use skip::SkipRegistry;
pub use tree::{Group, SuiteTree};

pub use jsonata_suite_diagnostics::{FixtureError, Result};
