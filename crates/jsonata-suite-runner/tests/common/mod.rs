//! Common test utilities for runner testing
//!
//! - Mock evaluator with configurable per-expression behavior
//! - Helpers for building cases and trees from inline fixtures

pub mod mocks;

pub use mocks::*;

use jsonata_suite_fixture::{resolve_fixture, Case, Datasets, FixtureContext, Group, SuiteTree};
use serde_json::Value;
use std::path::Path;

/// Resolve an inline fixture into its cases
pub fn cases(name: &str, fixture: Value, datasets: &Datasets) -> Vec<Case> {
    let ctx = FixtureContext {
        group: "inline",
        group_dir: Path::new("."),
        datasets,
    };
    resolve_fixture(fixture, name, ctx)
        .unwrap_or_else(|e| panic!("Failed to resolve fixture {}: {}", name, e))
}

/// Resolve an inline single-object fixture
pub fn case(fixture: Value) -> Case {
    cases("case000", fixture, &Datasets::new()).remove(0)
}

/// Build a tree from (group, fixtures) pairs; fixtures are named case000, case001, ...
pub fn tree(groups: Vec<(&str, Vec<Value>)>) -> SuiteTree {
    let datasets = Datasets::new();
    SuiteTree {
        groups: groups
            .into_iter()
            .map(|(name, fixtures)| Group {
                name: name.to_string(),
                dir: Path::new(".").to_path_buf(),
                cases: fixtures
                    .into_iter()
                    .enumerate()
                    .flat_map(|(i, fixture)| cases(&format!("case{:03}", i), fixture, &datasets))
                    .collect(),
            })
            .collect(),
    }
}
