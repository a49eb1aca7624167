//! End-to-end runs over on-disk corpora

mod common;

use common::*;
use jsonata_suite_fixture::{SkipRegistry, SuiteLayout, SuiteTree};
use jsonata_suite_runner::{generate_report, RecordingReporter, SuiteRunner};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        &root.join("datasets/dataset0.json"),
        r#"{"foo": {"bar": 42}}"#,
    );
    write(
        &root.join("groups/fields/case000.json"),
        r#"{"expr": "$foo", "dataset": "dataset0", "bindings": {"foo": 42}, "result": 42}"#,
    );
    write(
        &root.join("groups/fields/case001.json"),
        r#"[{"expr": "\"a\"", "data": null, "result": "a"}, {"expr": "\"b\"", "data": null, "result": "b"}]"#,
    );
    write(
        &root.join("groups/errors/case000.json"),
        r#"{"expr-file": "case000.jsonata", "dataset": null, "bindings": {}, "code": "S0201"}"#,
    );
    write(&root.join("groups/errors/case000.jsonata"), "1 +");
    write(
        &root.join("groups/regex/case000.json"),
        r#"{"expr": "$match('a', /a/)", "result": {"match": "a"}}"#,
    );

    dir
}

#[test]
fn test_full_corpus_run() {
    let dir = corpus();
    let tree = SuiteTree::load(&SuiteLayout::new(dir.path())).unwrap();
    assert_eq!(tree.case_count(), 5);

    let mut skip = SkipRegistry::new();
    skip.skip_group("regex", None);
    let runner = SuiteRunner::new(MockEvaluator::new(), skip);

    let summary = runner.run(&tree, &mut RecordingReporter::new());

    assert_eq!(summary.total, 5);
    assert_eq!(summary.passed, 4);
    assert_eq!(summary.ignored, 1);
    assert!(summary.is_success());
    assert_eq!(
        summary.by_group(),
        vec![("errors", 1, 0, 0), ("fields", 3, 0, 0), ("regex", 0, 0, 1)]
    );
}

#[test]
fn test_report_names_failed_cases() {
    let dir = corpus();
    let tree = SuiteTree::load(&SuiteLayout::new(dir.path())).unwrap();
    let evaluator = MockEvaluator::new().on("\"b\"", MockBehavior::Return(json!("c")));

    let summary = SuiteRunner::new(evaluator, SkipRegistry::new()).run(&tree, &mut RecordingReporter::new());
    let report = generate_report(&summary);

    assert_eq!(summary.failed, 2);
    assert!(report.contains("### fields/case001-1"));
    assert!(report.contains("### regex/case000"));
    assert!(report.contains("\"c\""));
}

#[test]
fn test_filtered_tree_runs_only_matching_cases() {
    let dir = corpus();
    let mut tree = SuiteTree::load(&SuiteLayout::new(dir.path())).unwrap();
    tree.retain(|group, _| group == "fields");

    let evaluator = MockEvaluator::new();
    let summary = SuiteRunner::new(&evaluator, SkipRegistry::new()).run(&tree, &mut RecordingReporter::new());

    assert_eq!(summary.total, 3);
    assert_eq!(evaluator.parsed(), vec!["$foo", "\"a\"", "\"b\""]);
}
