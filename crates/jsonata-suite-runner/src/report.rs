//! Reporting
//!
//! The engine emits `started`, `ignored`, `finished` and `failed` events for
//! groups and cases to a [`Reporter`], and collects every outcome in a
//! [`RunSummary`] that can be rendered as a markdown compliance report.

use crate::engine::Outcome;
use jsonata_suite_diagnostics::Failure;
use serde::Serialize;
use std::fmt;

/// Hierarchical name of a group (`group`) or a case (`group/case`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestId<'a> {
    pub group: &'a str,
    pub case: Option<&'a str>,
}

impl<'a> TestId<'a> {
    pub fn group(group: &'a str) -> Self {
        Self { group, case: None }
    }

    pub fn case(group: &'a str, case: &'a str) -> Self {
        Self {
            group,
            case: Some(case),
        }
    }

    pub fn is_group(&self) -> bool {
        self.case.is_none()
    }
}

impl fmt::Display for TestId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.case {
            Some(case) => write!(f, "{}/{}", self.group, case),
            None => f.write_str(self.group),
        }
    }
}

/// Sink for run events
pub trait Reporter {
    fn started(&mut self, id: &TestId<'_>);
    fn ignored(&mut self, id: &TestId<'_>);
    fn finished(&mut self, id: &TestId<'_>);
    fn failed(&mut self, id: &TestId<'_>, failure: &Failure);
}

/// A reported event, with the test id rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Ignored(String),
    Finished(String),
    Failed(String, Failure),
}

/// Reporter that keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for RecordingReporter {
    fn started(&mut self, id: &TestId<'_>) {
        self.events.push(Event::Started(id.to_string()));
    }

    fn ignored(&mut self, id: &TestId<'_>) {
        self.events.push(Event::Ignored(id.to_string()));
    }

    fn finished(&mut self, id: &TestId<'_>) {
        self.events.push(Event::Finished(id.to_string()));
    }

    fn failed(&mut self, id: &TestId<'_>, failure: &Failure) {
        self.events.push(Event::Failed(id.to_string(), failure.clone()));
    }
}

/// Outcome of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub group: String,
    pub case: String,
    pub outcome: Outcome,
}

/// Counts and per-case outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub results: Vec<CaseResult>,
}

impl RunSummary {
    pub fn record(&mut self, group: &str, case: &str, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Ignored { .. } => self.ignored += 1,
            Outcome::Passed { .. } => self.passed += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.results.push(CaseResult {
            group: group.to_string(),
            case: case.to_string(),
            outcome,
        });
    }

    /// No case failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CaseResult, &Failure)> {
        self.results.iter().filter_map(|result| match &result.outcome {
            Outcome::Failed { failure } => Some((result, failure)),
            _ => None,
        })
    }

    pub fn outcome(&self, group: &str, case: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.group == group && r.case == case)
            .map(|r| &r.outcome)
    }

    /// Per-group (name, passed, failed, ignored), in run order
    pub fn by_group(&self) -> Vec<(&str, usize, usize, usize)> {
        let mut groups: Vec<(&str, usize, usize, usize)> = Vec::new();
        for result in &self.results {
            let index = match groups.iter().position(|g| g.0 == result.group) {
                Some(index) => index,
                None => {
                    groups.push((result.group.as_str(), 0, 0, 0));
                    groups.len() - 1
                }
            };
            let entry = &mut groups[index];
            match result.outcome {
                Outcome::Passed { .. } => entry.1 += 1,
                Outcome::Failed { .. } => entry.2 += 1,
                Outcome::Ignored { .. } => entry.3 += 1,
            }
        }
        groups
    }

    fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed > 0 {
            self.passed as f64 / executed as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Generate a markdown compliance report
pub fn generate_report(summary: &RunSummary) -> String {
    let mut report = String::new();

    report.push_str("# JSONata Conformance Report\n\n");

    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Count |\n");
    report.push_str("|--------|-------|\n");
    report.push_str(&format!("| Total Cases | {} |\n", summary.total));
    report.push_str(&format!(
        "| Passed | {} ({:.1}% of executed) |\n",
        summary.passed,
        summary.pass_rate()
    ));
    report.push_str(&format!("| Failed | {} |\n", summary.failed));
    report.push_str(&format!("| Ignored | {} |\n", summary.ignored));
    report.push('\n');

    report.push_str("## Results by Group\n\n");
    report.push_str("| Group | Passed | Failed | Ignored |\n");
    report.push_str("|-------|--------|--------|---------|\n");
    for (group, passed, failed, ignored) in summary.by_group() {
        report.push_str(&format!("| {} | {} | {} | {} |\n", group, passed, failed, ignored));
    }
    report.push('\n');

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        report.push_str("## Failed Cases\n\n");
        for (result, failure) in failures {
            report.push_str(&format!("### {}/{}\n\n", result.group, result.case));
            match failure {
                Failure::Mismatch { expected, actual } => {
                    report.push_str("Expected:\n\n```json\n");
                    report.push_str(expected);
                    report.push_str("\n```\n\nActual:\n\n```json\n");
                    report.push_str(actual);
                    report.push_str("\n```\n\n");
                }
                other => report.push_str(&format!("{}\n\n", other)),
            }
        }
    }

    report
}
