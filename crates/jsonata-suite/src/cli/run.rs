//! Run command implementation

use super::output::{self, OutputFormat};
use super::process::ProcessEvaluator;
use super::suite::SuiteOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use jsonata_suite_diagnostics::Failure;
use jsonata_suite_runner::{generate_report, Reporter, RunSummary, SuiteRunner, TestId};
use std::fs;
use std::path::PathBuf;

/// Configuration for run command
pub struct RunConfig {
    pub suite: SuiteOptions,
    pub evaluator: String,
    pub evaluator_args: Vec<String>,
    pub report: Option<PathBuf>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Run the suite and print the summary, exiting with status 1 if any case failed
pub fn run(config: RunConfig) -> Result<()> {
    let summary = execute(&config)?;

    let format = OutputFormat::parse_or(config.output_format.as_deref(), OutputFormat::Table);
    if format.is_json() {
        let content = output::format_json(&summary, format == OutputFormat::JsonPretty)?;
        output::write_output(&content, config.output_file.as_deref())?;
    } else {
        print_summary(&summary);
    }

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Load, run and optionally write the markdown report
pub fn execute(config: &RunConfig) -> Result<RunSummary> {
    let skip = config.suite.skip_registry()?;
    let tree = config.suite.load_tree()?;
    if tree.case_count() == 0 {
        eprintln!("{}", output::format_warning("No cases to run"));
    }

    let evaluator = ProcessEvaluator::new(&config.evaluator, config.evaluator_args.clone());
    log::info!("Running {} cases with {}", tree.case_count(), evaluator.program());

    let runner = SuiteRunner::new(evaluator, skip);
    let mut reporter = ConsoleReporter::new(config.verbose);
    let summary = runner.run(&tree, &mut reporter);

    if let Some(path) = &config.report {
        fs::write(path, generate_report(&summary))
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        eprintln!(
            "{}",
            output::format_success(&format!("Report written to {}", path.display()))
        );
    }

    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!();
    let counts = format!(
        "{} passed, {} failed, {} ignored ({} total)",
        summary.passed, summary.failed, summary.ignored, summary.total
    );
    if summary.is_success() {
        println!("{}", output::format_success(&counts));
    } else {
        eprintln!("{} {}", "Suite failed:".red().bold(), counts);
    }
}

/// Reporter printing one line per group, plus every failure
///
/// Verbose mode also prints passed and ignored cases and full failure messages.
pub struct ConsoleReporter {
    verbose: bool,
    passed: usize,
    failed: usize,
    ignored: usize,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            passed: 0,
            failed: 0,
            ignored: 0,
        }
    }

    /// Mismatches always print their diff; other failures print in full only when verbose
    fn shows_details(&self, failure: &Failure) -> bool {
        self.verbose || matches!(failure, Failure::Mismatch { .. })
    }

    fn reset(&mut self) {
        self.passed = 0;
        self.failed = 0;
        self.ignored = 0;
    }
}

impl Reporter for ConsoleReporter {
    fn started(&mut self, id: &TestId<'_>) {
        if id.is_group() {
            self.reset();
        }
    }

    fn ignored(&mut self, id: &TestId<'_>) {
        if id.is_group() {
            println!("{} {} {}", "-".yellow(), id.group.bold(), "ignored".yellow());
            return;
        }
        self.ignored += 1;
        if self.verbose {
            println!("  {} {}", "-".yellow(), id);
        }
    }

    fn finished(&mut self, id: &TestId<'_>) {
        if !id.is_group() {
            self.passed += 1;
            if self.verbose {
                println!("  {} {}", "✓".green(), id);
            }
            return;
        }

        let status = if self.failed == 0 {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        let mut counts = vec![format!("{} passed", self.passed)];
        if self.failed > 0 {
            counts.push(format!("{} failed", self.failed).red().to_string());
        }
        if self.ignored > 0 {
            counts.push(format!("{} ignored", self.ignored).yellow().to_string());
        }
        println!("{} {} ({})", status, id.group.bold(), counts.join(", "));
    }

    fn failed(&mut self, id: &TestId<'_>, failure: &Failure) {
        self.failed += 1;
        if !self.shows_details(failure) {
            println!("  {} {}: {}", "✗".red(), id.to_string().red(), failure.headline());
            return;
        }
        println!("  {} {}", "✗".red(), id.to_string().red());
        for line in failure.to_colored_string().lines() {
            println!("      {}", line);
        }
    }
}
