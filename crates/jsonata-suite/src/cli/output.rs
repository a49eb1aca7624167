//! Output formatting and logging

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    /// Parse a `--format` value; unknown names fall back to `default`
    pub fn parse_or(s: Option<&str>, default: Self) -> Self {
        match s.map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") | Some("json-pretty") => Self::JsonPretty,
            Some("table") | Some("text") => Self::Table,
            _ => default,
        }
    }

    pub fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize a value for JSON output
pub fn format_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Log filter: `debug` when verbose, else `RUST_LOG` falling back to `info`
pub fn log_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the stderr subscriber; `log` records from the library crates are forwarded to it
pub fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, env_directives.as_deref());

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(colored::control::SHOULD_COLORIZE.should_colorize()),
        )
        .try_init();
    if let Err(e) = installed {
        eprintln!("{}", format_warning(&format!("Logging not initialized: {}", e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("json"), OutputFormat::Json)]
    #[case(Some("JSON-Pretty"), OutputFormat::JsonPretty)]
    #[case(Some("table"), OutputFormat::Table)]
    #[case(Some("yaml"), OutputFormat::Table)]
    #[case(None, OutputFormat::Table)]
    fn test_output_format(#[case] input: Option<&str>, #[case] expected: OutputFormat) {
        assert_eq!(OutputFormat::parse_or(input, OutputFormat::Table), expected);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[rstest]
    #[case(true, None, "debug")]
    #[case(true, Some("warn"), "debug")]
    #[case(false, None, "info")]
    #[case(false, Some("warn"), "warn")]
    #[case(false, Some("fields=loud"), "info")]
    fn test_log_filter(#[case] verbose: bool, #[case] env: Option<&str>, #[case] expected: &str) {
        assert_eq!(log_filter(verbose, env).to_string(), expected);
    }

    #[test]
    fn test_format_json() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(format_json(&value, false).unwrap(), "{\"a\":1}");
        assert_eq!(format_json(&value, true).unwrap(), "{\n  \"a\": 1\n}");
    }
}
