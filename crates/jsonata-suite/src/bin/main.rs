//! JSONata conformance suite command-line interface

use clap::{Args, Parser, Subcommand};
use jsonata_suite::cli::{list, output, run, suite::SuiteOptions};
use std::path::PathBuf;

/// JSONata conformance suite tool
#[derive(Parser)]
#[command(name = "jsonata-suite")]
#[command(author, version, about = "Run the JSONata conformance suite against an evaluator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, pretty, table)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

/// Suite location and case selection
#[derive(Args)]
struct SuiteArgs {
    /// Suite root holding datasets/ and groups/
    root: PathBuf,

    /// Skip configuration file (JSON)
    #[arg(short, long = "skip-config")]
    skip_config: Option<PathBuf>,

    /// Do not skip the built-in known issues
    #[arg(long)]
    no_known_issues: bool,

    /// Only keep cases whose group/case name matches this regex
    #[arg(short = 'F', long)]
    filter: Option<String>,
}

impl From<SuiteArgs> for SuiteOptions {
    fn from(args: SuiteArgs) -> Self {
        Self {
            root: args.root,
            skip_config: args.skip_config,
            no_known_issues: args.no_known_issues,
            filter: args.filter,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite against an evaluator command
    Run {
        #[command(flatten)]
        suite: SuiteArgs,

        /// Evaluator command, run once per case
        #[arg(short, long)]
        evaluator: String,

        /// Argument passed to the evaluator command (repeatable)
        #[arg(short = 'a', long = "arg", allow_hyphen_values = true)]
        evaluator_args: Vec<String>,

        /// Write a markdown compliance report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// List the cases of the suite
    List {
        #[command(flatten)]
        suite: SuiteArgs,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Set up color output
    output::setup_colors(&cli.color);
    output::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            suite,
            evaluator,
            evaluator_args,
            report,
        } => {
            let config = run::RunConfig {
                suite: suite.into(),
                evaluator,
                evaluator_args,
                report,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            run::run(config)
        }

        Commands::List { suite } => {
            let config = list::ListConfig {
                suite: suite.into(),
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            list::list(config)
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
