//! testmetrics CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "testmetrics",
    version,
    about = "Per-subject accuracy and score metrics for test series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Marking options shared by commands that compute metrics.
#[derive(Args, Debug, Clone, Default)]
pub struct MarkArgs {
    /// Credit per correct answer (overrides config)
    #[arg(long)]
    pub positive_mark: Option<f64>,

    /// Penalty per wrong answer, as a non-negative magnitude (overrides config)
    #[arg(long)]
    pub negative_mark: Option<f64>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute derived metrics for every test
    Compute {
        /// Path to the two-row-header CSV of raw counters
        #[arg(long)]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, json
        #[arg(long)]
        format: Option<String>,

        #[command(flatten)]
        marks: MarkArgs,
    },

    /// Show the latest metrics with change since the previous test
    Summary {
        /// Path to the two-row-header CSV of raw counters
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        marks: MarkArgs,
    },

    /// Validate an input CSV without computing metrics
    Validate {
        /// Path to the two-row-header CSV of raw counters
        #[arg(long)]
        input: PathBuf,
    },

    /// Create starter config and example input
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("testmetrics=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute {
            input,
            output,
            format,
            marks,
        } => commands::compute::execute(input, output, format, marks),
        Commands::Summary { input, marks } => commands::summary::execute(input, marks),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
