//! graphgate command-line tool
//!
//! Checks query documents against admission limits without running them.

mod commands;
mod formatter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;

/// graphgate command-line tool
#[derive(Parser, Debug)]
#[command(name = "graphgate")]
#[command(version, about = "Query admission checks for graphgate")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure a query's depth and complexity and decide whether it is admitted
    Analyze(AnalyzeArgs),

    /// Validate a configuration and print the effective values as JSON
    Config {
        /// JSON configuration file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// File holding the query document
    pub query_file: PathBuf,

    /// JSON file holding variable values
    #[arg(long)]
    pub variables: Option<PathBuf>,

    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the maximum depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Override the maximum complexity
    #[arg(long)]
    pub max_complexity: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Exit status for a query that parsed but was rejected.
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphgate=info")),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    match args.command {
        Command::Analyze(analyze) => {
            let format = analyze.format;
            let analysis = commands::analyze(&analyze)?;
            println!("{}", formatter::format_analysis(&analysis, format)?);
            if analysis.admitted() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_REJECTED))
            }
        }
        Command::Config { config } => {
            let config = commands::effective_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
