use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod classifier;
mod config;
mod corpus;
mod metrics;
mod models;
mod ner;
mod output;
mod relation;
mod runner;
mod sparql;
mod tokenizer;

use crate::config::Config;
use crate::output::OutputFormat;
use crate::runner::Runner;

/// Knowledge-base question answering evaluation - answer corpus questions
/// against a SPARQL endpoint and score them against the gold answers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Verbose output - log progress for each question
    #[arg(short, long)]
    verbose: bool,
}

/// Install the log subscriber; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::load(args.config.as_deref())?;
    let mut runner = Runner::from_config(config)?;

    let report = runner.run().await?;

    output::print_results(&report, args.output);

    Ok(())
}
