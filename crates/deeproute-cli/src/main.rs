//! deeproute CLI - offline path selection with bandit policies
//!
//! Plays a selection policy against a recorded reward table and reports
//! the selection log, per-path statistics, total reward and regret.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod settings;

use commands::{compare, config, generate, run};
use settings::{LogFormat, LoggingSettings, Settings};

#[derive(Parser)]
#[command(name = "deeproute")]
#[command(author, version, about = "deeproute - bandit path selection over recorded rewards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to DEEPROUTE_CONFIG or ./deeproute.toml)
    #[arg(short, long, global = true, env = "DEEPROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one policy against a reward table
    Run(run::RunArgs),

    /// Run every policy against the same reward table
    Compare(compare::CompareArgs),

    /// Generate a random reward table
    Generate(generate::GenerateArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.logging, cli.verbose);

    match &settings.source {
        Some(path) => debug!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match cli.command {
        Commands::Run(args) => run::run(args, settings),
        Commands::Compare(args) => compare::run(args, settings),
        Commands::Generate(args) => generate::run(args),
        Commands::Config(cmd) => config::run(cmd, &settings),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable
fn init_tracing(logging: &LoggingSettings, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("deeproute={level},deeproute_core={level},deeproute_bandit={level}").into()
    });

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
