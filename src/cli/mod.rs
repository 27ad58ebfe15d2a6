//! Command-line interface for repo-explorer
//!
//! Provides `serve`, `inspect` and `cleanup` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;

mod cleanup;
mod inspect;
mod serve;
mod utils;

/// Browse GitHub repositories, their files and statistics, and chat about them
#[derive(Parser)]
#[command(name = "repo-explorer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML or YAML); otherwise repo-explorer.toml etc. is looked up
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Clone (or open) a repository and print its tree and statistics
    Inspect(inspect::InspectArgs),

    /// Remove a checkout from the scratch root
    Cleanup(cleanup::CleanupArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence.
    let level = match (&cli.command, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Commands::Serve(_), false) => Level::INFO,
        _ => Level::WARN,
    };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let work_dir = std::env::current_dir()?;
    let config = load_config(&work_dir, cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => serve::run(args, config),
        Commands::Inspect(args) => inspect::run(args, &config),
        Commands::Cleanup(args) => cleanup::run(args, &config),
    }
}
