//! Serve command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::domain::{ClonePolicy, Config};
use crate::server;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory that holds cloned checkouts
    #[arg(long, value_name = "DIR")]
    pub scratch_root: Option<PathBuf>,

    /// Checkout naming policy: fresh or reuse
    #[arg(long, value_name = "POLICY")]
    pub clone_policy: Option<ClonePolicy>,

    /// Completion model name
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,
}

pub fn run(args: ServeArgs, config: Config) -> Result<()> {
    let config = CliOverrides {
        bind: args.bind,
        scratch_root: args.scratch_root,
        clone_policy: args.clone_policy,
        llm_model: args.model,
    }
    .apply(config);

    if config.resolved_llm_api_key().is_none() {
        tracing::warn!("No LLM API key configured; summary and chat requests will fail");
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(&config))
}
