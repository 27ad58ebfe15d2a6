//! Cleanup command implementation

use anyhow::Result;
use clap::Args;

use crate::domain::Config;
use crate::error::ExplorerError;
use crate::fetch::{cleanup, Workspace};

#[derive(Args)]
pub struct CleanupArgs {
    /// Checkout directory, absolute or relative to the scratch root
    #[arg(value_name = "PATH")]
    pub path: String,
}

pub fn run(args: CleanupArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(config.scratch_root.clone());

    match workspace.resolve_checkout(&args.path) {
        Ok(checkout) => {
            cleanup(&checkout);
            println!("Removed {}", checkout.display());
        }
        Err(ExplorerError::NotFound(_)) => {
            println!("Nothing to remove at {}", args.path);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
