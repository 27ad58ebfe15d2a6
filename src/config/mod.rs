//! Configuration loading and merging
//!
//! Precedence, lowest to highest: defaults, config file, `REPO_EXPLORER_*`
//! environment variables, command-line flags.

pub mod loader;

pub use loader::{load_config, ENV_PREFIX};

use crate::domain::{ClonePolicy, Config};
use std::path::PathBuf;

/// Values given on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub scratch_root: Option<PathBuf>,
    pub clone_policy: Option<ClonePolicy>,
    pub llm_model: Option<String>,
}

impl CliOverrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(root) = self.scratch_root {
            config.scratch_root = root;
        }
        if let Some(policy) = self.clone_policy {
            config.clone_policy = policy;
        }
        if let Some(model) = self.llm_model {
            config.llm_model = model;
        }
        config
    }
}
