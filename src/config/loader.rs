//! Config file discovery and layering

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables with this prefix override file values.
pub const ENV_PREFIX: &str = "REPO_EXPLORER_";

/// Table that may wrap the settings inside a shared config file.
const SECTION: &str = "repo-explorer";

const CANDIDATES: [&str; 5] = [
    "repo-explorer.toml",
    ".repo-explorer.toml",
    "repo-explorer.yml",
    "repo-explorer.yaml",
    ".repo-explorer.yaml",
];

/// Load configuration: defaults, then a config file, then `REPO_EXPLORER_*`.
///
/// An explicitly named file must exist and parse. A file discovered in
/// `work_dir` that fails to parse is reported and skipped.
pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(work_dir),
    };

    let defaults = Figment::from(Serialized::defaults(Config::default()));

    let Some(file) = file else {
        return extract(defaults);
    };

    let layered = read_config_file(&file).and_then(|values| {
        extract(defaults.clone().merge(Serialized::defaults(values)))
            .with_context(|| format!("Invalid config file: {}", file.display()))
    });

    match layered {
        Ok(config) => {
            tracing::debug!(path = %file.display(), "Loaded config file");
            Ok(config)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", file.display(), e);
            extract(defaults)
        }
    }
}

fn extract(figment: Figment) -> Result<Config> {
    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract::<Config>()
        .context("Invalid configuration")
}

/// Parse a TOML or YAML file into a JSON value, unwrapping a `[repo-explorer]` section.
fn read_config_file(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading config file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let mut value: serde_json::Value = match ext.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML syntax: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML syntax: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            path.display()
        ),
    };

    if let Some(section) = value.get_mut(SECTION) {
        value = section.take();
    }
    if value.is_null() {
        // An empty YAML document.
        value = serde_json::Value::Object(Default::default());
    }
    Ok(value)
}

fn discover_config(work_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| work_dir.join(name)).find(|path| path.is_file())
}
