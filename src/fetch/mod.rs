//! Repository fetching (GitHub clones and local directories)

use crate::domain::ClonePolicy;
use crate::error::Result;
use std::path::Path;

pub mod cloner;
pub mod context;
pub mod github;
pub mod local;
pub mod workspace;

pub use cloner::{cleanup, RepoCloner};
pub use context::RepoContext;
pub use github::parse_github_url;
pub use workspace::Workspace;

/// Resolve `target` to a checkout.
///
/// An existing local directory is used in place; anything else is treated as
/// a GitHub URL and cloned. Under [`ClonePolicy::Fresh`] the clone is
/// temporary and removed on drop; a reused checkout is left in place.
pub fn fetch_repository(target: &str, cloner: &RepoCloner, force_refresh: bool) -> Result<RepoContext> {
    let path = Path::new(target);
    if path.is_dir() {
        local::validate_local_path(path)
    } else {
        let root = cloner.clone_repo(target, force_refresh)?;
        Ok(RepoContext::new(root, cloner.clone_policy() == ClonePolicy::Fresh))
    }
}
