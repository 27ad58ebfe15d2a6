//! Checkout lifetime management

use std::path::{Path, PathBuf};

/// A checkout being processed.
///
/// Temporary checkouts are removed through [`crate::fetch::cleanup`] when the
/// context is dropped, unless [`RepoContext::keep`] was called.
pub struct RepoContext {
    pub root_path: PathBuf,
    pub is_temp: bool,
}

impl RepoContext {
    pub fn new(root_path: PathBuf, is_temp: bool) -> Self {
        Self { root_path, is_temp }
    }

    pub fn path(&self) -> &Path {
        &self.root_path
    }

    /// Detach the checkout from this context so it survives the drop.
    pub fn keep(mut self) -> PathBuf {
        self.is_temp = false;
        std::mem::take(&mut self.root_path)
    }
}

impl Drop for RepoContext {
    fn drop(&mut self) {
        if self.is_temp {
            crate::fetch::cleanup(&self.root_path);
        }
    }
}
