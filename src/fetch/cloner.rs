//! Cloning repositories into the scratch root and removing them again.

use crate::domain::{ClonePolicy, Config, RepoInfo};
use crate::error::{ExplorerError, Result};
use crate::fetch::github::{clone_into, normalize_github_url, parse_github_url, pull_fast_forward};
use std::fs;
use std::path::{Path, PathBuf};

/// Materializes remote repositories as directories under a scratch root.
#[derive(Debug, Clone)]
pub struct RepoCloner {
    scratch_root: PathBuf,
    policy: ClonePolicy,
    depth: u32,
    mirror: Option<String>,
}

impl RepoCloner {
    pub fn new(scratch_root: PathBuf) -> Self {
        Self { scratch_root, policy: ClonePolicy::Fresh, depth: 1, mirror: None }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scratch_root.clone())
            .policy(config.clone_policy)
            .depth(config.clone_depth)
            .mirror(config.clone_mirror.clone())
    }

    /// Set the directory naming / reuse policy
    pub fn policy(mut self, policy: ClonePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set clone depth (0 = full history)
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Fetch `{mirror}/{owner}/{repo}` instead of the GitHub URL itself.
    pub fn mirror(mut self, mirror: Option<String>) -> Self {
        self.mirror = mirror.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn clone_policy(&self) -> ClonePolicy {
        self.policy
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Clone a GitHub repository and return the checkout directory.
    pub fn clone_repo(&self, url: &str, force_refresh: bool) -> Result<PathBuf> {
        let info = parse_github_url(url)?;
        let source = match &self.mirror {
            Some(mirror) => {
                format!("{}/{}/{}", mirror.trim_end_matches('/'), info.owner, info.repo)
            }
            None => normalize_github_url(url),
        };
        self.clone_as(&source, &info, force_refresh)
    }

    /// Clone `url` using `info` to name the checkout.
    ///
    /// Split from [`RepoCloner::clone_repo`] so any git transport (including
    /// `file://`) can be cloned under a GitHub-style name.
    pub fn clone_as(&self, url: &str, info: &RepoInfo, force_refresh: bool) -> Result<PathBuf> {
        fs::create_dir_all(&self.scratch_root).map_err(|e| {
            ExplorerError::clone_failed(
                format!("cannot create scratch root {}", self.scratch_root.display()),
                e,
            )
        })?;

        let dest = match self.policy {
            ClonePolicy::Fresh => self.fresh_dir(info),
            ClonePolicy::Reuse => {
                let dest = self.scratch_root.join(sanitize_component(&info.slug()));
                if dest.exists() {
                    if !force_refresh {
                        if let Err(e) = pull_fast_forward(&dest, self.depth) {
                            tracing::warn!(
                                path = %dest.display(),
                                error = %e,
                                "Pull failed; serving existing checkout"
                            );
                        }
                        return Ok(dest);
                    }
                    tracing::info!(path = %dest.display(), "Refreshing existing checkout");
                    cleanup(&dest);
                }
                dest
            }
        };

        tracing::info!(url, dest = %dest.display(), depth = self.depth, "Cloning repository");
        match clone_into(url, &dest, self.depth) {
            Ok(()) => Ok(dest),
            Err(e) => {
                cleanup(&dest);
                Err(ExplorerError::clone_failed(format!("{url}: {}", e.message()), e))
            }
        }
    }

    /// `{owner}-{repo}-{millis}`, with a numeric suffix if two clones land in
    /// the same millisecond.
    fn fresh_dir(&self, info: &RepoInfo) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        let base = sanitize_component(&format!("{}-{millis}", info.slug()));
        let mut candidate = self.scratch_root.join(&base);
        let mut n = 1u32;
        while candidate.exists() {
            candidate = self.scratch_root.join(format!("{base}-{n}"));
            n += 1;
        }
        candidate
    }
}

/// Remove a checkout directory.
///
/// A missing directory is not an error; other failures are logged and
/// swallowed so they never mask the caller's primary error.
pub fn cleanup(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed checkout"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Error cleaning up repository")
        }
    }
}

/// Restrict a directory name to `[A-Za-z0-9._-]`.
fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    /// Create a repository with one commit on `main` and return its `file://` URL.
    fn make_origin(dir: &Path, file: &str, content: &str) -> String {
        let repo = Repository::init(dir).expect("init origin");
        commit_file(&repo, dir, file, content, "initial");
        repo.set_head("refs/heads/main").expect("set head");
        format!("file://{}", dir.display())
    }

    fn commit_file(repo: &Repository, dir: &Path, file: &str, content: &str, msg: &str) {
        fs::write(dir.join(file), content).expect("write file");
        let mut index = repo.index().expect("index");
        index.add_path(Path::new(file)).expect("add");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let sig = Signature::now("Test", "test@example.com").expect("sig");
        let parent = repo.find_reference("refs/heads/main").ok().and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("refs/heads/main"), &sig, &sig, msg, &tree, &parents).expect("commit");
    }

    fn info() -> RepoInfo {
        RepoInfo { owner: "acme".into(), repo: "widgets".into(), branch: "main".into() }
    }

    #[test]
    fn test_fresh_clone_names_directory_and_checks_out_files() {
        let origin = TempDir::new().unwrap();
        let url = make_origin(origin.path(), "README.md", "# Widgets\n");
        let scratch = TempDir::new().unwrap();

        let cloner = RepoCloner::new(scratch.path().to_path_buf()).depth(0);
        let path = cloner.clone_as(&url, &info(), false).expect("clone");

        assert!(path.starts_with(scratch.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("acme-widgets-"), "unexpected dir name {name}");
        assert_eq!(fs::read_to_string(path.join("README.md")).unwrap(), "# Widgets\n");
    }

    #[test]
    fn test_fresh_clones_never_collide() {
        let origin = TempDir::new().unwrap();
        let url = make_origin(origin.path(), "a.txt", "a");
        let scratch = TempDir::new().unwrap();

        let cloner = RepoCloner::new(scratch.path().to_path_buf()).depth(0);
        let first = cloner.clone_as(&url, &info(), false).unwrap();
        let second = cloner.clone_as(&url, &info(), false).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_failed_clone_leaves_nothing_behind() {
        let scratch = TempDir::new().unwrap();
        let missing = scratch.path().join("no-such-origin");
        let url = format!("file://{}", missing.display());

        let cloner =
            RepoCloner::new(scratch.path().join("checkouts")).policy(ClonePolicy::Reuse);
        let err = cloner.clone_as(&url, &info(), false).unwrap_err();
        assert!(matches!(err, ExplorerError::Clone { .. }), "got {err:?}");
        assert!(!scratch.path().join("checkouts").join("acme-widgets").exists());
    }

    #[test]
    fn test_clone_rejects_non_github_url_before_cloning() {
        let scratch = TempDir::new().unwrap();
        let cloner = RepoCloner::new(scratch.path().join("checkouts"));
        let err = cloner.clone_repo("https://example.com/acme/widgets", false).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput(_)));
        assert!(!scratch.path().join("checkouts").exists());
    }

    #[test]
    fn test_clone_repo_fetches_from_mirror() {
        let mirror = TempDir::new().unwrap();
        let origin = mirror.path().join("acme").join("widgets");
        fs::create_dir_all(&origin).unwrap();
        make_origin(&origin, "README.md", "# Mirrored\n");
        let scratch = TempDir::new().unwrap();

        let cloner = RepoCloner::new(scratch.path().to_path_buf())
            .depth(0)
            .mirror(Some(format!("file://{}/", mirror.path().display())));
        let path = cloner
            .clone_repo("https://github.com/acme/widgets", false)
            .expect("clone from mirror");

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("acme-widgets-"));
        assert_eq!(fs::read_to_string(path.join("README.md")).unwrap(), "# Mirrored\n");
    }

    #[test]
    fn test_blank_mirror_is_ignored() {
        let cloner = RepoCloner::new(PathBuf::from("/tmp")).mirror(Some("  ".into()));
        assert!(cloner.mirror.is_none());
    }

    #[test]
    fn test_reuse_policy_pulls_existing_checkout() {
        let origin = TempDir::new().unwrap();
        let url = make_origin(origin.path(), "a.txt", "v1");
        let scratch = TempDir::new().unwrap();
        let cloner =
            RepoCloner::new(scratch.path().to_path_buf()).policy(ClonePolicy::Reuse).depth(0);

        let first = cloner.clone_as(&url, &info(), false).unwrap();
        assert_eq!(first, scratch.path().join("acme-widgets"));

        let repo = Repository::open(origin.path()).unwrap();
        commit_file(&repo, origin.path(), "b.txt", "new", "second");

        let second = cloner.clone_as(&url, &info(), false).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(second.join("b.txt")).unwrap(), "new");
    }

    #[test]
    fn test_reuse_policy_serves_stale_checkout_when_pull_fails() {
        let origin = TempDir::new().unwrap();
        let url = make_origin(origin.path(), "a.txt", "v1");
        let scratch = TempDir::new().unwrap();
        let cloner =
            RepoCloner::new(scratch.path().to_path_buf()).policy(ClonePolicy::Reuse).depth(0);

        let first = cloner.clone_as(&url, &info(), false).unwrap();
        drop(origin);

        let second = cloner.clone_as(&url, &info(), false).expect("stale checkout served");
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(second.join("a.txt")).unwrap(), "v1");
    }

    #[test]
    fn test_force_refresh_replaces_existing_checkout() {
        let origin = TempDir::new().unwrap();
        let url = make_origin(origin.path(), "a.txt", "v1");
        let scratch = TempDir::new().unwrap();
        let cloner =
            RepoCloner::new(scratch.path().to_path_buf()).policy(ClonePolicy::Reuse).depth(0);

        let path = cloner.clone_as(&url, &info(), false).unwrap();
        fs::write(path.join("local-only.txt"), "scratch").unwrap();

        let refreshed = cloner.clone_as(&url, &info(), true).unwrap();
        assert_eq!(path, refreshed);
        assert!(!refreshed.join("local-only.txt").exists());
        assert!(refreshed.join("a.txt").exists());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let scratch = TempDir::new().unwrap();
        let dir = scratch.path().join("acme-widgets-1");
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("src/lib.rs"), "").unwrap();

        cleanup(&dir);
        assert!(!dir.exists());
        cleanup(&dir);
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("acme-widgets"), "acme-widgets");
        assert_eq!(sanitize_component("a b/c"), "a_b_c");
        assert_eq!(sanitize_component(".."), "_..");
    }
}
