//! GitHub URL parsing and git2 clone/pull primitives

use crate::domain::RepoInfo;
use crate::error::{ExplorerError, Result};
use git2::{build::CheckoutBuilder, FetchOptions, Repository};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s]+?)(?:\.git)?$").expect("valid GitHub URL regex")
});

/// Extract `{owner, repo, branch}` from a GitHub URL.
///
/// Accepts HTTPS (`https://github.com/owner/repo`) and SSH
/// (`git@github.com:owner/repo.git`) forms, with or without `.git` and a
/// trailing slash. The branch is always `main`.
pub fn parse_github_url(url: &str) -> Result<RepoInfo> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ExplorerError::invalid_input("GitHub URL is required"));
    }

    let caps = GITHUB_URL.captures(trimmed).ok_or_else(|| {
        ExplorerError::invalid_input(
            "Invalid GitHub URL. Please provide a valid GitHub repository URL (e.g., https://github.com/owner/repo)",
        )
    })?;

    let repo = caps[2].trim_end_matches(".git");
    if repo.is_empty() {
        return Err(ExplorerError::invalid_input(format!("Missing repository name in {url}")));
    }

    Ok(RepoInfo { owner: caps[1].to_string(), repo: repo.to_string(), branch: "main".to_string() })
}

/// Normalize a GitHub URL to the canonical `.git` form.
///
/// - `https://github.com/owner/repo`    → `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo/`   → `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`    → unchanged
/// - non-GitHub URLs                    → trailing slash stripped only
pub fn normalize_github_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.contains("github.com") && !trimmed.ends_with(".git") {
        format!("{}.git", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Clone `url` into `dest`, shallow when `depth > 0`.
///
/// A failed shallow clone is retried as a full clone; some transports do not
/// support depth-limited fetches.
pub fn clone_into(url: &str, dest: &Path, depth: u32) -> std::result::Result<(), git2::Error> {
    if depth > 0 {
        match shallow_clone(url, dest, depth) {
            Ok(_) => return Ok(()),
            Err(e) => {
                tracing::debug!(url, error = %e, "Shallow clone failed, retrying with full clone");
                // A half-written checkout makes the retry fail with "exists and is not empty".
                let _ = std::fs::remove_dir_all(dest);
            }
        }
    }
    Repository::clone(url, dest).map(|_| ())
}

fn shallow_clone(url: &str, dest: &Path, depth: u32) -> std::result::Result<Repository, git2::Error> {
    let mut fo = FetchOptions::new();
    fo.depth(depth as i32);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fo);
    builder.clone(url, dest)
}

/// Fetch `origin` and fast-forward the checked-out branch.
///
/// Fails when HEAD is detached, `origin` is missing, or the update is not a
/// fast-forward. Callers treat every failure as "keep the existing checkout".
pub fn pull_fast_forward(path: &Path, depth: u32) -> std::result::Result<(), git2::Error> {
    let repo = Repository::open(path)?;
    let head = repo.head()?;
    if !head.is_branch() {
        return Err(git2::Error::from_str("HEAD is detached"));
    }
    let branch = head
        .shorthand()
        .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8"))?
        .to_string();
    drop(head);

    let mut remote = repo.find_remote("origin")?;
    let mut fo = FetchOptions::new();
    if depth > 0 {
        fo.depth(depth as i32);
    }
    remote.fetch(&[branch.as_str()], Some(&mut fo), None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

    if analysis.is_up_to_date() {
        return Ok(());
    }
    if !analysis.is_fast_forward() {
        return Err(git2::Error::from_str("remote history is not a fast-forward"));
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(fetch_commit.id(), "repo-explorer: fast-forward")?;
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
    Ok(())
}
