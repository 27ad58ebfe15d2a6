//! Repository statistics: language histogram, file count, license and README.

pub mod languages;

pub use languages::{highlight_language, language_for_path};

use crate::domain::{language_breakdown, RepoStats};
use crate::error::{ExplorerError, Result};
use crate::scan::reader::read_repo_bytes;
use crate::scan::should_skip_entry;
use crate::utils::decode_text;
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

const LICENSE_FILES: &[&str] = &["LICENSE", "LICENSE.md", "LICENSE.txt", "license"];
const README_FILES: &[&str] = &["README.md", "README", "readme.md", "readme"];

/// Substring → license family, checked in order.
const LICENSE_MARKERS: &[(&str, &str)] =
    &[("MIT", "MIT"), ("Apache", "Apache"), ("GPL", "GPL"), ("BSD", "BSD")];

#[derive(Debug, Default)]
struct WalkTotals {
    by_language: HashMap<&'static str, u64>,
    file_count: u64,
}

/// Compute [`RepoStats`] for a checkout.
///
/// `total_bytes` is the sum over recognized languages only, so the listed
/// percentages always add up to 100 (or the list is empty).
pub fn collect_repo_stats(root: &Path) -> Result<RepoStats> {
    let totals = walk_totals(root)?;
    let (languages, total_bytes) = language_breakdown(
        totals.by_language.into_iter().map(|(name, bytes)| (name.to_string(), bytes)),
    );

    Ok(RepoStats {
        languages,
        total_bytes,
        file_count: totals.file_count,
        license: find_license(root)?,
        readme: find_readme(root)?,
    })
}

fn walk_totals(root: &Path) -> Result<WalkTotals> {
    let mut totals = WalkTotals::default();

    let walker = WalkDir::new(root).follow_links(false).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !should_skip_entry(&entry.file_name().to_string_lossy(), entry.file_type().is_dir())
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(ExplorerError::read(root, e.into())),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry during stats walk");
                continue;
            }
        };

        if entry.depth() == 0 {
            if !entry.file_type().is_dir() {
                return Err(ExplorerError::read(
                    root,
                    std::io::Error::new(std::io::ErrorKind::Other, "repository root is not a directory"),
                ));
            }
            continue;
        }
        if entry.file_type().is_dir() {
            continue;
        }

        // Symlinks are listed as files in the tree, so they count here too.
        totals.file_count += 1;
        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(language) = language_for_path(entry.path()) {
            match entry.metadata() {
                Ok(metadata) => *totals.by_language.entry(language).or_insert(0) += metadata.len(),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Cannot stat file")
                }
            }
        }
    }

    Ok(totals)
}

/// Classify the first conventional license file found in `root`.
///
/// Returns `None` when no license file exists and `"Other"` when one exists
/// but mentions none of the known families.
pub fn find_license(root: &Path) -> Result<Option<String>> {
    let Some(content) = read_first_existing(root, LICENSE_FILES)? else {
        return Ok(None);
    };
    Ok(Some(classify_license(&content).to_string()))
}

pub fn classify_license(content: &str) -> &'static str {
    LICENSE_MARKERS
        .iter()
        .find(|(marker, _)| content.contains(marker))
        .map(|(_, family)| *family)
        .unwrap_or("Other")
}

/// Raw content of the first conventional README file found in `root`.
pub fn find_readme(root: &Path) -> Result<Option<String>> {
    read_first_existing(root, README_FILES)
}

/// Candidates that are missing, directories, or symlinks leading out of
/// `root` are treated as absent.
fn read_first_existing(root: &Path, names: &[&str]) -> Result<Option<String>> {
    for name in names {
        if root.join(name).is_dir() {
            continue;
        }
        match read_repo_bytes(root, name) {
            Ok(bytes) => return Ok(Some(decode_text(&bytes))),
            Err(ExplorerError::NotFound(_)) => continue,
            Err(ExplorerError::InvalidPath(reason)) => {
                tracing::warn!(file = %name, %reason, "Ignoring file outside the checkout");
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}
