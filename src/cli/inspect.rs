//! Inspect command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::collections::HashSet;

use super::utils::render_tree;
use crate::domain::{Config, FileNode, RepoStats};
use crate::fetch::{fetch_repository, RepoCloner};
use crate::important::find_important_files;
use crate::scan::build_file_tree;
use crate::server::models::AnalyzedFile;
use crate::stats::collect_repo_stats;
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct InspectArgs {
    /// GitHub repository URL or local directory
    #[arg(value_name = "URL|PATH")]
    pub target: String,

    /// Keep the clone in the scratch root instead of removing it
    #[arg(long)]
    pub keep: bool,

    /// Re-clone even if a reusable checkout exists
    #[arg(long)]
    pub force_refresh: bool,

    /// Print a JSON document instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Depth of the printed tree
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub tree_depth: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_path: Option<String>,
    stats: RepoStats,
    important_files: Vec<AnalyzedFile>,
    files: Vec<FileNode>,
}

pub fn run(args: InspectArgs, config: &Config) -> Result<()> {
    let cloner = RepoCloner::from_config(config);
    let context = fetch_repository(&args.target, &cloner, args.force_refresh)
        .with_context(|| format!("Failed to fetch {}", args.target))?;
    let root = context.path().to_path_buf();
    tracing::debug!(root = %root.display(), temporary = context.is_temp, "Inspecting repository");

    let files = build_file_tree(&root)?;
    let stats = collect_repo_stats(&root)?;
    let important: Vec<AnalyzedFile> = find_important_files(&root, config.summary_max_bytes)
        .iter()
        .map(AnalyzedFile::from)
        .collect();

    // Reused checkouts stay in the scratch root, so they are reported like kept ones.
    let kept = match (context.is_temp, args.keep) {
        (true, true) => Some(context.keep()),
        (false, _) if root.starts_with(cloner.scratch_root()) => Some(root.clone()),
        _ => None,
    };
    let repo_name = root.file_name().and_then(|n| n.to_str()).unwrap_or(".").to_string();

    if args.json {
        let report = InspectReport {
            repo_path: kept.as_ref().map(|p| p.display().to_string()),
            stats,
            important_files: important,
            files,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Repository: {}", repo_name);
    if !stats.languages.is_empty() {
        println!("Languages:");
        for lang in &stats.languages {
            println!(
                "  {}: {:.1}% ({} bytes)",
                lang.name,
                lang.percentage,
                format_with_commas(lang.bytes)
            );
        }
    }

    println!("Statistics:");
    println!("  Files: {}", format_with_commas(stats.file_count));
    println!("  Recognized bytes: {}", format_with_commas(stats.total_bytes));
    println!("  License: {}", stats.license.as_deref().unwrap_or("none"));
    println!("  README: {}", if stats.readme.is_some() { "yes" } else { "no" });

    if !important.is_empty() {
        println!("Important files:");
        for file in &important {
            println!("  {} ({})", file.path, file.reason);
        }
    }

    let highlighted: HashSet<String> = important.iter().map(|f| f.path.clone()).collect();
    println!("\n{}", render_tree(&repo_name, &files, args.tree_depth, &highlighted));

    if let Some(path) = kept {
        println!("\nCheckout kept at {}", path.display());
    }

    Ok(())
}
