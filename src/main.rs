//! repo-explorer command-line entry point.

use anyhow::Result;

fn main() -> Result<()> {
    repo_explorer::cli::run()
}
