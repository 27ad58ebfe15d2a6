//! Selection of conventionally important files to feed the summarizer.

use crate::domain::ImportantFile;
use crate::scan::reader::read_repo_bytes;
use crate::utils::{decode_text, relative_path};
use std::path::Path;
use walkdir::WalkDir;

/// Well-known files, in the order they are offered to the summarizer.
const IMPORTANT_FILES: &[(&str, &str)] = &[
    (README_PATH, "Contains project description, features, setup instructions"),
    ("package.json", "Shows dependencies, scripts, and project metadata"),
    (".env.example", "Shows required environment variables"),
    ("tsconfig.json", "Indicates TypeScript configuration and project structure"),
    ("app/layout.tsx", "Main layout structure"),
    ("app/page.tsx", "Main page/entry point"),
];

const README_PATH: &str = "README.md";

const API_FOLDER: &str = "app/api";
const API_ROUTE_FILES: &[&str] = &["route.ts", "route.js"];
const API_ROUTE_REASON: &str = "API route definition";

/// Collect important files from a checkout.
///
/// Missing files are skipped. Every `route.ts`/`route.js` below `app/api` is
/// appended in path order. Once the summed content reaches `max_bytes`, the
/// file that crossed the limit is truncated and selection stops.
pub fn find_important_files(root: &Path, max_bytes: usize) -> Vec<ImportantFile> {
    let mut selector = Selector { files: Vec::new(), remaining: max_bytes };

    for (path, reason) in IMPORTANT_FILES {
        match read_repo_bytes(root, path) {
            Ok(bytes) => {
                if !selector.push(path, reason, decode_text(&bytes)) {
                    return selector.files;
                }
            }
            Err(e) => tracing::debug!(path, error = %e, "Important file not present"),
        }
    }

    for route in find_api_routes(root) {
        match read_repo_bytes(root, &route) {
            Ok(bytes) => {
                if !selector.push(&route, API_ROUTE_REASON, decode_text(&bytes)) {
                    break;
                }
            }
            Err(e) => tracing::warn!(path = %route, error = %e, "Cannot read API route"),
        }
    }

    selector.files
}

/// Longest prefix of `readme` that fits in `max_bytes` next to the
/// non-README entries of `files`.
///
/// A `README.md` selected by [`find_important_files`] is the same text
/// already counted against the budget, so it is not counted twice.
pub fn fit_readme<'a>(readme: &'a str, files: &[ImportantFile], max_bytes: usize) -> &'a str {
    let used: usize =
        files.iter().filter(|f| f.path != README_PATH).map(|f| f.content.len()).sum();
    &readme[..floor_char_boundary(readme, max_bytes.saturating_sub(used))]
}

/// Largest char boundary of `s` at or below `max`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

struct Selector {
    files: Vec<ImportantFile>,
    remaining: usize,
}

impl Selector {
    /// Add a file, truncating to the remaining budget. Returns false once the
    /// budget is exhausted.
    fn push(&mut self, path: &str, reason: &str, mut content: String) -> bool {
        if self.remaining == 0 {
            return false;
        }
        if content.len() > self.remaining {
            let cut = floor_char_boundary(&content, self.remaining);
            if cut == 0 {
                // Not even one character fits; the budget is spent.
                self.remaining = 0;
                return false;
            }
            content.truncate(cut);
            tracing::debug!(path, "Important file truncated to fit summary budget");
        }
        self.remaining -= content.len();
        self.files.push(ImportantFile {
            path: path.to_string(),
            reason: reason.to_string(),
            content,
        });
        self.remaining > 0
    }
}

/// Repository-relative paths of API route files, sorted.
fn find_api_routes(root: &Path) -> Vec<String> {
    let api_dir = root.join(API_FOLDER);
    if !api_dir.is_dir() {
        tracing::debug!("API folder not found");
        return Vec::new();
    }

    let mut routes: Vec<String> = WalkDir::new(&api_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Error reading API directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.file_name().to_str().is_some_and(|name| API_ROUTE_FILES.contains(&name))
        })
        .filter_map(|entry| relative_path(root, entry.path()))
        .collect();
    routes.sort();
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_fixed_files_in_order_and_missing_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tsconfig.json", "{}");
        write(tmp.path(), "README.md", "# Demo");
        write(tmp.path(), ".env.example", "API_KEY=");

        let files = find_important_files(tmp.path(), 10_000);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", ".env.example", "tsconfig.json"]);
        assert_eq!(files[0].content, "# Demo");
        assert!(files[0].reason.contains("project description"));
    }

    #[test]
    fn test_api_routes_discovered_recursively() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "app/api/repo/clone/route.ts", "export async function POST() {}");
        write(tmp.path(), "app/api/chat/route.js", "export function POST() {}");
        write(tmp.path(), "app/api/chat/helpers.ts", "export {}");

        let files = find_important_files(tmp.path(), 10_000);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app/api/chat/route.js", "app/api/repo/clone/route.ts"]);
        assert!(files.iter().all(|f| f.reason == API_ROUTE_REASON));
    }

    #[test]
    fn test_no_files_yields_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(find_important_files(tmp.path(), 10_000).is_empty());
    }

    #[test]
    fn test_budget_truncates_and_stops() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", &"r".repeat(60));
        write(tmp.path(), "package.json", &"p".repeat(60));
        write(tmp.path(), "tsconfig.json", "{}");

        let files = find_important_files(tmp.path(), 100);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].content.len(), 60);
        assert_eq!(files[1].content.len(), 40);
        let total: usize = files.iter().map(|f| f.content.len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_budget_truncation_respects_char_boundaries() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "ééééé");

        let files = find_important_files(tmp.path(), 5);
        assert_eq!(files[0].content, "éé");
    }

    #[test]
    fn test_budget_smaller_than_next_char_stops_selection() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "abcd");
        write(tmp.path(), "package.json", "é{}");
        write(tmp.path(), "tsconfig.json", "{}");
        write(tmp.path(), "app/api/chat/route.ts", "x");

        let files = find_important_files(tmp.path(), 5);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md"]);
        assert!(files.iter().all(|f| !f.content.is_empty()));
    }

    #[test]
    fn test_empty_file_within_budget_is_kept() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".env.example", "");
        write(tmp.path(), "tsconfig.json", "{}");

        let files = find_important_files(tmp.path(), 100);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".env.example", "tsconfig.json"]);
    }

    fn file(path: &str, content: &str) -> ImportantFile {
        ImportantFile { path: path.into(), reason: String::new(), content: content.into() }
    }

    #[test]
    fn test_fit_readme_shares_budget_with_other_files() {
        let files = vec![file("README.md", "abcdef"), file("package.json", "1234")];
        assert_eq!(fit_readme("abcdefghij", &files, 10), "abcdef");
        assert_eq!(fit_readme("short", &files, 10), "short");
    }

    #[test]
    fn test_fit_readme_without_selection_uses_whole_budget() {
        assert_eq!(fit_readme(&"r".repeat(50), &[], 8), "rrrrrrrr");
        assert_eq!(fit_readme("ééé", &[], 3), "é");
        assert_eq!(fit_readme("abc", &[file("tsconfig.json", "{}")], 1), "");
    }

    #[test]
    fn test_selected_readme_and_fitted_readme_agree() {
        let tmp = TempDir::new().unwrap();
        let readme = "# Title\n".repeat(40);
        write(tmp.path(), "README.md", &readme);
        write(tmp.path(), "package.json", "{}");

        let files = find_important_files(tmp.path(), 100);
        assert_eq!(fit_readme(&readme, &files, 100), files[0].content);
    }
}
