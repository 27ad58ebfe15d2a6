//! Extension tables: language names for statistics and highlighter ids for display.

use std::path::Path;

/// Extension → language name used by the byte histogram.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    // JavaScript & TypeScript
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    // Web
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("less", "Less"),
    // Backend
    ("py", "Python"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("java", "Java"),
    ("cs", "C#"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("cpp", "C++"),
    ("c", "C"),
    // Data & Config
    ("json", "JSON"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("toml", "TOML"),
    ("xml", "XML"),
    // Others
    ("md", "Markdown"),
    ("sql", "SQL"),
    ("graphql", "GraphQL"),
];

/// Extension → syntax highlighter language id.
const HIGHLIGHT_EXTENSIONS: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("py", "python"),
    ("rb", "ruby"),
    ("php", "php"),
    ("java", "java"),
    ("cs", "csharp"),
    ("go", "go"),
    ("rs", "rust"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("xml", "xml"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("md", "markdown"),
    ("sql", "sql"),
    ("graphql", "graphql"),
    ("dockerfile", "dockerfile"),
];

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
}

/// Language counted for `path` in the byte histogram, if its extension is known.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let ext = extension_of(path)?;
    LANGUAGE_EXTENSIONS.iter().find(|(e, _)| *e == ext).map(|(_, name)| *name)
}

/// Highlighter language for a file name, falling back to `"text"`.
pub fn highlight_language(file_name: &str) -> &'static str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    if base.eq_ignore_ascii_case("dockerfile") {
        return "dockerfile";
    }

    extension_of(Path::new(base))
        .and_then(|ext| HIGHLIGHT_EXTENSIONS.iter().find(|(e, _)| *e == ext))
        .map(|(_, id)| *id)
        .unwrap_or("text")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path(Path::new("src/index.ts")), Some("TypeScript"));
        assert_eq!(language_for_path(Path::new("App.TSX")), Some("TypeScript"));
        assert_eq!(language_for_path(Path::new("README.md")), Some("Markdown"));
        assert_eq!(language_for_path(Path::new("Makefile")), None);
        assert_eq!(language_for_path(Path::new("run.sh")), None);
    }

    #[test]
    fn test_highlight_language() {
        assert_eq!(highlight_language("Dockerfile"), "dockerfile");
        assert_eq!(highlight_language("scripts/build.sh"), "bash");
        assert_eq!(highlight_language("lib.rs"), "rust");
        assert_eq!(highlight_language("notes"), "text");
        assert_eq!(highlight_language("image.png"), "text");
    }
}
