//! Language classification and the text/binary gate used during ingestion.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::paths::ProjectPath;

/// Size above which a file with no other text signal is treated as binary.
pub const DEFAULT_TEXT_SIZE_LIMIT: u64 = 2 * 1024 * 1024;

/// Extensions (lowercase, no dot) always ingested as text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "html", "htm", "css", "js", "json", "md", "xml", "svg", "less", "scss", "sass", "styl",
    "jsx", "ts", "tsx", "vue", "php", "py", "rb", "java", "c", "cpp", "h", "cs", "go", "rust", "sh",
    "yaml", "yml", "toml", "ini", "cfg", "conf", "log",
];

/// Editor language of a project file. Drives editor highlighting and which files the preview
/// compiler may inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Javascript,
    Json,
    Markdown,
    #[default]
    Plaintext,
}

impl Language {
    /// Classify a path by its extension. Unknown or missing extensions are plain text.
    pub fn classify(path: &str) -> Language {
        let ext = ProjectPath::new(path).ext().to_ascii_lowercase();
        match ext.as_str() {
            "html" => Language::Html,
            "css" => Language::Css,
            "js" => Language::Javascript,
            "json" => Language::Json,
            "md" => Language::Markdown,
            _ => Language::Plaintext,
        }
    }

    /// Identifier understood by the editing surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Javascript => "javascript",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Plaintext => "plaintext",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether an incoming file handle can be read as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGate {
    size_limit: u64,
    extra_extensions: Vec<String>,
}

impl Default for TextGate {
    fn default() -> Self {
        TextGate {
            size_limit: DEFAULT_TEXT_SIZE_LIMIT,
            extra_extensions: Vec::new(),
        }
    }
}

impl TextGate {
    pub fn new(size_limit: u64, extra_extensions: &[String]) -> Self {
        TextGate {
            size_limit,
            extra_extensions: extra_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// A file is text when its extension is allow-listed, when its MIME hint is `text/*`, or,
    /// absent both signals, when it is no larger than the size limit.
    pub fn is_text(&self, name: &str, mime_type: Option<&str>, size: u64) -> bool {
        let ext = ProjectPath::new(name).ext().to_ascii_lowercase();
        if !ext.is_empty()
            && (TEXT_EXTENSIONS.contains(&ext.as_str())
                || self.extra_extensions.iter().any(|extra| *extra == ext))
        {
            return true;
        }
        if mime_type.is_some_and(|mime| mime.starts_with("text/")) {
            return true;
        }
        size <= self.size_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Language::classify("root/index.html"), Language::Html);
        assert_eq!(Language::classify("root/INDEX.HTML"), Language::Html);
        assert_eq!(Language::classify("style.css"), Language::Css);
        assert_eq!(Language::classify("a/b/app.js"), Language::Javascript);
        assert_eq!(Language::classify("package.json"), Language::Json);
        assert_eq!(Language::classify("README.md"), Language::Markdown);
        assert_eq!(Language::classify("notes.txt"), Language::Plaintext);
        assert_eq!(Language::classify("page.htm"), Language::Plaintext);
        assert_eq!(Language::classify("Makefile"), Language::Plaintext);
        assert_eq!(Language::classify(""), Language::Plaintext);
        assert_eq!(Language::Javascript.as_str(), "javascript");
        assert_eq!(
            serde_json::to_string(&Language::Markdown).unwrap(),
            "\"markdown\""
        );
    }

    #[test]
    fn test_text_gate() {
        let gate = TextGate::default();
        let huge = DEFAULT_TEXT_SIZE_LIMIT * 10;
        // allow-listed extension wins regardless of size or mime
        assert!(gate.is_text("bundle.JS", Some("application/octet-stream"), huge));
        // text mime wins regardless of size
        assert!(gate.is_text("data.csv", Some("text/csv"), huge));
        // no signal: size decides
        assert!(gate.is_text("LICENSE", None, 1024));
        assert!(gate.is_text("blob.bin", None, DEFAULT_TEXT_SIZE_LIMIT));
        assert!(!gate.is_text("blob.bin", None, DEFAULT_TEXT_SIZE_LIMIT + 1));
        assert!(!gate.is_text("photo.png", Some("image/png"), huge));

        let gate = TextGate::new(16, &[".Csv".to_string()]);
        assert!(gate.is_text("data.csv", None, 1000));
        assert!(!gate.is_text("data.dat", None, 1000));
    }
}
