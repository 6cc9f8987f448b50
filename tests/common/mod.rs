//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use livecode_core::{
    error::LivecodeError,
    language::Language,
    surface::{EditorSurface, RenderSurface},
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Editing surface that just holds the text it was given.
#[derive(Debug, Default)]
pub struct FakeEditor {
    pub text: String,
    pub language: Option<Language>,
}

impl EditorSurface for FakeEditor {
    fn current_text(&self) -> String {
        self.text.clone()
    }

    fn set_document(&mut self, content: &str, language: Language) {
        self.text = content.to_string();
        self.language = Some(language);
    }
}

/// Rendering surface that records every document and title. Set `reject` to make writes fail.
#[derive(Debug, Default)]
pub struct FakeFrame {
    pub documents: Vec<String>,
    pub title: String,
    pub reject: bool,
}

#[allow(dead_code)]
impl FakeFrame {
    pub fn last(&self) -> &str {
        self.documents.last().map(String::as_str).unwrap_or_default()
    }
}

impl RenderSurface for FakeFrame {
    fn write_document(&mut self, html: &str) -> Result<(), LivecodeError> {
        if self.reject && !html.contains("Preview error") {
            return Err(LivecodeError::Custom("frame is gone".to_string()));
        }
        self.documents.push(html.to_string());
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

/// Create a small static site on disk:
///
/// ```text
/// site/index.html      links css/main.css and js/app.js
/// site/css/main.css
/// site/js/app.js
/// site/pages/about.html links ../css/main.css
/// site/logo.bin        3 MiB of zeros
/// ```
///
/// Returns the path to the `site` directory.
#[allow(dead_code)]
pub fn create_test_site(temp_dir: &TempDir) -> PathBuf {
    let site = temp_dir.path().join("site");
    std::fs::create_dir_all(site.join("css")).unwrap();
    std::fs::create_dir_all(site.join("js")).unwrap();
    std::fs::create_dir_all(site.join("pages")).unwrap();

    let index = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="stylesheet" href="css/main.css">
    <link rel="stylesheet" href="https://cdn.example.com/reset.css">
</head>
<body>
    <h1>Site</h1>
    <script src="js/app.js"></script>
</body>
</html>
"#;
    std::fs::write(site.join("index.html"), index).unwrap();
    std::fs::write(site.join("css/main.css"), "h1 { color: red; }").unwrap();
    std::fs::write(site.join("js/app.js"), "console.log('app');").unwrap();
    std::fs::write(
        site.join("pages/about.html"),
        "<html><head><link rel=\"stylesheet\" href=\"../css/main.css\"></head><body></body></html>",
    )
    .unwrap();
    std::fs::write(site.join("logo.bin"), vec![0u8; 3 * 1024 * 1024]).unwrap();
    site
}
