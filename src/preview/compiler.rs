use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{
    error::LivecodeError,
    paths::{is_external_url, ProjectPath},
    store::FileStore,
};

static LINK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link\s+[^>]*href=["']([^"']+)["'][^>]*>"#)
        .expect("link tag pattern is valid")
});

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<script\s+[^>]*src=["']([^"']+)["'][^>]*></script>"#)
        .expect("script tag pattern is valid")
});

static HEAD_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</head>").expect("head close pattern is valid"));

/// Script placed before `</head>`. Rendering surfaces that reuse a window see the flag from the
/// previous load and get a reset notice on their console.
pub const RELOAD_GUARD: &str = "<script>
if (window._previewInitialized) {
    document.addEventListener('DOMContentLoaded', function() {
        console.log('Preview refreshed - clearing previous state');
    });
} else {
    window._previewInitialized = true;
}
</script>
";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledPreview {
    /// Path of the HTML file that was compiled
    pub entry: String,
    pub html: String,
    /// Resolved paths of every stylesheet and script that was inlined, in document order
    pub inlined: Vec<String>,
    /// References left untouched because they did not resolve to a project file of the right kind
    pub unresolved: Vec<String>,
}

/// Reads the latest contents of a [`FileStore`] and produces preview documents.
///
/// The transform is a pure function of the store contents and the entry path. External
/// references (anything with a URL scheme, or `//host/...`) are never touched.
pub struct PreviewCompiler<'a> {
    store: &'a FileStore,
}

impl<'a> PreviewCompiler<'a> {
    pub fn new(store: &'a FileStore) -> Self {
        PreviewCompiler { store }
    }

    /// Compile the stored HTML file at `entry_path`.
    pub fn compile(&self, entry_path: &str) -> Result<CompiledPreview, LivecodeError> {
        let html = self
            .store
            .get(entry_path)
            .ok_or_else(|| LivecodeError::NotFound(format!("preview entry '{entry_path}'")))?;
        Ok(self.transform(entry_path, html))
    }

    /// Compile `html` as if it were stored at `entry_path`.
    pub fn transform(&self, entry_path: &str, html: &str) -> CompiledPreview {
        let dir_path = ProjectPath::new(entry_path).dir_prefix();
        let mut inlined = Vec::new();
        let mut unresolved = Vec::new();

        // The guard goes in first so that a `</head>` inside inlined asset text is never chosen
        // as the injection point.
        let guarded = match HEAD_CLOSE.find(html) {
            Some(head_close) => {
                let mut out = String::with_capacity(html.len() + RELOAD_GUARD.len());
                out.push_str(&html[..head_close.start()]);
                out.push_str(RELOAD_GUARD);
                out.push_str(&html[head_close.start()..]);
                out
            }
            None => {
                tracing::debug!("[PreviewCompiler] '{entry_path}' has no </head>, skipping guard");
                html.to_string()
            }
        };

        let styled = LINK_TAG.replace_all(&guarded, |caps: &Captures| {
            match self.inline_target(dir_path, &caps[1], "css") {
                Some((path, content)) => {
                    let tag = format!("<style>/* {path} */\n{content}</style>");
                    inlined.push(path);
                    tag
                }
                None => {
                    unresolved.push(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });

        let scripted = SCRIPT_TAG.replace_all(&styled, |caps: &Captures| {
            match self.inline_target(dir_path, &caps[1], "js") {
                Some((path, content)) => {
                    let tag = format!(
                        "<script>\n/* {path} */\n(function() {{\n{content}\n}})();\n</script>"
                    );
                    inlined.push(path);
                    tag
                }
                None => {
                    unresolved.push(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });

        tracing::debug!(
            "[PreviewCompiler] compiled '{}': {} inlined, {} left as-is",
            entry_path,
            inlined.len(),
            unresolved.len()
        );
        CompiledPreview {
            entry: entry_path.to_string(),
            html: scripted.into_owned(),
            inlined,
            unresolved,
        }
    }

    /// Resolve `reference` to a stored file with extension `ext`.
    fn inline_target(&self, dir_path: &str, reference: &str, ext: &str) -> Option<(String, &'a str)> {
        if is_external_url(reference) {
            return None;
        }
        let path = crate::paths::resolve(dir_path, reference);
        if !ProjectPath::new(&path).has_ext(ext) {
            tracing::debug!("[PreviewCompiler] '{reference}' -> '{path}' is not a .{ext} file");
            return None;
        }
        match self.store.get(&path) {
            Some(content) => Some((path, content)),
            None => {
                tracing::debug!("[PreviewCompiler] '{reference}' -> '{path}' is not in the project");
                None
            }
        }
    }
}
