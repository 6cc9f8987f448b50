//! Which file is being edited, which HTML file was last in view, and which document the preview
//! should render.

use serde::{Deserialize, Serialize};

use crate::{paths::ProjectPath, store::FileStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDocumentTracker {
    active_file: Option<String>,
    last_html_file: Option<String>,
    open_files: Vec<String>,
}

impl ActiveDocumentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    pub fn last_html_file(&self) -> Option<&str> {
        self.last_html_file.as_deref()
    }

    /// Open files in the order they were first opened.
    pub fn open_files(&self) -> &[String] {
        &self.open_files
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open_files.iter().any(|p| p == path)
    }

    /// Make `path` the active file.
    ///
    /// `flushed` is the editing surface's current text for the previously active file; it is
    /// written back to the store before the switch. Returns false, changing nothing, when `path`
    /// has no content in the store.
    pub fn open(&mut self, store: &mut FileStore, path: &str, flushed: Option<String>) -> bool {
        if !store.contains(path) {
            tracing::debug!("[ActiveDocumentTracker] ignoring open of unknown file '{path}'");
            return false;
        }
        if let (Some(previous), Some(text)) = (self.active_file.as_deref(), flushed) {
            store.update(previous, text);
        }
        self.active_file = Some(path.to_string());
        if ProjectPath::new(path).is_html() {
            self.last_html_file = Some(path.to_string());
        }
        if !self.is_open(path) {
            self.open_files.push(path.to_string());
        }
        true
    }

    /// Drop `path` from the open files.
    ///
    /// When it was the active file, nothing is active afterwards and the first remaining open
    /// file is returned so the caller can open it next.
    pub fn close(&mut self, path: &str) -> Option<String> {
        let was_open = self.is_open(path);
        self.open_files.retain(|p| p != path);
        if self.active_file.as_deref() != Some(path) {
            if !was_open {
                tracing::debug!("[ActiveDocumentTracker] '{path}' was not open");
            }
            return None;
        }
        self.active_file = None;
        self.open_files.first().cloned()
    }

    /// Record that `path` was just rendered, so later selections fall back to it.
    pub fn note_previewed(&mut self, path: &str) {
        self.last_html_file = Some(path.to_string());
    }

    /// Pick the HTML document the preview should render.
    ///
    /// In order: the active file when it is HTML; the last HTML file opened or previewed; the
    /// first HTML file (store order) in the active file's directory or below; `default_entry`;
    /// the first HTML file anywhere. Candidates without content in the store are passed over.
    pub fn select_preview_target(&self, store: &FileStore, default_entry: &str) -> Option<String> {
        if let Some(active) = self.active_file.as_deref() {
            if ProjectPath::new(active).is_html() && store.contains(active) {
                return Some(active.to_string());
            }
        }
        if let Some(last) = self.last_html_file.as_deref() {
            if store.contains(last) {
                return Some(last.to_string());
            }
        }
        if let Some(active) = self.active_file.as_deref() {
            let dir = ProjectPath::new(active).dir_prefix();
            if let Some(local) = store.html_paths().find(|p| p.starts_with(dir)) {
                return Some(local.to_string());
            }
        }
        if store.contains(default_entry) {
            return Some(default_entry.to_string());
        }
        store.html_paths().next().map(str::to_string)
    }
}
