//! Authoritative file contents, keyed by full project path.
//!
//! Iteration follows first-insertion order; an update never moves an entry. Preview target
//! selection depends on that order ("first HTML file"), so it must be stable.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

use crate::{language::Language, paths::ProjectPath};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub content: String,
    pub language: Language,
}

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    entries: IndexMap<String, FileEntry>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the content stored at `path`. Returns true when the path is new.
    pub fn set(&mut self, path: &str, content: impl Into<String>, language: Language) -> bool {
        let entry = FileEntry {
            content: content.into(),
            language,
        };
        // an existing key keeps its position
        self.entries.insert(path.to_string(), entry).is_none()
    }

    /// Replace the content of an existing entry, keeping its language. Returns false (and does
    /// nothing) when the path is unknown.
    pub fn update(&mut self, path: &str, content: impl Into<String>) -> bool {
        match self.entries.get_mut(path) {
            Some(entry) => {
                entry.content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|e| e.content.as_str())
    }

    pub fn entry(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in first-insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.entries.iter().map(|(path, e)| (path.as_str(), e))
    }

    /// HTML paths (case-insensitive `.html`) in first-insertion order.
    pub fn html_paths(&self) -> impl Iterator<Item = &str> {
        self.paths().filter(|p| ProjectPath::new(p).is_html())
    }
}
