//! The editor's single owned context: folder tree, file contents, open documents and the
//! auto-preview flag.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    config::EditorConfig,
    error::LivecodeError,
    event::ProjectEvent,
    language::Language,
    paths::{self, ProjectPath},
    preview::{CompiledPreview, PreviewCompiler},
    store::FileStore,
    tracker::ActiveDocumentTracker,
    tree::ProjectTree,
};

pub const SEED_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Project</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <h1>Welcome to Web Code Editor</h1>
    <p>Start coding your amazing project!</p>

    <script src="script.js"></script>
</body>
</html>"#;

pub const SEED_CSS: &str = r#"body {
    font-family: 'Segoe UI', sans-serif;
    line-height: 1.6;
    margin: 0;
    padding: 20px;
    background-color: #f5f5f5;
    color: #333;
}

h1 {
    color: #2c3e50;
    border-bottom: 2px solid #3498db;
    padding-bottom: 10px;
}

p {
    font-size: 18px;
}"#;

pub const SEED_JS: &str = r#"// Welcome to the JavaScript file
console.log('Hello from Web Code Editor!');

document.addEventListener('DOMContentLoaded', () => {
    console.log('DOM fully loaded and parsed');

    // You can write your JavaScript code here
});"#;

/// Result of asking the project for a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewOutcome {
    Rendered(CompiledPreview),
    /// The project has no HTML file to show
    NoEntry,
}

#[derive(Debug)]
pub struct Project {
    config: EditorConfig,
    tree: ProjectTree,
    store: FileStore,
    tracker: ActiveDocumentTracker,
    auto_preview: bool,
    tx: Option<UnboundedSender<ProjectEvent>>,
}

impl Default for Project {
    fn default() -> Self {
        Project::with_config(EditorConfig::default())
    }
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// A project configured by `config`; seeded with the starter files when
    /// `config.seed_project` is set.
    pub fn with_config(mut config: EditorConfig) -> Self {
        config.default_entry = paths::normalize(&config.default_entry);
        let mut project = Project {
            auto_preview: config.auto_preview,
            config,
            tree: ProjectTree::new(),
            store: FileStore::new(),
            tracker: ActiveDocumentTracker::new(),
            tx: None,
        };
        if project.config.seed_project {
            project.seed();
        }
        project
    }

    /// Publish every subsequent change on `tx`.
    pub fn with_events(mut self, tx: UnboundedSender<ProjectEvent>) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Add the starter `root/index.html`, `root/style.css` and `root/script.js` and open the
    /// HTML file.
    pub fn seed(&mut self) {
        for (path, content) in [
            ("root/index.html", SEED_HTML),
            ("root/style.css", SEED_CSS),
            ("root/script.js", SEED_JS),
        ] {
            self.put(path.to_string(), content.to_string());
        }
        self.open_file("root/index.html", None);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn tracker(&self) -> &ActiveDocumentTracker {
        &self.tracker
    }

    pub fn auto_preview(&self) -> bool {
        self.auto_preview
    }

    pub fn set_auto_preview(&mut self, enabled: bool) {
        self.auto_preview = enabled;
    }

    pub fn active_file(&self) -> Option<&str> {
        self.tracker.active_file()
    }

    /// Content and language of the active file, for loading into the editing surface.
    pub fn active_document(&self) -> Option<(&str, Language)> {
        let path = self.tracker.active_file()?;
        self.store
            .entry(path)
            .map(|entry| (entry.content.as_str(), entry.language))
    }

    /// Create (or overwrite) a file. Returns the canonical path it was stored under.
    pub fn create_file(
        &mut self,
        path: &str,
        content: impl Into<String>,
    ) -> Result<String, LivecodeError> {
        let normalized = paths::normalize(path);
        if normalized.is_empty() {
            return Err(LivecodeError::InvalidPath(path.to_string()));
        }
        self.put(normalized.clone(), content.into());
        Ok(normalized)
    }

    /// Create an empty folder `name` inside `parent_dir` ("" for the top level).
    pub fn create_folder(&mut self, parent_dir: &str, name: &str) -> Result<String, LivecodeError> {
        let id = self.tree.create_folder(parent_dir, name)?;
        let path = self
            .tree
            .get(id)
            .map(|node| node.path().to_string())
            .unwrap_or_default();
        self.emit(ProjectEvent::FolderAdded(path.clone()));
        Ok(path)
    }

    /// Replace the content of an existing file.
    pub fn save(&mut self, path: &str, content: impl Into<String>) -> Result<(), LivecodeError> {
        if !self.store.update(path, content) {
            return Err(LivecodeError::NotFound(path.to_string()));
        }
        self.emit(ProjectEvent::FileUpdated(path.to_string()));
        Ok(())
    }

    /// Make `path` the active file, first saving `flushed` (the editing surface's text) into the
    /// previously active file. Unknown paths are ignored and return false.
    pub fn open_file(&mut self, path: &str, flushed: Option<String>) -> bool {
        let opened = self.tracker.open(&mut self.store, path, flushed);
        if opened {
            self.emit(ProjectEvent::FileOpened(path.to_string()));
        }
        opened
    }

    /// Close `path`, first saving `flushed` into the active file (whichever tab is closed).
    /// Returns the file that became active in place of `path`, if any.
    pub fn close_file(&mut self, path: &str, flushed: Option<String>) -> Option<String> {
        if let (Some(active), Some(text)) = (self.tracker.active_file(), flushed) {
            let active = active.to_string();
            self.store.update(&active, text);
        }
        let next = self.tracker.close(path);
        self.emit(ProjectEvent::FileClosed(path.to_string()));
        match next {
            Some(next) if self.open_file(&next, None) => Some(next),
            _ => None,
        }
    }

    pub fn select_preview_target(&self) -> Option<String> {
        self.tracker
            .select_preview_target(&self.store, &self.config.default_entry)
    }

    /// Compile the selected preview target against the current store and remember it as the
    /// last previewed HTML file.
    pub fn compile_preview(&mut self) -> PreviewOutcome {
        let Some(entry) = self.select_preview_target() else {
            self.emit(ProjectEvent::PreviewCleared);
            return PreviewOutcome::NoEntry;
        };
        match PreviewCompiler::new(&self.store).compile(&entry) {
            Ok(compiled) => {
                self.tracker.note_previewed(&entry);
                self.emit(ProjectEvent::PreviewUpdated(entry));
                PreviewOutcome::Rendered(compiled)
            }
            Err(e) => {
                tracing::warn!("Selected preview entry could not be compiled: {e}");
                self.emit(ProjectEvent::PreviewCleared);
                PreviewOutcome::NoEntry
            }
        }
    }

    /// Insert into tree and store together.
    fn put(&mut self, path: String, content: String) {
        if let Err(e) = self.tree.insert(&path) {
            tracing::warn!("Refusing to store '{path}': {e}");
            return;
        }
        let language = Language::classify(&path);
        if self.store.set(&path, content, language) {
            tracing::debug!("Added {} file '{}'", language, path);
            self.emit(ProjectEvent::FileAdded(path, language));
        } else {
            self.emit(ProjectEvent::FileUpdated(path));
        }
    }

    fn emit(&self, event: ProjectEvent) {
        if let Some(tx) = self.tx.as_ref() {
            if tx.send(event).is_err() {
                tracing::debug!("Project event listener has gone away");
            }
        }
    }

    /// True when `path` is an HTML file that exists in the project.
    pub fn is_previewable(&self, path: &str) -> bool {
        ProjectPath::new(path).is_html() && self.store.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::{empty_project, init_logging, project_with};

    #[test]
    fn test_seed_project() {
        init_logging();
        let project = Project::new();
        assert_eq!(
            project.store().paths().collect::<Vec<_>>(),
            vec!["root/index.html", "root/style.css", "root/script.js"]
        );
        assert_eq!(project.tree().folder_count(), 1);
        assert_eq!(project.active_file(), Some("root/index.html"));
        let (content, language) = project.active_document().unwrap();
        assert_eq!(content, SEED_HTML);
        assert_eq!(language, Language::Html);
        assert!(project.auto_preview());
    }

    #[test]
    fn test_seed_preview_inlines_everything() {
        let mut project = Project::new();
        let PreviewOutcome::Rendered(compiled) = project.compile_preview() else {
            panic!("seed project should render");
        };
        assert_eq!(compiled.entry, "root/index.html");
        assert_eq!(compiled.inlined, vec!["root/style.css", "root/script.js"]);
        assert!(compiled.html.contains("Hello from Web Code Editor!"));
        assert_eq!(project.tracker().last_html_file(), Some("root/index.html"));
    }

    #[test]
    fn test_create_file_normalizes_and_overwrites() {
        let mut project = empty_project();
        let path = project.create_file("/site//js/./app.js", "1").unwrap();
        assert_eq!(path, "site/js/app.js");
        assert!(project.tree().contains_folder("site/js"));
        project.create_file("site/js/app.js", "2").unwrap();
        assert_eq!(project.store().get("site/js/app.js"), Some("2"));
        assert_eq!(project.tree().file_count(), 1);
        assert!(matches!(
            project.create_file("/", "x"),
            Err(LivecodeError::InvalidPath(_))
        ));
        // every stored path is also in the tree
        for path in project.store().paths() {
            assert!(project.tree().contains_file(path));
        }
    }

    #[test]
    fn test_save_and_folder_errors() {
        let mut project = empty_project();
        assert!(matches!(
            project.save("missing.css", "x"),
            Err(LivecodeError::NotFound(_))
        ));
        assert_eq!(project.create_folder("", "assets").unwrap(), "assets");
        assert!(matches!(
            project.create_folder("", "assets"),
            Err(LivecodeError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_close_reopens_next_and_flushes() {
        let mut project = Project::new();
        project.open_file("root/style.css", Some("<p>edited</p>".to_string()));
        assert_eq!(project.store().get("root/index.html"), Some("<p>edited</p>"));

        let next = project.close_file("root/style.css", Some("h1{}".to_string()));
        assert_eq!(next.as_deref(), Some("root/index.html"));
        assert_eq!(project.store().get("root/style.css"), Some("h1{}"));
        assert_eq!(project.active_file(), Some("root/index.html"));
        assert_eq!(project.tracker().open_files(), ["root/index.html"]);

        assert_eq!(project.close_file("root/index.html", None), None);
        assert_eq!(project.active_file(), None);
        // reopening after close shows the persisted content
        assert!(project.open_file("root/style.css", None));
        assert_eq!(project.active_document().map(|(c, _)| c), Some("h1{}"));
    }

    #[test]
    fn test_close_inactive_tab_keeps_active_edits() {
        let mut project = Project::new();
        project.open_file("root/style.css", None);
        project.open_file("root/index.html", None);

        let next = project.close_file("root/style.css", Some("<p>unsaved</p>".to_string()));
        assert_eq!(next, None);
        assert_eq!(project.active_file(), Some("root/index.html"));
        assert_eq!(project.store().get("root/index.html"), Some("<p>unsaved</p>"));
        assert_eq!(project.store().get("root/style.css"), Some(SEED_CSS));
    }

    #[test]
    fn test_no_entry() {
        let mut project = project_with(&[("notes.md", "# notes"), ("style.css", "")]);
        assert_eq!(project.compile_preview(), PreviewOutcome::NoEntry);
        assert!(!project.is_previewable("notes.md"));

        project.create_file("docs/Guide.HTML", "<p/>").unwrap();
        assert!(project.is_previewable("docs/Guide.HTML"));
        assert!(!project.is_previewable("docs/missing.html"));
        let PreviewOutcome::Rendered(compiled) = project.compile_preview() else {
            panic!("expected the only HTML file");
        };
        assert_eq!(compiled.entry, "docs/Guide.HTML");
    }

    #[test]
    fn test_events_are_published() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut project = empty_project().with_events(tx);
        project.create_file("a.html", "<p/>").unwrap();
        project.create_file("a.html", "<p>2</p>").unwrap();
        project.open_file("a.html", None);
        project.compile_preview();
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                ProjectEvent::FileAdded("a.html".to_string(), Language::Html),
                ProjectEvent::FileUpdated("a.html".to_string()),
                ProjectEvent::FileOpened("a.html".to_string()),
                ProjectEvent::PreviewUpdated("a.html".to_string()),
            ]
        );
    }
}
