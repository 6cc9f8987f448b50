//! WASM bindings for livecode-core
//!
//! The browser host owns the editing widget and the preview iframe; this module owns the project.
//!
//! ## Usage
//!
//! ```javascript,ignore
//! import init, { ProjectWasm, init_logging } from './livecode_core.js';
//!
//! async function main() {
//!     await init();
//!     init_logging();
//!
//!     const project = new ProjectWasm();           // seeded with root/index.html etc.
//!     editor.setValue(project.get_content(project.active_file()));
//!
//!     editor.onDidChangeModelContent(() => {
//!         project.save(project.active_file(), editor.getValue());
//!         const { html, title } = project.preview();
//!         iframe.srcdoc = html;
//!         previewTitle.textContent = title;
//!     });
//!
//!     folderInput.addEventListener('change', async (e) => {
//!         const report = await project.ingest_files(e.target.files);
//!         if (report.entry_point) project.open_file(report.entry_point, editor.getValue());
//!     });
//! }
//! ```
//!
//! Returned objects are built with `serde_wasm_bindgen`; every struct crossing the boundary
//! serializes to a plain JavaScript object (no `Map` fields).

use serde::{Deserialize, Serialize};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::console;

use crate::{
    config::EditorConfig,
    diagnostic::Diagnostic,
    error::LivecodeError,
    ingest::{FileHandle, IngestionPipeline},
    preview::{no_preview_document, paused_document, preview_title},
    project::{PreviewOutcome, Project},
    surface::RenderEvent,
};

impl From<LivecodeError> for JsValue {
    fn from(e: LivecodeError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Route `tracing` output to the browser console. Safe to call more than once.
#[wasm_bindgen]
pub fn init_logging() {
    if tracing_wasm::try_set_as_global_default().is_err() {
        console::log_1(&"livecode: tracing already initialized".into());
    }
}

/// A `File` from an `<input type="file">` selection.
pub struct WebFile {
    file: web_sys::File,
    name: String,
    size: u64,
    mime_type: Option<String>,
    relative_path: Option<String>,
}

impl WebFile {
    pub fn new(file: web_sys::File) -> Self {
        let mime_type = Some(file.type_()).filter(|m| !m.is_empty());
        // Only set by directory pickers; not exposed by web-sys
        let relative_path = js_sys::Reflect::get(&file, &JsValue::from_str("webkitRelativePath"))
            .ok()
            .and_then(|v| v.as_string())
            .filter(|p| !p.is_empty());
        WebFile {
            name: file.name(),
            size: file.size() as u64,
            mime_type,
            relative_path,
            file,
        }
    }
}

impl FileHandle for WebFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    async fn read_text(&self) -> Result<String, LivecodeError> {
        let text = JsFuture::from(self.file.text())
            .await
            .map_err(|e| LivecodeError::read(&self.name, format!("{e:?}")))?;
        text.as_string()
            .ok_or_else(|| LivecodeError::read(&self.name, "file did not produce text"))
    }
}

/// What the host should put in the preview frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewDocument {
    /// HTML file that was compiled, if any
    pub entry: Option<String>,
    pub title: String,
    pub html: String,
}

/// Browser handle to a project.
#[wasm_bindgen]
pub struct ProjectWasm {
    inner: Rc<RefCell<Project>>,
    pipeline: IngestionPipeline,
}

#[wasm_bindgen]
impl ProjectWasm {
    /// Create a project, optionally configured by a TOML string.
    ///
    /// # JavaScript Example
    /// ```javascript,ignore
    /// const project = new ProjectWasm("auto_preview = false");
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<ProjectWasm, JsValue> {
        let config = match config_toml {
            Some(toml) => EditorConfig::from_toml_str(&toml).map_err(|e| {
                let msg = format!("Invalid editor config: {e}");
                console::error_1(&msg.clone().into());
                JsValue::from_str(&msg)
            })?,
            None => EditorConfig::default(),
        };
        let pipeline = IngestionPipeline::new(config.text_gate());
        Ok(ProjectWasm {
            inner: Rc::new(RefCell::new(Project::with_config(config))),
            pipeline,
        })
    }

    /// Returns the canonical path the file was stored under.
    pub fn create_file(&self, path: String, content: String) -> Result<String, JsValue> {
        Ok(self.inner.borrow_mut().create_file(&path, content)?)
    }

    pub fn create_folder(&self, parent_dir: String, name: String) -> Result<String, JsValue> {
        Ok(self.inner.borrow_mut().create_folder(&parent_dir, &name)?)
    }

    pub fn save(&self, path: String, content: String) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().save(&path, content)?)
    }

    /// `flushed` is the editor's current text, saved into the previously active file.
    pub fn open_file(&self, path: String, flushed: Option<String>) -> bool {
        self.inner.borrow_mut().open_file(&path, flushed)
    }

    /// Returns the file that became active instead, if any.
    pub fn close_file(&self, path: String, flushed: Option<String>) -> Option<String> {
        self.inner.borrow_mut().close_file(&path, flushed)
    }

    pub fn get_content(&self, path: String) -> Option<String> {
        self.inner.borrow().store().get(&path).map(str::to_string)
    }

    /// Editor language identifier for `path`
    pub fn get_language(&self, path: String) -> Option<String> {
        self.inner
            .borrow()
            .store()
            .entry(&path)
            .map(|e| e.language.to_string())
    }

    pub fn active_file(&self) -> Option<String> {
        self.inner.borrow().active_file().map(str::to_string)
    }

    /// Array of open file paths, in tab order
    pub fn open_files(&self) -> Vec<String> {
        self.inner.borrow().tracker().open_files().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn auto_preview(&self) -> bool {
        self.inner.borrow().auto_preview()
    }

    #[wasm_bindgen(setter)]
    pub fn set_auto_preview(&self, enabled: bool) {
        self.inner.borrow_mut().set_auto_preview(enabled);
    }

    /// Compile the preview (or the paused/no-preview placeholder).
    ///
    /// Returns `{ entry, title, html }`.
    pub fn preview(&self) -> Result<JsValue, JsValue> {
        let mut project = self.inner.borrow_mut();
        let document = if !project.auto_preview() {
            PreviewDocument {
                entry: None,
                title: preview_title(None),
                html: paused_document(),
            }
        } else {
            match project.compile_preview() {
                PreviewOutcome::Rendered(compiled) => PreviewDocument {
                    title: preview_title(Some(&compiled.entry)),
                    entry: Some(compiled.entry),
                    html: compiled.html,
                },
                PreviewOutcome::NoEntry => PreviewDocument {
                    entry: None,
                    title: preview_title(None),
                    html: no_preview_document(),
                },
            }
        };
        Ok(serde_wasm_bindgen::to_value(&document).map_err(LivecodeError::from)?)
    }

    /// Nested `{ name, path, kind, children }` tree, folders first.
    pub fn tree(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.borrow().tree().snapshot();
        Ok(serde_wasm_bindgen::to_value(&snapshot).map_err(LivecodeError::from)?)
    }

    /// Flat `[{ path, name, kind, depth }]` listing in display order.
    pub fn traverse(&self) -> Result<JsValue, JsValue> {
        let entries = self.inner.borrow().tree().traverse();
        Ok(serde_wasm_bindgen::to_value(&entries).map_err(LivecodeError::from)?)
    }

    /// Convert a console call or error forwarded from the preview iframe into a console line.
    ///
    /// # JavaScript Example
    /// ```javascript,ignore
    /// iframe.contentWindow.console.log = (...args) =>
    ///     show(project.render_event({ type: "console", level: "log", args }));
    /// ```
    pub fn render_event(&self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: RenderEvent =
            serde_wasm_bindgen::from_value(event).map_err(LivecodeError::from)?;
        let diagnostic = match event {
            RenderEvent::Console { level, args } => Diagnostic::from_console(level, &args),
            RenderEvent::Error {
                message,
                line,
                column,
            } => Diagnostic::located_error(message, line, column),
        };
        Ok(serde_wasm_bindgen::to_value(&diagnostic).map_err(LivecodeError::from)?)
    }

    /// Read every file of a `FileList` (flat selection or directory picker) into the project.
    ///
    /// Returns the ingestion report: `{ progress, ingested, skipped, failed, diagnostics,
    /// entry_point, common_dir }`. The project stays usable while reads are pending.
    pub async fn ingest_files(&self, files: web_sys::FileList) -> Result<JsValue, JsValue> {
        let handles: Vec<WebFile> = (0..files.length())
            .filter_map(|i| files.get(i))
            .map(WebFile::new)
            .collect();
        console::log_1(&format!("livecode: ingesting {} files", handles.len()).into());
        let mut target = &*self.inner;
        let report = self.pipeline.ingest_files(&mut target, handles).await;
        Ok(serde_wasm_bindgen::to_value(&report).map_err(LivecodeError::from)?)
    }
}
