//! Glue between a [`Project`] and the host's editing and rendering surfaces.
//!
//! The session keeps the store authoritative: before anything reads the store (switching files,
//! compiling a preview, ingesting) it flushes the editing surface's text into the active file.
//! Everything the user should see about failures ends up in the console log rather than in an
//! `Err`.

use tokio::sync::watch;

use crate::{
    diagnostic::Diagnostic,
    error::LivecodeError,
    ingest::{
        DirectoryEntry, FileHandle, IngestBatch, IngestProgress, IngestReport, IngestionPipeline,
        SourceEntry,
    },
    language::Language,
    preview::{error_document, no_preview_document, paused_document, preview_title},
    project::{PreviewOutcome, Project},
    surface::{EditorSurface, RenderEvent, RenderSurface},
};

pub struct Session<E, R> {
    project: Project,
    editor: E,
    render: R,
    pipeline: IngestionPipeline,
    console: Vec<Diagnostic>,
}

impl<E: EditorSurface, R: RenderSurface> Session<E, R> {
    /// Attach surfaces to `project`, load its active file into the editor and draw the first
    /// preview.
    pub fn new(project: Project, editor: E, render: R) -> Self {
        let pipeline = IngestionPipeline::new(project.config().text_gate());
        let mut session = Session {
            project,
            editor,
            render,
            pipeline,
            console: Vec::new(),
        };
        session.load_active_document();
        session.show_preview();
        session
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// The host edits through this; call [`on_content_changed`](Self::on_content_changed)
    /// afterwards.
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn console(&self) -> &[Diagnostic] {
        &self.console
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    pub fn log(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("[Session] console: {diagnostic}");
        self.console.push(diagnostic);
    }

    /// Progress of the running (or last) ingestion.
    pub fn ingest_progress(&self) -> watch::Receiver<IngestProgress> {
        self.pipeline.subscribe()
    }

    /// The editing surface's text changed.
    pub fn on_content_changed(&mut self) {
        self.flush_editor();
        if self.project.auto_preview() {
            self.refresh_preview();
        }
    }

    pub fn open_file(&mut self, path: &str) -> bool {
        let flushed = self.editor_text();
        if !self.project.open_file(path, flushed) {
            return false;
        }
        self.load_active_document();
        self.show_preview();
        true
    }

    pub fn close_file(&mut self, path: &str) -> Option<String> {
        let flushed = self.editor_text();
        let next = self.project.close_file(path, flushed);
        self.load_active_document();
        self.show_preview();
        next
    }

    /// Create a file and open it.
    pub fn create_file(&mut self, path: &str, content: &str) -> Result<String, LivecodeError> {
        self.flush_editor();
        let path = self.project.create_file(path, content)?;
        self.open_file(&path);
        Ok(path)
    }

    pub fn create_folder(&mut self, parent_dir: &str, name: &str) -> Result<String, LivecodeError> {
        self.project.create_folder(parent_dir, name)
    }

    /// Switch automatic preview on (rendering immediately) or off (showing the paused document).
    pub fn set_auto_preview(&mut self, enabled: bool) {
        self.project.set_auto_preview(enabled);
        if enabled {
            self.refresh_preview();
        } else {
            self.write_document(&paused_document());
            self.render.set_title(&preview_title(None));
        }
    }

    /// Render the preview now, regardless of the auto-preview flag.
    pub fn refresh_preview(&mut self) {
        self.flush_editor();
        match self.project.compile_preview() {
            PreviewOutcome::Rendered(compiled) => {
                if let Err(e) = self.render.write_document(&compiled.html) {
                    tracing::warn!("[Session] preview of '{}' failed: {e}", compiled.entry);
                    self.log(Diagnostic::error(format!("Preview failed: {e}")));
                    self.write_document(&error_document(&e.to_string(), &compiled.entry));
                }
                self.render.set_title(&preview_title(Some(&compiled.entry)));
            }
            PreviewOutcome::NoEntry => {
                self.write_document(&no_preview_document());
                self.render.set_title(&preview_title(None));
            }
        }
    }

    /// Console output and uncaught errors reported by the rendered document.
    pub fn on_render_event(&mut self, event: RenderEvent) {
        let diagnostic = match event {
            RenderEvent::Console { level, args } => Diagnostic::from_console(level, &args),
            RenderEvent::Error {
                message,
                line,
                column,
            } => Diagnostic::located_error(message, line, column),
        };
        self.log(diagnostic);
    }

    pub async fn ingest<D: DirectoryEntry>(&mut self, batch: IngestBatch<D>) -> IngestReport {
        self.flush_editor();
        let report = self.pipeline.ingest(&mut self.project, batch).await;
        self.finish_ingest(&report);
        report
    }

    pub async fn ingest_files<F: FileHandle>(&mut self, files: Vec<F>) -> IngestReport {
        self.flush_editor();
        let report = self.pipeline.ingest_files(&mut self.project, files).await;
        self.finish_ingest(&report);
        report
    }

    pub async fn ingest_entries<F, D>(&mut self, entries: Vec<SourceEntry<F, D>>) -> IngestReport
    where
        F: FileHandle,
        D: DirectoryEntry<File = F>,
    {
        self.flush_editor();
        let report = self.pipeline.ingest_entries(&mut self.project, entries).await;
        self.finish_ingest(&report);
        report
    }

    fn finish_ingest(&mut self, report: &IngestReport) {
        for diagnostic in &report.diagnostics {
            self.log(diagnostic.clone());
        }
        if report.progress.total == 0 {
            self.log(Diagnostic::warning("No files found to upload"));
        } else if report.common_dir.is_empty() {
            self.log(Diagnostic::info(format!(
                "Upload complete: {} files processed",
                report.progress.processed
            )));
        } else {
            self.log(Diagnostic::info(format!(
                "Upload of {} complete: {} files processed",
                report.common_dir, report.progress.processed
            )));
        }
        if let Some(entry) = report.entry_point.as_deref() {
            self.project.open_file(entry, None);
        }
        // reload even without an entry point: the active file may have been overwritten
        self.load_active_document();
        self.show_preview();
    }

    fn show_preview(&mut self) {
        if self.project.auto_preview() {
            self.refresh_preview();
        } else {
            self.write_document(&paused_document());
        }
    }

    fn write_document(&mut self, html: &str) {
        if let Err(e) = self.render.write_document(html) {
            tracing::warn!("[Session] rendering surface rejected document: {e}");
            self.log(Diagnostic::error(format!("Could not display preview: {e}")));
        }
    }

    fn editor_text(&self) -> Option<String> {
        self.project
            .active_file()
            .map(|_| self.editor.current_text())
    }

    fn flush_editor(&mut self) {
        if let (Some(path), Some(text)) = (
            self.project.active_file().map(str::to_string),
            self.editor_text(),
        ) {
            if self.project.store().get(&path) != Some(text.as_str()) {
                if let Err(e) = self.project.save(&path, text) {
                    tracing::warn!("[Session] could not save editor text: {e}");
                }
            }
        }
    }

    fn load_active_document(&mut self) {
        match self.project.active_document() {
            Some((content, language)) => self.editor.set_document(content, language),
            None => self.editor.set_document("", Language::Plaintext),
        }
    }
}
