//! Bringing external files into a project.
//!
//! Every upload source (a flat file selection, a directory picker, dropped directory entries, a
//! native directory) is normalized to [`FileHandle`]s and [`DirectoryEntry`]s. The
//! [`IngestionPipeline`] walks directories, gates out binary files, issues every read of a batch
//! at once and applies the completed reads to an [`IngestTarget`] one at a time, publishing
//! [`IngestProgress`] after each.
//!
//! Nothing here requires `Send`: browser file handles live on a single thread.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tokio::sync::watch;

use crate::{
    diagnostic::Diagnostic,
    error::LivecodeError,
    language::TextGate,
    paths::{self, ProjectPath},
    project::Project,
};

pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;

/// A file that can be read asynchronously as text.
#[allow(async_fn_in_trait)]
pub trait FileHandle {
    fn name(&self) -> &str;

    /// Size in bytes, known before reading
    fn size(&self) -> u64;

    fn mime_type(&self) -> Option<&str> {
        None
    }

    /// Path relative to the picked directory, as reported by directory pickers. When present it
    /// replaces the name as the file's project path.
    fn relative_path(&self) -> Option<&str> {
        None
    }

    async fn read_text(&self) -> Result<String, LivecodeError>;
}

/// A directory whose children arrive in batches.
///
/// Enumeration may be truncated: callers keep calling [`read_entries`](Self::read_entries) until it
/// returns an empty batch.
#[allow(async_fn_in_trait)]
pub trait DirectoryEntry: Sized {
    type File: FileHandle;

    fn name(&self) -> &str;

    async fn read_entries(&mut self) -> Result<Vec<SourceEntry<Self::File, Self>>, LivecodeError>;
}

#[derive(Debug)]
pub enum SourceEntry<F, D> {
    File(F),
    Directory(D),
}

impl<F: FileHandle, D: DirectoryEntry<File = F>> SourceEntry<F, D> {
    pub fn name(&self) -> &str {
        match self {
            SourceEntry::File(file) => file.name(),
            SourceEntry::Directory(dir) => dir.name(),
        }
    }
}

/// One upload, in the shape its source delivered it.
pub enum IngestBatch<D: DirectoryEntry> {
    /// Individual files; each lands at its relative path if it has one, otherwise at its name
    Flat(Vec<D::File>),
    /// Top-level entries of a dropped selection; directories are walked recursively
    Tree(Vec<SourceEntry<D::File, D>>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestProgress {
    /// Files finished so far, whether stored, skipped or failed
    pub processed: usize,
    pub total: usize,
}

impl IngestProgress {
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }

    /// Completion in `[0, 1]`; an empty batch is complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub progress: IngestProgress,
    /// Stored paths in completion order
    pub ingested: Vec<String>,
    /// Paths rejected by the text gate
    pub skipped: Vec<String>,
    /// Paths whose read or insertion failed
    pub failed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// `index.html` in the directory shared by every discovered path, when the target has it
    pub entry_point: Option<String>,
    /// Directory shared by every discovered path ("" when there is none)
    pub common_dir: String,
}

/// Where ingested files are written.
pub trait IngestTarget {
    /// Insert or overwrite a file. Tree and store must change together.
    fn insert_file(&mut self, path: &str, content: String) -> Result<(), LivecodeError>;

    fn contains_file(&self, path: &str) -> bool;
}

impl IngestTarget for Project {
    fn insert_file(&mut self, path: &str, content: String) -> Result<(), LivecodeError> {
        self.create_file(path, content).map(|_| ())
    }

    fn contains_file(&self, path: &str) -> bool {
        self.store().contains(path)
    }
}

/// Borrows the project only for the duration of each insertion, so a host may read it between
/// completions.
impl IngestTarget for &RefCell<Project> {
    fn insert_file(&mut self, path: &str, content: String) -> Result<(), LivecodeError> {
        self.borrow_mut().create_file(path, content).map(|_| ())
    }

    fn contains_file(&self, path: &str) -> bool {
        self.borrow().store().contains(path)
    }
}

pub struct IngestionPipeline {
    gate: TextGate,
    progress: watch::Sender<IngestProgress>,
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new(TextGate::default())
    }
}

impl IngestionPipeline {
    pub fn new(gate: TextGate) -> Self {
        let (progress, _) = watch::channel(IngestProgress::default());
        IngestionPipeline { gate, progress }
    }

    /// Progress of the batch currently running (or the last one).
    pub fn subscribe(&self) -> watch::Receiver<IngestProgress> {
        self.progress.subscribe()
    }

    pub async fn ingest<T, D>(&self, target: &mut T, batch: IngestBatch<D>) -> IngestReport
    where
        T: IngestTarget,
        D: DirectoryEntry,
    {
        match batch {
            IngestBatch::Flat(files) => self.ingest_files(target, files).await,
            IngestBatch::Tree(entries) => self.ingest_entries(target, entries).await,
        }
    }

    pub async fn ingest_files<T, F>(&self, target: &mut T, files: Vec<F>) -> IngestReport
    where
        T: IngestTarget,
        F: FileHandle,
    {
        let located = files
            .into_iter()
            .map(|file| {
                let path = match file.relative_path().filter(|p| !p.is_empty()) {
                    Some(relative) => paths::normalize(relative),
                    None => paths::normalize(file.name()),
                };
                (path, file)
            })
            .collect();
        self.read_all(target, located, Vec::new()).await
    }

    pub async fn ingest_entries<T, F, D>(
        &self,
        target: &mut T,
        entries: Vec<SourceEntry<F, D>>,
    ) -> IngestReport
    where
        T: IngestTarget,
        F: FileHandle,
        D: DirectoryEntry<File = F>,
    {
        let mut diagnostics = Vec::new();
        let mut located = Vec::new();
        // Reverse so the first top-level entry is walked first
        let mut stack: Vec<(String, SourceEntry<F, D>)> = entries
            .into_iter()
            .rev()
            .map(|entry| (String::new(), entry))
            .collect();

        while let Some((prefix, entry)) = stack.pop() {
            match entry {
                SourceEntry::File(file) => {
                    let path = paths::normalize(&format!("{prefix}{}", file.name()));
                    located.push((path, file));
                }
                SourceEntry::Directory(mut dir) => {
                    let dir_prefix = format!("{prefix}{}/", dir.name());
                    let mut children = Vec::new();
                    loop {
                        match dir.read_entries().await {
                            Ok(batch) if batch.is_empty() => break,
                            Ok(batch) => children.extend(batch),
                            Err(e) => {
                                tracing::warn!("[IngestionPipeline] reading '{dir_prefix}': {e}");
                                diagnostics.push(Diagnostic::warning(format!(
                                    "Could not read directory {dir_prefix}: {e}"
                                )));
                                break;
                            }
                        }
                    }
                    stack.extend(
                        children
                            .into_iter()
                            .rev()
                            .map(|child| (dir_prefix.clone(), child)),
                    );
                }
            }
        }
        self.read_all(target, located, diagnostics).await
    }

    async fn read_all<T, F>(
        &self,
        target: &mut T,
        located: Vec<(String, F)>,
        diagnostics: Vec<Diagnostic>,
    ) -> IngestReport
    where
        T: IngestTarget,
        F: FileHandle,
    {
        let mut report = IngestReport {
            progress: IngestProgress {
                processed: 0,
                total: located.len(),
            },
            diagnostics,
            common_dir: paths::common_dir(located.iter().map(|(path, _)| path.as_str())),
            ..Default::default()
        };
        self.progress.send_replace(report.progress);
        tracing::debug!(
            "[IngestionPipeline] ingesting {} files under '{}'",
            report.progress.total,
            report.common_dir
        );

        let mut reads = FuturesUnordered::new();
        for (path, file) in located {
            if path.is_empty() {
                report.failed.push(file.name().to_string());
                report.diagnostics.push(Diagnostic::warning(format!(
                    "'{}' does not name a project path",
                    file.name()
                )));
                self.advance(&mut report);
                continue;
            }
            if !self.gate.is_text(file.name(), file.mime_type(), file.size()) {
                report
                    .diagnostics
                    .push(Diagnostic::warning(format!("Binary file {path} is not supported")));
                report.skipped.push(path);
                self.advance(&mut report);
                continue;
            }
            reads.push(async move {
                let result = file.read_text().await;
                (path, result)
            });
        }

        while let Some((path, result)) = reads.next().await {
            match result.and_then(|content| target.insert_file(&path, content)) {
                Ok(()) => report.ingested.push(path),
                Err(e) => {
                    tracing::warn!("[IngestionPipeline] failed to ingest '{path}': {e}");
                    report
                        .diagnostics
                        .push(Diagnostic::warning(format!("Failed to read {path}: {e}")));
                    report.failed.push(path);
                }
            }
            self.advance(&mut report);
        }

        let index = paths::join(&report.common_dir, "index.html");
        if target.contains_file(&index) && ProjectPath::new(&index).is_html() {
            report.entry_point = Some(index);
        }
        report
    }

    fn advance(&self, report: &mut IngestReport) {
        report.progress.processed += 1;
        self.progress.send_replace(report.progress);
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{MemoryDirectory, MemoryFile};
    use super::*;
    use crate::tests::helpers::{empty_project, init_logging};

    #[tokio::test]
    async fn test_failed_read_counts_as_processed() {
        init_logging();
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        let progress = pipeline.subscribe();
        let files = vec![
            MemoryFile::new("a.html", "<p>a</p>"),
            MemoryFile::new("b.css", "b{}"),
            MemoryFile::failing("c.js"),
            MemoryFile::new("d.md", "# d"),
            MemoryFile::new("e.txt", "e"),
        ];
        let report = pipeline.ingest_files(&mut project, files).await;

        assert_eq!(report.progress, IngestProgress { processed: 5, total: 5 });
        assert!(report.progress.is_complete());
        assert_eq!(*progress.borrow(), report.progress);
        assert_eq!(report.ingested.len(), 4);
        assert_eq!(report.failed, vec!["c.js"]);
        assert_eq!(project.store().len(), 4);
        assert!(!project.tree().contains_file("c.js"));
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].is_warning());
        // no shared directory and no top-level index.html
        assert_eq!(report.entry_point, None);
    }

    #[tokio::test]
    async fn test_reads_overlap_and_apply_in_completion_order() {
        use std::time::Duration;

        init_logging();
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        let mut progress = pipeline.subscribe();
        let ms = Duration::from_millis;
        let files = vec![
            MemoryFile::new("slow.html", "<p>slow</p>").with_delay(ms(80)),
            MemoryFile::new("fast.css", "a{}").with_delay(ms(5)),
            MemoryFile::failing("broken.js").with_delay(ms(40)),
            MemoryFile::new("mid.txt", "mid").with_delay(ms(20)),
        ];

        let observe = async {
            let mut seen = Vec::new();
            while progress.changed().await.is_ok() {
                let step = *progress.borrow_and_update();
                seen.push(step);
                if step.total > 0 && step.is_complete() {
                    break;
                }
            }
            seen
        };
        let (report, seen) = tokio::join!(pipeline.ingest_files(&mut project, files), observe);

        assert_eq!(report.ingested, vec!["fast.css", "mid.txt", "slow.html"]);
        assert_eq!(report.failed, vec!["broken.js"]);
        assert_eq!(project.store().get("slow.html"), Some("<p>slow</p>"));
        assert_eq!(report.progress, IngestProgress { processed: 4, total: 4 });

        assert_eq!(seen.last().copied(), Some(report.progress));
        for pair in seen.windows(2) {
            assert!(pair[0].processed < pair[1].processed, "{seen:?}");
        }
        assert!(seen.iter().all(|step| step.total == 4));
    }

    #[tokio::test]
    async fn test_binary_files_are_skipped_but_counted() {
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        let files = vec![
            MemoryFile::new("site/index.html", "<html></html>"),
            MemoryFile::new("site/logo.png", "")
                .with_mime("image/png")
                .with_size(5 * 1024 * 1024),
        ];
        let report = pipeline.ingest_files(&mut project, files).await;
        assert_eq!(report.progress.processed, 2);
        assert_eq!(report.skipped, vec!["site/logo.png"]);
        assert!(!project.store().contains("site/logo.png"));
        assert_eq!(report.entry_point.as_deref(), Some("site/index.html"));
    }

    #[tokio::test]
    async fn test_relative_path_wins_over_name() {
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        let files = vec![
            MemoryFile::new("index.html", "<h1>x</h1>").with_relative_path("proj/index.html"),
            MemoryFile::new("main.js", "1").with_relative_path("proj/js/main.js"),
        ];
        let report = pipeline.ingest_files(&mut project, files).await;
        assert_eq!(report.common_dir, "proj");
        assert_eq!(report.entry_point.as_deref(), Some("proj/index.html"));
        assert!(project.tree().contains_folder("proj/js"));
        assert_eq!(project.store().get("proj/js/main.js"), Some("1"));
    }

    #[tokio::test]
    async fn test_recursive_walk_with_truncated_batches() {
        init_logging();
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();

        let sub = MemoryDirectory::new("sub").with_file(MemoryFile::new("b.txt", "b"));
        // one entry per read_entries call, to exercise re-polling
        let docs = MemoryDirectory::new("docs")
            .with_file(MemoryFile::new("a.txt", "a"))
            .with_directory(sub)
            .with_file(MemoryFile::new("index.html", "<p>docs</p>"))
            .with_batch_size(1);
        let entries = vec![SourceEntry::Directory(docs)];
        let report = pipeline.ingest_entries(&mut project, entries).await;

        assert_eq!(report.progress, IngestProgress { processed: 3, total: 3 });
        assert!(project.store().contains("docs/a.txt"));
        assert!(project.store().contains("docs/sub/b.txt"));
        assert!(project.tree().contains_folder("docs"));
        assert!(project.tree().contains_folder("docs/sub"));
        assert_eq!(report.common_dir, "docs");
        assert_eq!(report.entry_point.as_deref(), Some("docs/index.html"));
    }

    #[tokio::test]
    async fn test_unreadable_directory_is_a_warning() {
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        let entries = vec![
            SourceEntry::Directory(MemoryDirectory::failing("locked")),
            SourceEntry::File(MemoryFile::new("ok.css", "x{}")),
        ];
        let batch: IngestBatch<MemoryDirectory> = IngestBatch::Tree(entries);
        let report = pipeline.ingest(&mut project, batch).await;
        assert_eq!(report.ingested, vec!["ok.css"]);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message().contains("locked/"));
    }

    #[tokio::test]
    async fn test_reingest_overwrites_content() {
        let mut project = empty_project();
        let pipeline = IngestionPipeline::default();
        pipeline
            .ingest_files(&mut project, vec![MemoryFile::new("a.css", "old")])
            .await;
        pipeline
            .ingest_files(&mut project, vec![MemoryFile::new("a.css", "new")])
            .await;
        assert_eq!(project.store().get("a.css"), Some("new"));
        assert_eq!(project.store().len(), 1);
        assert_eq!(project.tree().file_count(), 1);
    }

    #[tokio::test]
    async fn test_refcell_target() {
        let project = RefCell::new(empty_project());
        let pipeline = IngestionPipeline::default();
        let mut target = &project;
        let report = pipeline
            .ingest_files(&mut target, vec![MemoryFile::new("x/index.html", "<p/>")])
            .await;
        assert_eq!(report.entry_point.as_deref(), Some("x/index.html"));
        assert!(project.borrow().store().contains("x/index.html"));
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(IngestProgress::default().fraction(), 1.0);
        assert_eq!(
            IngestProgress {
                processed: 1,
                total: 4
            }
            .fraction(),
            0.25
        );
    }
}
