//! Native filesystem sources.
//!
//! [`scan_directory`] produces the same shape as a browser directory picker: a flat list of files
//! carrying paths relative to the picked directory's parent. [`NativeDirectory`] mirrors dropped
//! directory entries: children are enumerated lazily, a batch at a time.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{DirectoryEntry, FileHandle, SourceEntry};
use crate::error::LivecodeError;

fn os_path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFile {
    path: PathBuf,
    name: String,
    size: u64,
    relative_path: Option<String>,
}

impl NativeFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        NativeFile {
            path,
            name,
            size,
            relative_path: None,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for NativeFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    async fn read_text(&self) -> Result<String, LivecodeError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LivecodeError::read(os_path_to_string(&self.path), e))
    }
}

/// Every non-hidden file below `root`, in sorted order, with relative paths that start with
/// `root`'s own name (`site/index.html` for a picked `site` directory).
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Result<Vec<NativeFile>, LivecodeError> {
    fn is_hidden(entry: &DirEntry) -> bool {
        entry.file_name().to_str().map(is_hidden_name).unwrap_or(false)
    }
    let root = root.as_ref();
    let root_name = root
        .canonicalize()?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(os_path_to_string)
            .map_err(|e| LivecodeError::InvalidPath(e.to_string()))?;
        let size = entry.metadata()?.len();
        files.push(
            NativeFile::new(entry.into_path(), size)
                .with_relative_path(crate::paths::join(&root_name, &relative)),
        );
    }
    tracing::debug!("Scanned {} files under {:?}", files.len(), root);
    Ok(files)
}

/// A directory enumerated with `tokio::fs::read_dir`, `batch_size` entries per call.
#[derive(Debug)]
pub struct NativeDirectory {
    path: PathBuf,
    name: String,
    batch_size: usize,
    reader: Option<tokio::fs::ReadDir>,
    exhausted: bool,
    pending_error: Option<LivecodeError>,
}

impl NativeDirectory {
    pub fn new(path: PathBuf, batch_size: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        NativeDirectory {
            path,
            name,
            batch_size: batch_size.max(1),
            reader: None,
            exhausted: false,
            pending_error: None,
        }
    }

    /// Wrap a filesystem path as a top-level entry of a dropped selection.
    pub async fn entry(
        path: PathBuf,
        batch_size: usize,
    ) -> Result<SourceEntry<NativeFile, NativeDirectory>, LivecodeError> {
        let meta = tokio::fs::metadata(&path).await?;
        if meta.is_dir() {
            Ok(SourceEntry::Directory(NativeDirectory::new(path, batch_size)))
        } else {
            Ok(SourceEntry::File(NativeFile::new(path, meta.len())))
        }
    }
}

impl DirectoryEntry for NativeDirectory {
    type File = NativeFile;

    fn name(&self) -> &str {
        &self.name
    }

    async fn read_entries(
        &mut self,
    ) -> Result<Vec<SourceEntry<NativeFile, NativeDirectory>>, LivecodeError> {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }
        if self.exhausted {
            return Ok(Vec::new());
        }
        if self.reader.is_none() {
            self.reader = Some(tokio::fs::read_dir(&self.path).await?);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Vec::new());
        };
        let mut batch = Vec::new();
        while batch.len() < self.batch_size {
            let entry = match reader.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    self.exhausted = true;
                    break;
                }
                // hand out what was collected; the error surfaces on the next call
                Err(e) if !batch.is_empty() => {
                    self.exhausted = true;
                    self.pending_error = Some(LivecodeError::from(e));
                    break;
                }
                Err(e) => {
                    self.exhausted = true;
                    return Err(e.into());
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden_name(&name) {
                continue;
            }
            let path = entry.path();
            // follows symlinks
            let meta = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!("[NativeDirectory] skipping {:?}: {e}", path);
                    continue;
                }
            };
            if meta.is_dir() {
                batch.push(SourceEntry::Directory(NativeDirectory::new(
                    path,
                    self.batch_size,
                )));
            } else if meta.is_file() {
                batch.push(SourceEntry::File(NativeFile::new(path, meta.len())));
            }
        }
        Ok(batch)
    }
}
