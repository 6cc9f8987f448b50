//! In-memory file and directory handles, for hosts that already hold file contents and for tests.

use std::time::Duration;

use super::{DirectoryEntry, FileHandle, SourceEntry};
use crate::error::LivecodeError;

#[cfg(not(target_arch = "wasm32"))]
async fn wait(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

// No timer without a native runtime; reads complete immediately.
#[cfg(target_arch = "wasm32")]
async fn wait(_delay: Option<Duration>) {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    content: Option<String>,
    size: u64,
    mime_type: Option<String>,
    relative_path: Option<String>,
    delay: Option<Duration>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        MemoryFile {
            name: name.into(),
            size: content.len() as u64,
            content: Some(content),
            mime_type: None,
            relative_path: None,
            delay: None,
        }
    }

    /// A handle whose read always fails.
    pub fn failing(name: impl Into<String>) -> Self {
        MemoryFile {
            name: name.into(),
            content: None,
            size: 0,
            mime_type: None,
            relative_path: None,
            delay: None,
        }
    }

    pub fn with_mime(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Override the reported size without changing the content.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// Hold every read (successful or not) for `delay` before it completes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl FileHandle for MemoryFile {
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
        wait(self.delay).await;
        self.content
            .clone()
            .ok_or_else(|| LivecodeError::read(&self.name, "handle is not readable"))
    }
}

/// A directory that hands out its children `batch_size` at a time.
#[derive(Debug)]
pub struct MemoryDirectory {
    name: String,
    pending: Vec<SourceEntry<MemoryFile, MemoryDirectory>>,
    batch_size: usize,
    readable: bool,
}

impl MemoryDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryDirectory {
            name: name.into(),
            pending: Vec::new(),
            batch_size: usize::MAX,
            readable: true,
        }
    }

    /// A directory whose enumeration always fails.
    pub fn failing(name: impl Into<String>) -> Self {
        MemoryDirectory {
            readable: false,
            ..Self::new(name)
        }
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.pending.push(SourceEntry::File(file));
        self
    }

    pub fn with_directory(mut self, dir: MemoryDirectory) -> Self {
        self.pending.push(SourceEntry::Directory(dir));
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl DirectoryEntry for MemoryDirectory {
    type File = MemoryFile;

    fn name(&self) -> &str {
        &self.name
    }

    async fn read_entries(
        &mut self,
    ) -> Result<Vec<SourceEntry<MemoryFile, MemoryDirectory>>, LivecodeError> {
        if !self.readable {
            return Err(LivecodeError::Io(format!(
                "directory '{}' is not readable",
                self.name
            )));
        }
        let take = self.batch_size.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }
}
