use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::language::Language;

/// Changes to a [`Project`](crate::project::Project), published to an optional listener so hosts
/// can redraw trees and tabs without diffing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectEvent {
    /// Path, language
    FileAdded(String, Language),
    /// Existing file's content replaced
    FileUpdated(String),
    FolderAdded(String),
    FileOpened(String),
    FileClosed(String),
    /// Entry path of the document just rendered
    PreviewUpdated(String),
    /// Nothing could be rendered
    PreviewCleared,
}

impl ProjectEvent {
    /// Path the event refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ProjectEvent::FileAdded(path, _)
            | ProjectEvent::FileUpdated(path)
            | ProjectEvent::FolderAdded(path)
            | ProjectEvent::FileOpened(path)
            | ProjectEvent::FileClosed(path)
            | ProjectEvent::PreviewUpdated(path) => Some(path),
            ProjectEvent::PreviewCleared => None,
        }
    }
}

impl Display for ProjectEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ProjectEvent::FileAdded(path, _) => write!(f, "FileAdded({path})"),
            ProjectEvent::FileUpdated(path) => write!(f, "FileUpdated({path})"),
            ProjectEvent::FolderAdded(path) => write!(f, "FolderAdded({path})"),
            ProjectEvent::FileOpened(path) => write!(f, "FileOpened({path})"),
            ProjectEvent::FileClosed(path) => write!(f, "FileClosed({path})"),
            ProjectEvent::PreviewUpdated(path) => write!(f, "PreviewUpdated({path})"),
            ProjectEvent::PreviewCleared => write!(f, "PreviewCleared"),
        }
    }
}
