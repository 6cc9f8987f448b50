//! Seams to the host's editing widget and preview frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::LivecodeError, language::Language};

/// The text editing widget. Its content is opaque to the core; the host reports edits by calling
/// [`Session::on_content_changed`](crate::session::Session::on_content_changed).
pub trait EditorSurface {
    /// Current text of the document being edited.
    fn current_text(&self) -> String;

    /// Replace the edited document.
    fn set_document(&mut self, content: &str, language: Language);
}

/// The preview frame.
pub trait RenderSurface {
    /// Replace the whole displayed document.
    fn write_document(&mut self, html: &str) -> Result<(), LivecodeError>;

    /// Update the preview panel's title. Hosts without a title may ignore it.
    fn set_title(&mut self, _title: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

/// What a rendered preview reports back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderEvent {
    Console {
        level: ConsoleLevel,
        #[serde(default)]
        args: Vec<Value>,
    },
    /// An uncaught error in the rendered document
    Error {
        message: String,
        #[serde(default)]
        line: u32,
        #[serde(default)]
        column: u32,
    },
}
