//! Messages collected for the user-facing console.
//!
//! Diagnostics never interrupt the caller: read failures, skipped uploads and errors raised inside
//! the rendered preview are all recorded here and processing continues.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::surface::ConsoleLevel;

/// A single console line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum Diagnostic {
    /// Progress and status messages
    Info { message: String },

    /// Something was skipped or could not be read; the operation carried on without it
    Warning { message: String },

    /// An error, optionally located at a (line, column) in the rendered document
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        location: Option<(u32, u32)>,
    },
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            location: None,
        }
    }

    pub fn located_error(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Error {
            message: message.into(),
            location: Some((line, column)),
        }
    }

    /// Console call forwarded from the rendered preview. `console.log` and `console.info` are
    /// informational, `console.warn` is a warning and `console.error` an error.
    pub fn from_console(level: ConsoleLevel, args: &[Value]) -> Self {
        let message = format_console_args(args);
        match level {
            ConsoleLevel::Log | ConsoleLevel::Info => Self::info(message),
            ConsoleLevel::Warn => Self::warning(message),
            ConsoleLevel::Error => Self::error(message),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info { message } | Self::Warning { message } | Self::Error { message, .. } => {
                message
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info { message } => write!(f, "{message}"),
            Self::Warning { message } => write!(f, "Warning: {message}"),
            Self::Error {
                message,
                location: Some((line, column)),
            } => write!(f, "Error: {message} at line {line}:{column}"),
            Self::Error {
                message,
                location: None,
            } => write!(f, "Error: {message}"),
        }
    }
}

/// Join console arguments with spaces. Strings are written as-is; anything else is JSON, objects
/// and arrays pretty-printed with two-space indentation.
pub fn format_console_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.clone(),
            Value::Object(_) | Value::Array(_) => {
                serde_json::to_string_pretty(arg).unwrap_or_else(|_| arg.to_string())
            }
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
