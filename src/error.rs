use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[cfg(feature = "wasm")]
use serde_wasm_bindgen::Error as WasmError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum LivecodeError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Invalid project path: {0}")]
    InvalidPath(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Could not read '{path}' as text: {reason}")]
    Read { path: String, reason: String },
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl LivecodeError {
    pub fn read(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        LivecodeError::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<toml::de::Error> for LivecodeError {
    fn from(src: toml::de::Error) -> LivecodeError {
        LivecodeError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for LivecodeError {
    fn from(src: toml::ser::Error) -> LivecodeError {
        LivecodeError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for LivecodeError {
    fn from(src: JsonError) -> LivecodeError {
        LivecodeError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for LivecodeError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LivecodeError::NotFound(format!("{x}")),
            io::ErrorKind::InvalidData => LivecodeError::Read {
                path: String::new(),
                reason: format!("{x}"),
            },
            _ => LivecodeError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<walkdir::Error> for LivecodeError {
    fn from(x: walkdir::Error) -> Self {
        let path = x
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match x.into_io_error() {
            Some(io_error) if io_error.kind() == io::ErrorKind::NotFound => {
                LivecodeError::NotFound(path)
            }
            Some(io_error) => LivecodeError::Io(format!("walking '{path}': {}", io_error.kind())),
            None => LivecodeError::Io(format!("filesystem loop detected at '{path}'")),
        }
    }
}

impl From<fmt::Error> for LivecodeError {
    fn from(x: fmt::Error) -> Self {
        LivecodeError::Custom(format!("{x}"))
    }
}

#[cfg(feature = "wasm")]
impl From<WasmError> for LivecodeError {
    fn from(wasm_error: WasmError) -> Self {
        LivecodeError::Serialization(format!("Serde-wasm-bindgen error: {wasm_error}"))
    }
}
