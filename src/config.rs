use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};

use crate::{
    error::LivecodeError,
    language::{TextGate, DEFAULT_TEXT_SIZE_LIMIT},
    paths,
};

/// Editor settings. Every field is optional in TOML; missing fields take their defaults.
///
/// ```toml
/// auto_preview = false
/// text_size_limit = 1048576
/// extra_text_extensions = ["csv", "tsv"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Re-render the preview after every edit
    pub auto_preview: bool,
    /// Start new projects with `root/index.html`, `root/style.css` and `root/script.js`
    pub seed_project: bool,
    /// Files above this size (bytes) are binary unless their extension or MIME type says text
    pub text_size_limit: u64,
    pub extra_text_extensions: Vec<String>,
    /// Conventional entry point used when nothing more specific is available
    pub default_entry: String,
    /// Directory entries read per batch when walking a native directory
    pub dir_batch_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            auto_preview: true,
            seed_project: true,
            text_size_limit: DEFAULT_TEXT_SIZE_LIMIT,
            extra_text_extensions: Vec::new(),
            default_entry: "root/index.html".to_string(),
            dir_batch_size: 64,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, LivecodeError> {
        let mut config: EditorConfig = toml::from_str(content)?;
        // must match store keys, which are always normalized
        config.default_entry = paths::normalize(&config.default_entry);
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LivecodeError> {
        tracing::debug!("Reading editor config from {:?}", path.as_ref());
        let content = read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, LivecodeError> {
        Ok(toml::to_string(self)?)
    }

    pub fn text_gate(&self) -> TextGate {
        TextGate::new(self.text_size_limit, &self.extra_text_extensions)
    }

    fn validate(&self) -> Result<(), LivecodeError> {
        if self.dir_batch_size == 0 {
            return Err(LivecodeError::Config(
                "dir_batch_size must be at least 1".to_string(),
            ));
        }
        if self.default_entry.is_empty() {
            return Err(LivecodeError::Config(
                "default_entry must name a file".to_string(),
            ));
        }
        Ok(())
    }
}
