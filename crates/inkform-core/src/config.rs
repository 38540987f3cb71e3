//! Panel configuration.

use crate::color::NEUTRAL_COLOR;
use crate::drawing::DEFAULT_UNDO_HISTORY;
use crate::error::{InkformError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the editing panel. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Number of undo states the drawing keeps.
    pub undo_history_limit: usize,
    /// What color inputs show when the selection has no single color.
    pub neutral_color: String,
    /// Whether sections start collapsed.
    pub sections_start_collapsed: bool,
    /// Whether text content may be emptied.
    pub allow_empty_text_content: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            undo_history_limit: DEFAULT_UNDO_HISTORY,
            neutral_color: NEUTRAL_COLOR.to_string(),
            sections_start_collapsed: false,
            allow_empty_text_content: false,
        }
    }
}

impl PanelConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| InkformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded panel config from {}", path.display());
        Ok(config)
    }
}
