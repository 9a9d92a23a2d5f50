//! Configuration structures for numeral extraction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for cnum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CnumConfig {
    /// Numeral extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Extraction driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters of context read before a magnitude keyword.
    pub context_before: usize,

    /// Characters of context read after a magnitude keyword.
    pub context_after: usize,

    /// Emit matches for lone digit glyphs left after the magnitude passes.
    pub bare_digits: bool,

    /// Negate matches preceded by a negative marker.
    pub detect_negative: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_before: 30,
            context_after: 40,
            bare_digits: true,
            detect_negative: true,
        }
    }
}

/// Output configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format name (`text`, `json` or `csv`).
    pub default_format: String,

    /// Separator used when listing matches on one line.
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            separator: ", ".to_string(),
        }
    }
}

impl CnumConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
