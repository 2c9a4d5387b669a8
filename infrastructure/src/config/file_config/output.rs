//! Output and logging configuration from TOML (`[output]`, `[logging]`)

use serde::{Deserialize, Serialize};
use sideview_domain::OutputFormat;
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Log file settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write a JSONL transcript of each run
    pub transcript: bool,
    /// Directory for diagnostic logs and transcripts
    pub log_dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Log directory, defaulting to the platform data dir
    pub fn resolve_log_dir(&self) -> Option<PathBuf> {
        self.log_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("sideview").join("logs")))
    }
}
