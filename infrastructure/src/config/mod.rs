//! Configuration file loading for sideview
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SIDEVIEW_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sideview.toml` or `./.sideview.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sideview/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileOllamaConfig, FileOpenRouterConfig, FileOutputConfig,
    FilePromptsConfig, FileProviderConfig,
};
pub use loader::ConfigLoader;
