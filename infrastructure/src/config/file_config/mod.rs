//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod prompts;
mod provider;

pub use output::{FileLoggingConfig, FileOutputConfig};
pub use prompts::FilePromptsConfig;
pub use provider::{FileOllamaConfig, FileOpenRouterConfig, FileProviderConfig};

use serde::{Deserialize, Serialize};
use sideview_domain::{ApiProvider, ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider selection and sampling
    pub provider: FileProviderConfig,
    /// Ollama server settings
    pub ollama: FileOllamaConfig,
    /// OpenRouter API settings
    pub openrouter: FileOpenRouterConfig,
    /// Prompt sources
    pub prompts: FilePromptsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log and transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Provider name
    /// 2. Sampling parameter ranges
    /// 3. Request timeout
    /// 4. Model names and URLs of the selected provider
    /// 5. OpenRouter API key, when OpenRouter is selected
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let (provider, provider_issues) = self.provider.parse_provider();
        issues.extend(provider_issues);
        issues.extend(self.provider.generation_params().1);

        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "provider.timeout_secs".to_string(),
                },
                "provider.timeout_secs: must be greater than 0",
            ));
        }

        let (model_field, model, url_field, url) = match provider {
            ApiProvider::Ollama => (
                "ollama.model",
                &self.ollama.model,
                "ollama.base_url",
                &self.ollama.base_url,
            ),
            ApiProvider::OpenRouter => (
                "openrouter.model",
                &self.openrouter.model,
                "openrouter.base_url",
                &self.openrouter.base_url,
            ),
        };
        for (field, value) in [(model_field, model), (url_field, url)] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{}: cannot be empty", field),
                ));
            }
        }

        if provider == ApiProvider::OpenRouter && self.openrouter.resolve_api_key().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey {
                    provider: "openrouter".to_string(),
                },
                format!(
                    "openrouter: no API key in config or ${}, every persona will fail",
                    self.openrouter.api_key_env
                ),
            ));
        }

        issues
    }
}
