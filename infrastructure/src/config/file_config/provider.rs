//! Provider configuration from TOML (`[provider]`, `[ollama]`, `[openrouter]`)

use serde::{Deserialize, Serialize};
use sideview_domain::{ApiProvider, ConfigIssue, ConfigIssueCode, GenerationParams};

/// Shared provider settings (`[provider]` section)
///
/// # Example
///
/// ```toml
/// [provider]
/// default = "openrouter"
/// temperature = 0.3
/// seed = 42
/// context_window = 8192
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider used for feedback requests: "ollama" or "openrouter"
    pub default: String,
    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f64,
    /// Fixed sampling seed
    pub seed: Option<u64>,
    /// Ollama `num_ctx` / OpenRouter `max_tokens`
    pub context_window: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            default: ApiProvider::default().as_str().to_string(),
            temperature: params.temperature,
            seed: params.seed,
            context_window: params.context_window,
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Parse the provider name, falling back to Ollama with an error issue.
    pub fn parse_provider(&self) -> (ApiProvider, Vec<ConfigIssue>) {
        match self.default.parse::<ApiProvider>() {
            Ok(provider) => (provider, Vec::new()),
            Err(e) => (
                ApiProvider::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "provider.default".to_string(),
                        value: self.default.clone(),
                        valid_values: vec!["ollama".to_string(), "openrouter".to_string()],
                    },
                    format!("provider.default: {}", e),
                )],
            ),
        }
    }

    /// Sampling parameters with out-of-range values reported.
    pub fn generation_params(&self) -> (GenerationParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = GenerationParams {
            temperature: self.temperature,
            seed: self.seed,
            context_window: self.context_window,
        };

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "provider.temperature".to_string(),
                },
                format!(
                    "provider.temperature: {} is outside 0.0..=2.0",
                    self.temperature
                ),
            ));
            params.temperature = params.temperature.clamp(0.0, 2.0);
        }

        if self.context_window == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "provider.context_window".to_string(),
                },
                "provider.context_window: 0, using the default",
            ));
            params.context_window = GenerationParams::default().context_window;
        }

        (params, issues)
    }
}

/// Ollama settings (`[ollama]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Server base URL
    pub base_url: String,
    /// Model name as known to the server
    pub model: String,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
        }
    }
}

/// OpenRouter settings (`[openrouter]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// API base URL (without `/chat/completions`)
    pub base_url: String,
    /// Model identifier, e.g. "openai/gpt-3.5-turbo"
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer the environment variable)
    pub api_key: Option<String>,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-3.5-turbo".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileOpenRouterConfig {
    /// API key from config, or from the configured environment variable.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
