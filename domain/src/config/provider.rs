//! Provider selection and generation parameters

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Where feedback requests are sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// Locally hosted Ollama server
    #[default]
    Ollama,
    /// OpenRouter chat completions API
    OpenRouter,
}

impl ApiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiProvider::Ollama => "ollama",
            ApiProvider::OpenRouter => "openrouter",
        }
    }
}

impl std::fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ApiProvider::Ollama),
            "openrouter" | "open-router" => Ok(ApiProvider::OpenRouter),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// Sampling parameters shared by every provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f64,
    /// Fixed seed for reproducible output, when the provider honours it
    pub seed: Option<u64>,
    /// Context window (Ollama `num_ctx`) / max tokens (OpenRouter)
    pub context_window: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.75,
            seed: None,
            context_window: 4096,
        }
    }
}
