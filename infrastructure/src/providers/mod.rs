//! Feedback client adapters
//!
//! HTTP implementations of the [`FeedbackClient`] port, one per
//! [`ApiProvider`], plus the factory that builds the configured one.

mod ollama;
mod openrouter;

pub use ollama::OllamaFeedbackClient;
pub use openrouter::OpenRouterFeedbackClient;

use crate::config::FileConfig;
use sideview_application::{FeedbackClient, FeedbackClientError};
use sideview_domain::util::excerpt;
use sideview_domain::{ApiProvider, FeedbackResult, parse_feedback_response};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Raw reply text kept on parse errors, in characters
const RAW_EXCERPT_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum ProviderBuildError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Overrides applied on top of the file configuration (from CLI flags)
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub provider: Option<ApiProvider>,
    pub model: Option<String>,
}

/// Build the feedback client selected by configuration.
///
/// An unknown provider name falls back to Ollama; `FileConfig::validate`
/// reports it separately.
pub fn create_feedback_client(
    config: &FileConfig,
    overrides: &ProviderOverrides,
) -> Result<Arc<dyn FeedbackClient>, ProviderBuildError> {
    let provider = overrides
        .provider
        .unwrap_or_else(|| config.provider.parse_provider().0);
    let (params, _) = config.provider.generation_params();
    let http = http_client(config.provider.timeout_secs)?;

    let client: Arc<dyn FeedbackClient> = match provider {
        ApiProvider::Ollama => {
            let model = overrides
                .model
                .clone()
                .unwrap_or_else(|| config.ollama.model.clone());
            Arc::new(OllamaFeedbackClient::new(
                http,
                &config.ollama.base_url,
                model,
                params,
            ))
        }
        ApiProvider::OpenRouter => {
            let model = overrides
                .model
                .clone()
                .unwrap_or_else(|| config.openrouter.model.clone());
            Arc::new(OpenRouterFeedbackClient::new(
                http,
                &config.openrouter.base_url,
                model,
                config.openrouter.resolve_api_key(),
                params,
            ))
        }
    };

    debug!(
        "Feedback client: {} ({})",
        client.name(),
        client.model()
    );
    Ok(client)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
}

/// Map a reqwest transport failure (connect, timeout, body read)
fn transport_error(provider: &str, error: reqwest::Error) -> FeedbackClientError {
    let message = if error.is_timeout() {
        format!("{} request timed out", provider)
    } else if error.is_connect() {
        format!("could not connect to {}: {}", provider, error)
    } else {
        format!("{} request failed: {}", provider, error)
    };
    FeedbackClientError::transport(message)
}

/// Parse the model's text reply into feedback
fn parse_reply(reply: &str) -> Result<FeedbackResult, FeedbackClientError> {
    parse_feedback_response(reply)
        .ok_or_else(|| FeedbackClientError::parse(excerpt(reply, RAW_EXCERPT_CHARS)))
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_configured_provider() {
        let mut config = FileConfig::default();
        let client = create_feedback_client(&config, &ProviderOverrides::default()).unwrap();
        assert_eq!(client.name(), "ollama");
        assert_eq!(client.model(), "llama2");

        config.provider.default = "openrouter".to_string();
        let client = create_feedback_client(&config, &ProviderOverrides::default()).unwrap();
        assert_eq!(client.name(), "openrouter");
        assert_eq!(client.model(), "openai/gpt-3.5-turbo");
    }

    #[test]
    fn test_factory_applies_overrides() {
        let config = FileConfig::default();
        let overrides = ProviderOverrides {
            provider: Some(ApiProvider::OpenRouter),
            model: Some("mistralai/mistral-7b-instruct".to_string()),
        };
        let client = create_feedback_client(&config, &overrides).unwrap();
        assert_eq!(client.name(), "openrouter");
        assert_eq!(client.model(), "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn test_parse_reply_keeps_excerpt_on_failure() {
        let reply = "x".repeat(2_000);
        match parse_reply(&reply) {
            Err(FeedbackClientError::Parse { raw }) => {
                assert_eq!(raw.chars().count(), RAW_EXCERPT_CHARS + 3);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("http://localhost:11434/"), "http://localhost:11434");
        assert_eq!(trim_base_url("http://localhost:11434"), "http://localhost:11434");
    }
}
