//! Ollama `/api/generate` client

use super::{parse_reply, transport_error, trim_base_url};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sideview_application::{FeedbackClient, FeedbackClientError, FeedbackRequest};
use sideview_domain::{FeedbackResult, GenerationParams, PromptTemplate};
use tracing::debug;

pub struct OllamaFeedbackClient {
    client: Client,
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl OllamaFeedbackClient {
    pub fn new(
        client: Client,
        base_url: &str,
        model: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            model: model.into(),
            params,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl FeedbackClient for OllamaFeedbackClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        request: &FeedbackRequest<'_>,
    ) -> Result<FeedbackResult, FeedbackClientError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: PromptTemplate::completion_prompt(
                request.system_prompt,
                request.persona_prompt,
                request.document_text,
            ),
            stream: false,
            options: GenerateOptions {
                temperature: self.params.temperature,
                seed: self.params.seed,
                num_ctx: self.params.context_window,
            },
        };

        debug!("POST {}/api/generate ({})", self.base_url, request.persona);
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(FeedbackClientError::remote(status.as_u16(), message));
        }

        let generated: GenerateResponse =
            serde_json::from_str(&text).map_err(|_| FeedbackClientError::parse(text.clone()))?;

        parse_reply(&generated.response)
    }
}
