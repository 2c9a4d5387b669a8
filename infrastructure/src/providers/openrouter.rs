//! OpenRouter chat completions client

use super::{parse_reply, transport_error, trim_base_url};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sideview_application::{FeedbackClient, FeedbackClientError, FeedbackRequest};
use sideview_domain::{FeedbackResult, GenerationParams};
use tracing::debug;

/// Sent as `X-Title` so requests are attributed in the OpenRouter dashboard
const APP_TITLE: &str = "Sideview";

pub struct OpenRouterFeedbackClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    params: GenerationParams,
}

impl OpenRouterFeedbackClient {
    /// A missing `api_key` is reported on every `invoke`, not here, so each
    /// persona records the failure.
    pub fn new(
        client: Client,
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            model: model.into(),
            api_key,
            params,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[async_trait]
impl FeedbackClient for OpenRouterFeedbackClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        request: &FeedbackRequest<'_>,
    ) -> Result<FeedbackResult, FeedbackClientError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FeedbackClientError::Config(
                "OpenRouter API key is required".to_string(),
            ));
        };

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                ChatMessage {
                    role: "system",
                    content: request.persona_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.document_text,
                },
            ],
            temperature: self.params.temperature,
            max_tokens: self.params.context_window,
            seed: self.params.seed,
        };

        debug!("POST {}/chat/completions ({})", self.base_url, request.persona);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("OpenRouter", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error("OpenRouter", e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("OpenRouter API error: {}", status));
            return Err(FeedbackClientError::remote(status.as_u16(), message));
        }

        let chat: ChatResponse =
            serde_json::from_str(&text).map_err(|_| FeedbackClientError::parse(text.clone()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| FeedbackClientError::parse(text.clone()))?;

        parse_reply(&content)
    }
}
