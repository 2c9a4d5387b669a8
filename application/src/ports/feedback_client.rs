//! Feedback client port
//!
//! Defines the interface for requesting structured feedback from a model
//! provider. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use sideview_domain::{FailureCause, FeedbackResult, PersonaId};
use thiserror::Error;

/// Errors that can occur while requesting feedback
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackClientError {
    /// Non-success HTTP status, or a transport failure when `status` is `None`
    #[error("Remote error{}: {message}", status_suffix(.status))]
    Remote { status: Option<u16>, message: String },

    /// The reply was not valid structured feedback
    #[error("Could not parse feedback from response")]
    Parse { raw: String },

    /// Required provider configuration (e.g. an API key) is missing
    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl FeedbackClientError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    pub fn parse(raw: impl Into<String>) -> Self {
        Self::Parse { raw: raw.into() }
    }
}

impl From<FeedbackClientError> for FailureCause {
    fn from(error: FeedbackClientError) -> Self {
        match error {
            FeedbackClientError::Remote { status, message } => {
                FailureCause::Remote { status, message }
            }
            FeedbackClientError::Parse { raw } => FailureCause::Parse { raw },
            FeedbackClientError::Config(message) => FailureCause::Config { message },
        }
    }
}

/// Everything a client needs to ask one persona for feedback
///
/// How the three prompt parts are framed is up to the client.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackRequest<'a> {
    pub document_text: &'a str,
    pub system_prompt: &'a str,
    pub persona_prompt: &'a str,
    pub persona: PersonaId,
}

/// Client for model-generated document feedback
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    /// Short provider name for logs (e.g. "ollama")
    fn name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Request and parse feedback for one persona
    async fn invoke(&self, request: &FeedbackRequest<'_>)
    -> Result<FeedbackResult, FeedbackClientError>;
}
