//! Infrastructure layer for sideview
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod document;
pub mod logging;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use document::TextDocument;
pub use logging::JsonlConversationLogger;
pub use prompts::{FilePromptStore, PromptStoreError};
pub use providers::{
    OllamaFeedbackClient, OpenRouterFeedbackClient, ProviderBuildError, ProviderOverrides,
    create_feedback_client,
};
