//! Application layer for sideview
//!
//! This crate contains the analysis use case and the port definitions it
//! drives. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document::{DocumentAccessError, DocumentAdapter},
    feedback_client::{FeedbackClient, FeedbackClientError, FeedbackRequest},
    progress::{AnalysisProgressNotifier, NoProgress},
};
pub use use_cases::run_analysis::{ClearAnalysisError, FeedbackOrchestrator, RunAnalysisError};
