//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while parsing identifiers and settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Unknown API provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown score criterion: {0}")]
    UnknownCriterion(String),

    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),
}
