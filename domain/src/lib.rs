//! Domain layer for sideview
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Personas
//!
//! A fixed set of reviewing viewpoints (management, technical, hr, legal,
//! junior), processed in that order on every run.
//!
//! ## Feedback
//!
//! Each persona returns scores, anchored point comments, general comments
//! and a summary. Anchors are character offsets into the document text and
//! are mapped to paragraph positions by [`document::locate_offset`].
//!
//! ## Analysis Run
//!
//! One pass over all personas. A persona's failure is recorded as a
//! [`PersonaFailure`] in the run's result map and never aborts the run.

pub mod analysis;
pub mod config;
pub mod core;
pub mod document;
pub mod feedback;
pub mod persona;
pub mod prompt;
pub mod util;

// Re-export commonly used types
pub use analysis::{AnalysisRun, FailureCause, PersonaFailure, PersonaOutcome, RunError, RunStatus};
pub use config::{
    ApiProvider, ConfigIssue, ConfigIssueCode, GenerationParams, OutputFormat, Severity,
};
pub use core::error::DomainError;
pub use document::{
    AnnotationComment, AnnotationSection, Annotations, InsertionPoint, locate_in_text,
    locate_offset, normalize_line_endings, paragraph_lengths,
};
pub use feedback::{
    Anchor, FeedbackResult, FeedbackScores, ScoreCriterion, SnippetComment, ValidationError,
    format_score, parse_feedback_json, parse_feedback_response,
};
pub use persona::{PersonaId, PersonaInfo, PersonaRegistry};
pub use prompt::{PromptConfig, PromptTemplate};
