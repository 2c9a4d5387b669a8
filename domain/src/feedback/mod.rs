//! Feedback domain
//!
//! Structured feedback a persona returns for a document: per-criterion
//! scores, anchored point comments, general comments and a summary.
//!
//! - [`FeedbackResult`] - one persona's feedback, validated before use
//! - [`SnippetComment`] / [`Anchor`] - a comment and where it attaches
//! - [`FeedbackScores`] / [`ScoreCriterion`] - the fixed scoring axes
//! - [`parse_feedback_response`] - lenient extraction from model replies

pub mod comment;
pub mod parsing;
pub mod result;
pub mod scores;

pub use comment::{Anchor, SnippetComment};
pub use parsing::{parse_feedback_json, parse_feedback_response};
pub use result::{FeedbackResult, ValidationError, format_score};
pub use scores::{FeedbackScores, MAX_SCORE, MIN_SCORE, ScoreCriterion};
