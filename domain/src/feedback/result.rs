//! Structured feedback for one persona

use super::comment::{Anchor, SnippetComment};
use super::scores::{FeedbackScores, ScoreCriterion};
use crate::persona::PersonaInfo;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a parsed response is rejected before it reaches the document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing score for '{0}'")]
    MissingScore(ScoreCriterion),

    #[error("score for '{criterion}' is out of range: {value}")]
    ScoreOutOfRange { criterion: ScoreCriterion, value: f64 },

    #[error("comment #{index} has an inverted anchor range {start}..{end}")]
    InvertedAnchor {
        index: usize,
        start: usize,
        end: usize,
    },
}

/// Feedback produced by one persona in one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub scores: FeedbackScores,
    /// Point comments, in the order they are inserted
    pub snippet_comments: Vec<SnippetComment>,
    pub general_comments: Vec<String>,
    pub summary: String,
}

impl FeedbackResult {
    pub fn new(scores: FeedbackScores, summary: impl Into<String>) -> Self {
        Self {
            scores,
            snippet_comments: Vec::new(),
            general_comments: Vec::new(),
            summary: summary.into(),
        }
    }

    pub fn with_snippet_comment(mut self, comment: SnippetComment) -> Self {
        self.snippet_comments.push(comment);
        self
    }

    pub fn with_general_comment(mut self, comment: impl Into<String>) -> Self {
        self.general_comments.push(comment.into());
        self
    }

    /// Check that every criterion is scored within range and that every
    /// anchor is well formed. Reports the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(criterion) = self.scores.missing().next() {
            return Err(ValidationError::MissingScore(criterion));
        }

        for (criterion, value) in self.scores.iter() {
            if !FeedbackScores::is_in_range(value) {
                return Err(ValidationError::ScoreOutOfRange { criterion, value });
            }
        }

        for (index, comment) in self.snippet_comments.iter().enumerate() {
            if let Anchor::Range { start, end } = comment.anchor
                && start > end
            {
                return Err(ValidationError::InvertedAnchor { index, start, end });
            }
        }

        Ok(())
    }

    /// Heading of the trailing section written after a persona's comments
    pub fn section_heading(persona: &PersonaInfo) -> String {
        format!("{} Feedback", persona.display_name)
    }

    /// Body of the trailing section: scores, general comments, then summary
    pub fn section_body(&self) -> String {
        let mut lines = Vec::new();

        for (criterion, value) in self.scores.iter() {
            lines.push(format!("{}: {}", criterion.display_name(), format_score(value)));
        }

        if !self.general_comments.is_empty() {
            lines.push(String::new());
            for comment in &self.general_comments {
                lines.push(format!("- {}", comment));
            }
        }

        if !self.summary.trim().is_empty() {
            lines.push(String::new());
            lines.push(format!("Summary: {}", self.summary.trim()));
        }

        lines.join("\n")
    }
}

/// Whole numbers print without a fractional part
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
