//! Point comments and their document anchors

use serde::{Deserialize, Serialize};

/// Where a comment attaches, in characters from the start of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anchor {
    Offset { offset: usize },
    Range { start: usize, end: usize },
}

impl Anchor {
    pub fn offset(offset: usize) -> Self {
        Anchor::Offset { offset }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Anchor::Range { start, end }
    }

    /// Offset the comment is inserted at
    pub fn start(&self) -> usize {
        match self {
            Anchor::Offset { offset } => *offset,
            Anchor::Range { start, .. } => *start,
        }
    }

    /// A range must not end before it starts
    pub fn is_well_formed(&self) -> bool {
        match self {
            Anchor::Offset { .. } => true,
            Anchor::Range { start, end } => start <= end,
        }
    }
}

/// A single annotation the model wants placed in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetComment {
    /// The quoted excerpt the comment refers to (may be empty)
    pub source_text: String,
    pub comment_text: String,
    pub anchor: Anchor,
}

impl SnippetComment {
    pub fn new(comment_text: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            source_text: String::new(),
            comment_text: comment_text.into(),
            anchor,
        }
    }

    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }
}
