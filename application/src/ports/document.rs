//! Document adapter port
//!
//! The document is the one shared mutable resource. During a run the
//! orchestrator is its only writer. Each mutating call is expected to
//! apply fully or fail; partial application across several calls is
//! possible and is not rolled back.

use async_trait::async_trait;
use sideview_domain::PersonaInfo;
use thiserror::Error;

/// Errors raised by document hosts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentAccessError {
    #[error("No document is open")]
    NoDocument,

    #[error("Document is protected: {0}")]
    Protected(String),

    #[error("Unsupported by this document host: {0}")]
    Unsupported(String),

    #[error("Document I/O error: {0}")]
    Io(String),
}

/// Read and annotate the document under review
#[async_trait]
pub trait DocumentAdapter: Send + Sync {
    /// Whether this host can hold annotations at all.
    ///
    /// Answered once at construction; checked before a run starts.
    fn supports_annotations(&self) -> bool;

    /// Full document text, paragraphs separated by `\n`
    async fn read_text(&self) -> Result<String, DocumentAccessError>;

    /// Remove every annotation this system inserted. Idempotent.
    async fn clear_annotations(&self) -> Result<(), DocumentAccessError>;

    /// Insert a point comment at a character offset into the text
    async fn insert_comment(
        &self,
        anchor_offset: usize,
        author: &PersonaInfo,
        text: &str,
    ) -> Result<(), DocumentAccessError>;

    /// Append a headed section after the end of the document
    async fn insert_trailing_section(
        &self,
        heading: &str,
        body: &str,
    ) -> Result<(), DocumentAccessError>;

    /// Number of annotations currently present
    async fn count_annotations(&self) -> Result<usize, DocumentAccessError>;
}
