//! Plain-text document host
//!
//! Paragraphs are the lines of a text file. The file itself is never
//! modified: annotations live in a JSON sidecar next to it
//! (`<file name>.sideview.json`) and are rewritten after every change.

use async_trait::async_trait;
use sideview_application::{DocumentAccessError, DocumentAdapter};
use sideview_domain::{
    AnnotationComment, AnnotationSection, Annotations, PersonaInfo, locate_in_text,
    normalize_line_endings,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SIDECAR_SUFFIX: &str = ".sideview.json";

/// Text file (or in-memory text) with sidecar annotations
pub struct TextDocument {
    text: String,
    sidecar: Option<PathBuf>,
    writable: bool,
    annotations: Mutex<Annotations>,
}

impl TextDocument {
    /// Open a text file and any annotations already stored for it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DocumentAccessError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocumentAccessError::NoDocument,
            _ => DocumentAccessError::Io(format!("{}: {}", path.display(), e)),
        })?;
        // Offsets from the model are counted against exactly this text
        let text = normalize_line_endings(&raw);

        let sidecar = Self::sidecar_path(path);
        let annotations = match tokio::fs::read_to_string(&sidecar).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                DocumentAccessError::Io(format!("{}: {}", sidecar.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Annotations::default(),
            Err(e) => {
                return Err(DocumentAccessError::Io(format!(
                    "{}: {}",
                    sidecar.display(),
                    e
                )));
            }
        };

        let writable = Self::directory_writable(&sidecar).await;
        debug!(
            "Opened {} ({} annotations, writable: {})",
            path.display(),
            annotations.len(),
            writable
        );

        Ok(Self {
            text,
            sidecar: Some(sidecar),
            writable,
            annotations: Mutex::new(annotations),
        })
    }

    /// In-memory document; annotations are kept but never persisted.
    pub fn from_text(text: impl AsRef<str>) -> Self {
        Self {
            text: normalize_line_endings(text.as_ref()),
            sidecar: None,
            writable: true,
            annotations: Mutex::new(Annotations::default()),
        }
    }

    /// `plan.txt` -> `plan.txt.sideview.json` in the same directory
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(SIDECAR_SUFFIX);
        path.with_file_name(name)
    }

    async fn directory_writable(sidecar: &Path) -> bool {
        let dir = match sidecar.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        match tokio::fs::metadata(dir).await {
            Ok(meta) => !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Copy of the current annotations
    pub fn annotations(&self) -> Annotations {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, Annotations> {
        self.annotations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_writable(&self) -> Result<(), DocumentAccessError> {
        if self.writable {
            Ok(())
        } else {
            Err(DocumentAccessError::Protected(
                "annotation file location is read-only".to_string(),
            ))
        }
    }

    /// Apply `change` and persist, or leave the annotations unchanged on failure.
    async fn update<F>(&self, change: F) -> Result<(), DocumentAccessError>
    where
        F: FnOnce(&mut Annotations),
    {
        self.ensure_writable()?;

        let mut next = self.annotations();
        change(&mut next);

        let Some(sidecar) = &self.sidecar else {
            *self.state() = next;
            return Ok(());
        };

        let result = if next.is_empty() {
            match tokio::fs::remove_file(sidecar).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            }
        } else {
            let json = serde_json::to_string_pretty(&next)
                .map_err(|e| DocumentAccessError::Io(e.to_string()))?;
            tokio::fs::write(sidecar, json).await
        };

        result.map_err(|e| DocumentAccessError::Io(format!("{}: {}", sidecar.display(), e)))?;
        *self.state() = next;
        Ok(())
    }
}

#[async_trait]
impl DocumentAdapter for TextDocument {
    fn supports_annotations(&self) -> bool {
        self.writable
    }

    async fn read_text(&self) -> Result<String, DocumentAccessError> {
        Ok(self.text.clone())
    }

    async fn clear_annotations(&self) -> Result<(), DocumentAccessError> {
        if self.state().is_empty() && self.sidecar.as_ref().is_none_or(|p| !p.exists()) {
            return Ok(());
        }
        self.update(|annotations| *annotations = Annotations::default())
            .await
    }

    async fn insert_comment(
        &self,
        anchor_offset: usize,
        author: &PersonaInfo,
        text: &str,
    ) -> Result<(), DocumentAccessError> {
        let comment =
            AnnotationComment::new(author, locate_in_text(&self.text, anchor_offset), text);
        self.update(|annotations| annotations.comments.push(comment))
            .await
    }

    async fn insert_trailing_section(
        &self,
        heading: &str,
        body: &str,
    ) -> Result<(), DocumentAccessError> {
        let section = AnnotationSection {
            heading: heading.to_string(),
            body: body.to_string(),
        };
        self.update(|annotations| annotations.sections.push(section))
            .await
    }

    async fn count_annotations(&self) -> Result<usize, DocumentAccessError> {
        Ok(self.state().len())
    }
}
