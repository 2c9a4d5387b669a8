//! Document positioning and annotations
//!
//! Pure logic for placing annotations in a paragraph-structured document.

pub mod annotation;
pub mod position;

pub use annotation::{AnnotationComment, AnnotationSection, Annotations};
pub use position::{
    InsertionPoint, locate_in_text, locate_offset, normalize_line_endings, paragraph_lengths,
};
