//! Offset-to-insertion-point mapping
//!
//! Models return comment anchors as linear character offsets into the full
//! document text, where paragraphs are joined by line breaks.
//! Document hosts insert annotations relative to a paragraph, so each offset
//! is mapped to `(paragraph, offset within paragraph)`.
//!
//! Boundary policy: an offset that lands on a paragraph's end or on the
//! break after it belongs to the *next* paragraph and maps to its start.
//! Offsets at or past the end of the text clamp to the end of the document.

use serde::{Deserialize, Serialize};

/// Length of the break between two paragraphs
pub const PARAGRAPH_BREAK_LEN: usize = 1;

/// Where an annotation is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsertionPoint {
    /// `offset` characters into paragraph `index`
    Paragraph { index: usize, offset: usize },
    /// After the last character of the document
    EndOfDocument,
}

impl InsertionPoint {
    pub fn paragraph(index: usize, offset: usize) -> Self {
        InsertionPoint::Paragraph { index, offset }
    }

    /// Resolve [`InsertionPoint::EndOfDocument`] against concrete paragraph
    /// lengths, yielding `(paragraph, offset)`.
    ///
    /// Returns `None` only for a document with no paragraphs at all.
    pub fn resolve(&self, paragraph_lengths: &[usize]) -> Option<(usize, usize)> {
        match *self {
            InsertionPoint::Paragraph { index, offset } => Some((index, offset)),
            InsertionPoint::EndOfDocument => {
                let last = paragraph_lengths.len().checked_sub(1)?;
                Some((last, paragraph_lengths[last]))
            }
        }
    }
}

/// Map a linear character offset to an insertion point.
///
/// Single linear scan over the paragraph lengths, in document order.
/// Paragraph `i` starts at `start_i`; the first paragraph with
/// `start_i + len_i > offset` receives the point at
/// `offset - start_i` (never negative: a break offset maps to the start).
pub fn locate_offset<I>(paragraph_lengths: I, offset: usize) -> InsertionPoint
where
    I: IntoIterator<Item = usize>,
{
    locate_spans(
        paragraph_lengths
            .into_iter()
            .map(|len| (len, PARAGRAPH_BREAK_LEN)),
        offset,
    )
}

/// Scan `(paragraph length, break length)` pairs in document order
fn locate_spans<I>(spans: I, offset: usize) -> InsertionPoint
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut consumed = 0usize;

    for (index, (len, break_len)) in spans.into_iter().enumerate() {
        if consumed + len > offset {
            return InsertionPoint::paragraph(index, offset.saturating_sub(consumed));
        }
        consumed += len + break_len;
    }

    InsertionPoint::EndOfDocument
}

/// Character length of each `\n`-separated paragraph in `text`, without
/// a trailing `\r`
pub fn paragraph_lengths(text: &str) -> Vec<usize> {
    text.split('\n')
        .map(|p| p.trim_end_matches('\r').chars().count())
        .collect()
}

/// Map an offset against raw document text.
///
/// A `\r\n` break is two characters wide, so offsets taken from text with
/// Windows line endings land in the same paragraph as the character they
/// point at.
pub fn locate_in_text(text: &str, offset: usize) -> InsertionPoint {
    let spans = text.split('\n').map(|p| {
        let line = p.trim_end_matches('\r');
        let cr = p.len() - line.len();
        (line.chars().count(), cr + PARAGRAPH_BREAK_LEN)
    });
    locate_spans(spans, offset)
}

/// Convert `\r\n` and lone `\r` breaks to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENGTHS: [usize; 3] = [5, 0, 10];

    #[test]
    fn test_offset_zero_is_start_of_first_paragraph() {
        assert_eq!(locate_offset(LENGTHS, 0), InsertionPoint::paragraph(0, 0));
    }

    #[test]
    fn test_offset_within_first_paragraph() {
        assert_eq!(locate_offset(LENGTHS, 3), InsertionPoint::paragraph(0, 3));
    }

    #[test]
    fn test_boundary_belongs_to_next_paragraph() {
        // End of paragraph 0 is the start of the empty paragraph 1
        assert_eq!(locate_offset(LENGTHS, 5), InsertionPoint::paragraph(1, 0));
    }

    #[test]
    fn test_offset_after_empty_paragraph() {
        assert_eq!(locate_offset(LENGTHS, 6), InsertionPoint::paragraph(2, 0));
        assert_eq!(locate_offset(LENGTHS, 9), InsertionPoint::paragraph(2, 2));
    }

    #[test]
    fn test_offset_beyond_text_clamps_to_end() {
        // Total length is 5 + 1 + 0 + 1 + 10 = 17
        assert_eq!(locate_offset(LENGTHS, 1000), InsertionPoint::EndOfDocument);
        assert_eq!(locate_offset(LENGTHS, 17), InsertionPoint::EndOfDocument);
        assert_eq!(
            InsertionPoint::EndOfDocument.resolve(&LENGTHS),
            Some((2, 10))
        );
    }

    #[test]
    fn test_last_character_stays_in_last_paragraph() {
        assert_eq!(locate_offset(LENGTHS, 16), InsertionPoint::paragraph(2, 9));
    }

    #[test]
    fn test_mapping_is_stable() {
        for offset in [0, 5, 6, 11, 17, 1000] {
            assert_eq!(locate_offset(LENGTHS, offset), locate_offset(LENGTHS, offset));
        }
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(locate_offset(Vec::<usize>::new(), 0), InsertionPoint::EndOfDocument);
        assert_eq!(InsertionPoint::EndOfDocument.resolve(&[]), None);
    }

    #[test]
    fn test_paragraph_lengths_count_chars() {
        assert_eq!(paragraph_lengths("héllo\n\nworld\nx"), vec![5, 0, 5, 1]);
    }

    #[test]
    fn test_locate_in_crlf_text() {
        let text = "ab\r\ncd\r\nef";
        assert_eq!(locate_in_text(text, 1), InsertionPoint::paragraph(0, 1));
        // The `\r` is part of the break and belongs to the next paragraph
        assert_eq!(locate_in_text(text, 2), InsertionPoint::paragraph(1, 0));
        assert_eq!(locate_in_text(text, 4), InsertionPoint::paragraph(1, 0));
        assert_eq!(locate_in_text(text, 8), InsertionPoint::paragraph(2, 0));
        assert_eq!(locate_in_text(text, 9), InsertionPoint::paragraph(2, 1));
        assert_eq!(locate_in_text(text, 10), InsertionPoint::EndOfDocument);
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        let normalized = normalize_line_endings("ab\r\ncd");
        assert_eq!(locate_in_text(&normalized, 3), InsertionPoint::paragraph(1, 0));
    }

    #[test]
    fn test_locate_in_text() {
        let text = "Intro\n\nBody text.";
        assert_eq!(locate_in_text(text, 7), InsertionPoint::paragraph(2, 0));
        assert_eq!(locate_in_text(text, 9), InsertionPoint::paragraph(2, 2));
    }
}
