//! Annotations held by a document host

use super::position::InsertionPoint;
use crate::persona::{PersonaId, PersonaInfo};
use serde::{Deserialize, Serialize};

/// A point comment placed in a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationComment {
    pub persona: PersonaId,
    pub author: String,
    pub color: String,
    pub position: InsertionPoint,
    pub text: String,
}

impl AnnotationComment {
    pub fn new(author: &PersonaInfo, position: InsertionPoint, text: impl Into<String>) -> Self {
        Self {
            persona: author.id,
            author: author.display_name.to_string(),
            color: author.color.to_string(),
            position,
            text: text.into(),
        }
    }
}

/// A headed section appended after the document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSection {
    pub heading: String,
    pub body: String,
}

/// Everything inserted into one document, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub comments: Vec<AnnotationComment>,
    #[serde(default)]
    pub sections: Vec<AnnotationSection>,
}

impl Annotations {
    pub fn len(&self) -> usize {
        self.comments.len() + self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Comments placed in paragraph `index`
    pub fn comments_in_paragraph(&self, index: usize) -> impl Iterator<Item = &AnnotationComment> {
        self.comments.iter().filter(move |c| {
            matches!(c.position, InsertionPoint::Paragraph { index: i, .. } if i == index)
        })
    }

    /// Comments whose offset fell past the end of the text
    pub fn comments_at_end(&self) -> impl Iterator<Item = &AnnotationComment> {
        self.comments
            .iter()
            .filter(|c| c.position == InsertionPoint::EndOfDocument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_filters() {
        let author = PersonaId::Junior.info();
        let annotations = Annotations {
            comments: vec![
                AnnotationComment::new(author, InsertionPoint::paragraph(0, 2), "a"),
                AnnotationComment::new(author, InsertionPoint::paragraph(2, 0), "b"),
                AnnotationComment::new(author, InsertionPoint::EndOfDocument, "c"),
            ],
            sections: vec![AnnotationSection {
                heading: "Junior Feedback".to_string(),
                body: String::new(),
            }],
        };

        assert_eq!(annotations.len(), 4);
        assert_eq!(annotations.comments_in_paragraph(2).count(), 1);
        assert_eq!(annotations.comments_in_paragraph(1).count(), 0);
        assert_eq!(annotations.comments_at_end().next().unwrap().text, "c");
        assert_eq!(annotations.comments[0].author, author.display_name);
    }

    #[test]
    fn test_sidecar_json_shape() {
        let annotations = Annotations {
            comments: vec![AnnotationComment::new(
                PersonaId::Legal.info(),
                InsertionPoint::paragraph(1, 4),
                "Check",
            )],
            sections: Vec::new(),
        };
        let json = serde_json::to_value(&annotations).unwrap();
        assert_eq!(json["comments"][0]["persona"], "legal");
        assert_eq!(json["comments"][0]["position"]["kind"], "paragraph");
        assert_eq!(json["comments"][0]["position"]["index"], 1);
    }
}
