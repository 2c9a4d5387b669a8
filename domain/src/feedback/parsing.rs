//! Feedback parsing from model replies.
//!
//! Models are asked for a JSON object but often wrap it in a ` ```json `
//! fence or surround it with prose. Three shapes are accepted, in order:
//!
//! 1. The first ` ```json ` (or bare ` ``` `) fenced block
//! 2. The whole reply as JSON
//! 3. The span from the first `{` to the last `}`
//!
//! Parsing is lenient about field names and number shapes but does not
//! judge completeness; that is [`FeedbackResult::validate`]'s job.

use super::comment::{Anchor, SnippetComment};
use super::result::FeedbackResult;
use super::scores::{FeedbackScores, ScoreCriterion};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawFeedback {
    #[serde(default, alias = "snippet_comments", alias = "snippetComments")]
    comments: Vec<RawComment>,
    #[serde(default)]
    scores: serde_json::Map<String, Value>,
    #[serde(
        default,
        alias = "generalComments",
        alias = "general",
        alias = "general_feedback"
    )]
    general_comments: Vec<String>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(alias = "comment", alias = "comment_text", alias = "commentText")]
    text: String,
    #[serde(default, alias = "offset")]
    position: Option<Value>,
    #[serde(default)]
    start: Option<Value>,
    #[serde(default)]
    end: Option<Value>,
    #[serde(
        default,
        alias = "sourceText",
        alias = "quote",
        alias = "snippet",
        alias = "excerpt"
    )]
    source_text: String,
}

impl RawComment {
    fn into_snippet(self) -> Option<SnippetComment> {
        let anchor = match (self.start.as_ref(), self.end.as_ref()) {
            (Some(start), Some(end)) => Anchor::range(as_offset(start)?, as_offset(end)?),
            (Some(start), None) => Anchor::offset(as_offset(start)?),
            _ => Anchor::offset(as_offset(self.position.as_ref()?)?),
        };
        Some(SnippetComment::new(self.text, anchor).with_source_text(self.source_text))
    }
}

/// Interpret a JSON value as a non-negative character offset.
///
/// Accepts integers, integral floats (`12.0`) and numeric strings.
fn as_offset(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                usize::try_from(u).ok()
            } else {
                let f = n.as_f64()?;
                (f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64).then_some(f as usize)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

/// Extract the JSON payload candidate from a model reply.
fn json_candidates(response: &str) -> Vec<&str> {
    let mut candidates = Vec::new();

    if let Some(fenced) = fenced_block(response) {
        candidates.push(fenced);
    }

    candidates.push(response.trim());

    if let (Some(open), Some(close)) = (response.find('{'), response.rfind('}'))
        && open < close
    {
        candidates.push(&response[open..=close]);
    }

    candidates
}

fn fenced_block(response: &str) -> Option<&str> {
    let fence_start = response.find("```")?;
    let after_fence = &response[fence_start + 3..];
    // Skip the info string ("json", "JSON", or nothing) up to the newline
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let body_end = body.find("```")?;
    Some(body[..body_end].trim())
}

/// Parse a model reply into a [`FeedbackResult`].
///
/// Returns `None` when no candidate is a JSON object with the expected
/// shape, or when a comment has no usable anchor. Unknown score keys are
/// ignored; missing ones are left for validation to report.
pub fn parse_feedback_response(response: &str) -> Option<FeedbackResult> {
    json_candidates(response)
        .into_iter()
        .find_map(|candidate| serde_json::from_str::<RawFeedback>(candidate).ok())
        .and_then(into_feedback)
}

/// Parse an already-decoded JSON value (e.g. from a provider's JSON mode).
pub fn parse_feedback_json(value: Value) -> Option<FeedbackResult> {
    serde_json::from_value::<RawFeedback>(value)
        .ok()
        .and_then(into_feedback)
}

fn into_feedback(raw: RawFeedback) -> Option<FeedbackResult> {
    let mut scores = FeedbackScores::new();
    for (key, value) in &raw.scores {
        if let Ok(criterion) = key.parse::<ScoreCriterion>()
            && let Some(score) = as_score(value)
        {
            scores.set(criterion, score);
        }
    }

    let snippet_comments = raw
        .comments
        .into_iter()
        .map(RawComment::into_snippet)
        .collect::<Option<Vec<_>>>()?;

    Some(FeedbackResult {
        scores,
        snippet_comments,
        general_comments: raw.general_comments,
        summary: raw.summary,
    })
}
