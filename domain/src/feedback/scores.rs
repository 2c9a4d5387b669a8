//! Score criteria and per-criterion values

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest accepted score
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score
pub const MAX_SCORE: f64 = 100.0;

/// A named axis the model scores the document on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCriterion {
    Clarity,
    Tone,
    Impact,
    Actionability,
}

impl ScoreCriterion {
    /// Every criterion a well-formed response must score
    pub const ALL: [ScoreCriterion; 4] = [
        ScoreCriterion::Clarity,
        ScoreCriterion::Tone,
        ScoreCriterion::Impact,
        ScoreCriterion::Actionability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCriterion::Clarity => "clarity",
            ScoreCriterion::Tone => "tone",
            ScoreCriterion::Impact => "impact",
            ScoreCriterion::Actionability => "actionability",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ScoreCriterion::Clarity => "Clarity",
            ScoreCriterion::Tone => "Tone",
            ScoreCriterion::Impact => "Impact",
            ScoreCriterion::Actionability => "Actionability",
        }
    }
}

impl std::fmt::Display for ScoreCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScoreCriterion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clarity" => Ok(ScoreCriterion::Clarity),
            "tone" => Ok(ScoreCriterion::Tone),
            "impact" => Ok(ScoreCriterion::Impact),
            "actionability" => Ok(ScoreCriterion::Actionability),
            other => Err(DomainError::UnknownCriterion(other.to_string())),
        }
    }
}

/// Scores keyed by criterion, as reported by the model
///
/// Construction does not validate: a client may report a partial or
/// out-of-range set, and [`FeedbackResult::validate`](super::FeedbackResult::validate)
/// decides whether it is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackScores {
    values: BTreeMap<ScoreCriterion, f64>,
}

impl FeedbackScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, criterion: ScoreCriterion, value: f64) -> Self {
        self.values.insert(criterion, value);
        self
    }

    pub fn set(&mut self, criterion: ScoreCriterion, value: f64) {
        self.values.insert(criterion, value);
    }

    pub fn get(&self, criterion: ScoreCriterion) -> Option<f64> {
        self.values.get(&criterion).copied()
    }

    /// Iterate reported scores in criterion order
    pub fn iter(&self) -> impl Iterator<Item = (ScoreCriterion, f64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }

    /// Criteria with no reported value
    pub fn missing(&self) -> impl Iterator<Item = ScoreCriterion> + '_ {
        ScoreCriterion::ALL
            .into_iter()
            .filter(|c| !self.values.contains_key(c))
    }

    /// Mean over the reported criteria (0.0 when nothing is reported)
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.values().sum::<f64>() / self.values.len() as f64
        }
    }

    pub fn is_in_range(value: f64) -> bool {
        value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value)
    }
}
