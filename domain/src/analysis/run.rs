//! Analysis run entity
//!
//! [`AnalysisRun`] is the orchestrator's working state for one invocation.
//! Its fields are private so the run-state invariants hold by construction:
//!
//! - `processed_count` never decreases within a run and never exceeds
//!   `total_count`
//! - each persona has at most one entry in the result map per run
//! - status moves Idle → Running → {Completed, Failed}; [`AnalysisRun::start`]
//!   resets a terminal run back to Running

use crate::feedback::{FeedbackResult, ValidationError};
use crate::persona::PersonaId;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Lifecycle status of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a single persona produced no usable feedback
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// Non-success HTTP status, or a transport failure (`status` is `None`)
    #[error("{}", describe_remote(.status, .message))]
    Remote { status: Option<u16>, message: String },

    #[error("could not parse feedback from response")]
    Parse { raw: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid feedback: {error}")]
    Validation {
        #[serde(serialize_with = "serialize_display")]
        error: ValidationError,
    },

    /// Writing the feedback into the document failed
    #[error("document access error: {message}")]
    DocumentAccess { message: String },
}

fn describe_remote(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("remote error ({}): {}", code, message),
        None => format!("remote error: {}", message),
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_str(value)
}

impl FailureCause {
    pub fn kind(&self) -> &'static str {
        match self {
            FailureCause::Remote { .. } => "remote",
            FailureCause::Parse { .. } => "parse",
            FailureCause::Config { .. } => "config",
            FailureCause::Validation { .. } => "validation",
            FailureCause::DocumentAccess { .. } => "document_access",
        }
    }
}

impl From<ValidationError> for FailureCause {
    fn from(error: ValidationError) -> Self {
        FailureCause::Validation { error }
    }
}

/// Failure marker recorded for a persona in place of its result
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{persona} feedback failed: {cause}")]
pub struct PersonaFailure {
    pub persona: PersonaId,
    pub cause: FailureCause,
}

impl PersonaFailure {
    pub fn new(persona: PersonaId, cause: FailureCause) -> Self {
        Self { persona, cause }
    }
}

/// Outcome of one persona within a run
pub type PersonaOutcome = Result<FeedbackResult, PersonaFailure>;

/// Run-level failure that stopped the run before or outside the persona loop
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunError {
    #[error("No document content found. Make sure a document is open and contains text.")]
    DocumentEmpty,

    #[error("The document does not support annotations")]
    AnnotationsUnsupported,

    #[error("Analysis aborted: {cause}")]
    RunAbort { cause: String },
}

/// Working state of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    status: RunStatus,
    current_persona: Option<PersonaId>,
    processed_count: usize,
    total_count: usize,
    results: BTreeMap<PersonaId, PersonaOutcome>,
    run_error: Option<RunError>,
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRun {
    /// A fresh, idle run over the full persona set
    pub fn new() -> Self {
        Self {
            status: RunStatus::Idle,
            current_persona: None,
            processed_count: 0,
            total_count: PersonaId::count(),
            results: BTreeMap::new(),
            run_error: None,
        }
    }

    // ==================== Queries ====================

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Persona whose feedback is currently being requested or written
    pub fn current_persona(&self) -> Option<PersonaId> {
        self.current_persona
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn run_error(&self) -> Option<&RunError> {
        self.run_error.as_ref()
    }

    /// Outcome for a persona, `None` if it has not been attempted this run
    pub fn result(&self, persona: PersonaId) -> Option<&PersonaOutcome> {
        self.results.get(&persona)
    }

    /// All recorded outcomes in persona order
    pub fn results(&self) -> impl Iterator<Item = (PersonaId, &PersonaOutcome)> {
        self.results.iter().map(|(p, o)| (*p, o))
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.values().filter(|o| o.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.values().filter(|o| o.is_err()).count()
    }

    /// Successful results in persona order
    pub fn successes(&self) -> impl Iterator<Item = (PersonaId, &FeedbackResult)> {
        self.results
            .iter()
            .filter_map(|(p, o)| o.as_ref().ok().map(|r| (*p, r)))
    }

    /// Failure markers in persona order
    pub fn failures(&self) -> impl Iterator<Item = &PersonaFailure> {
        self.results.values().filter_map(|o| o.as_ref().err())
    }

    /// Fraction of personas resolved so far (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.processed_count as f64 / self.total_count as f64
        }
    }

    // ==================== Transitions ====================

    /// Begin a new run, discarding the previous run's state
    pub fn start(&mut self) {
        *self = Self {
            status: RunStatus::Running,
            ..Self::new()
        };
    }

    /// Mark `persona` as the one being processed
    pub fn begin_persona(&mut self, persona: PersonaId) {
        debug_assert!(self.is_running());
        self.current_persona = Some(persona);
    }

    /// Record the outcome of a persona and count it as processed.
    ///
    /// Returns `false` (and changes nothing) if the persona already has an
    /// entry in this run or the run is not running.
    pub fn record(&mut self, persona: PersonaId, outcome: PersonaOutcome) -> bool {
        if !self.is_running() || self.results.contains_key(&persona) {
            return false;
        }
        self.results.insert(persona, outcome);
        self.processed_count = (self.processed_count + 1).min(self.total_count);
        true
    }

    /// Close the loop: Completed if any persona succeeded, otherwise Failed
    pub fn finish(&mut self) -> RunStatus {
        self.current_persona = None;
        self.status = if self.success_count() > 0 {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        self.status
    }

    /// Fail the run on a precondition or abort-class error
    pub fn abort(&mut self, error: RunError) {
        self.current_persona = None;
        self.status = RunStatus::Failed;
        self.run_error = Some(error);
    }

    /// Return to Idle with an empty result map
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
