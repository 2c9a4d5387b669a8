//! Analysis run domain
//!
//! State of one end-to-end analysis across all personas, with per-persona
//! outcomes kept as data rather than propagated as errors.

pub mod run;

pub use run::{AnalysisRun, FailureCause, PersonaFailure, PersonaOutcome, RunError, RunStatus};
