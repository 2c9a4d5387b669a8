//! Progress notification port
//!
//! Defines the interface for reporting progress during an analysis run.

use sideview_domain::{AnalysisRun, PersonaId};

/// Callback for progress updates during an analysis run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, etc.)
pub trait AnalysisProgressNotifier: Send + Sync {
    /// Called once preconditions pass, before the first persona
    fn on_analysis_start(&self, total_personas: usize);

    /// Called before the feedback request for `persona` is sent
    fn on_persona_start(&self, persona: PersonaId);

    /// Called when `persona` is resolved, successfully or not
    fn on_persona_complete(&self, persona: PersonaId, success: bool);

    /// Called with the final state of the run
    fn on_analysis_complete(&self, _run: &AnalysisRun) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl AnalysisProgressNotifier for NoProgress {
    fn on_analysis_start(&self, _total_personas: usize) {}
    fn on_persona_start(&self, _persona: PersonaId) {}
    fn on_persona_complete(&self, _persona: PersonaId, _success: bool) {}
}
