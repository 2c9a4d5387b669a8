//! Run Analysis use case
//!
//! Drives one feedback pass over every persona:
//!
//! 1. Preconditions: the document supports annotations, has non-blank text,
//!    and previous annotations are cleared
//! 2. For each persona, in fixed order: request feedback, validate it,
//!    write comments then a trailing section into the document
//! 3. Finish as `Completed` if any persona succeeded, otherwise `Failed`
//!
//! A persona's failure is recorded in the run's result map and the loop
//! moves on. Only precondition and abort failures are returned as `Err`.
//!
//! Personas run strictly one after another so that comments land in
//! persona order and no two writes touch the document at once.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::document::{DocumentAccessError, DocumentAdapter};
use crate::ports::feedback_client::{FeedbackClient, FeedbackRequest};
use crate::ports::progress::{AnalysisProgressNotifier, NoProgress};
use sideview_domain::util::excerpt;
use sideview_domain::{
    AnalysisRun, FailureCause, FeedbackResult, PersonaFailure, PersonaId, PersonaOutcome,
    PromptConfig, RunError,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by [`FeedbackOrchestrator::run_analysis`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunAnalysisError {
    #[error("An analysis is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Run(#[from] RunError),
}

/// Errors returned by [`FeedbackOrchestrator::clear_analysis`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearAnalysisError {
    #[error("Cannot clear feedback while an analysis is running")]
    AlreadyRunning,

    #[error("Failed to clear feedback: {0}")]
    Document(#[from] DocumentAccessError),
}

/// Use case for running multi-persona feedback over one document
///
/// Holds the current [`AnalysisRun`] so a UI can poll [`snapshot`] while a
/// run is in progress. The run state lock is never held across an await.
///
/// [`snapshot`]: FeedbackOrchestrator::snapshot
pub struct FeedbackOrchestrator {
    client: Arc<dyn FeedbackClient>,
    document: Arc<dyn DocumentAdapter>,
    conversation_logger: Arc<dyn ConversationLogger>,
    run: Mutex<AnalysisRun>,
}

impl FeedbackOrchestrator {
    pub fn new(client: Arc<dyn FeedbackClient>, document: Arc<dyn DocumentAdapter>) -> Self {
        Self {
            client,
            document,
            conversation_logger: Arc::new(NoConversationLogger),
            run: Mutex::new(AnalysisRun::new()),
        }
    }

    /// Create with a transcript logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    fn state(&self) -> MutexGuard<'_, AnalysisRun> {
        // A panic while holding the lock cannot leave AnalysisRun half-updated:
        // every transition is a single method call.
        self.run.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current run state
    pub fn snapshot(&self) -> AnalysisRun {
        self.state().clone()
    }

    /// Outcome for `persona` in the current run, `None` if not yet attempted
    pub fn get_result(&self, persona: PersonaId) -> Option<PersonaOutcome> {
        self.state().result(persona).cloned()
    }

    /// Run the analysis with default (no-op) progress
    pub async fn run_analysis(
        &self,
        prompts: &PromptConfig,
    ) -> Result<AnalysisRun, RunAnalysisError> {
        self.run_analysis_with_progress(prompts, &NoProgress).await
    }

    /// Run the analysis with progress callbacks
    pub async fn run_analysis_with_progress(
        &self,
        prompts: &PromptConfig,
        progress: &dyn AnalysisProgressNotifier,
    ) -> Result<AnalysisRun, RunAnalysisError> {
        {
            let mut run = self.state();
            if run.is_running() {
                return Err(RunAnalysisError::AlreadyRunning);
            }
            run.start();
        }

        info!(
            "Starting analysis with {} ({})",
            self.client.name(),
            self.client.model()
        );

        let document_text = match self.check_preconditions().await {
            Ok(text) => text,
            Err(error) => {
                warn!("Analysis aborted: {}", error);
                self.conversation_logger.log(ConversationEvent::new(
                    "analysis_aborted",
                    serde_json::json!({ "error": error.to_string() }),
                ));
                let mut run = self.state();
                run.abort(error.clone());
                progress.on_analysis_complete(&run);
                return Err(error.into());
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "analysis_started",
            serde_json::json!({
                "provider": self.client.name(),
                "model": self.client.model(),
                "document_chars": document_text.chars().count(),
                "personas": PersonaId::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            }),
        ));
        progress.on_analysis_start(PersonaId::count());

        for persona in PersonaId::ALL {
            self.state().begin_persona(persona);
            progress.on_persona_start(persona);

            let outcome = self.process_persona(persona, &document_text, prompts).await;

            match &outcome {
                Ok(result) => {
                    info!(
                        "{} feedback written ({} comments)",
                        persona.display_name(),
                        result.snippet_comments.len()
                    );
                    self.conversation_logger.log(ConversationEvent::new(
                        "persona_completed",
                        serde_json::json!({
                            "persona": persona.as_str(),
                            "scores": result.scores,
                            "comments": result.snippet_comments.len(),
                            "summary": result.summary,
                        }),
                    ));
                }
                Err(failure) => {
                    warn!("{}", failure);
                    self.conversation_logger.log(ConversationEvent::new(
                        "persona_failed",
                        serde_json::json!({
                            "persona": persona.as_str(),
                            "cause": failure.cause,
                        }),
                    ));
                }
            }

            progress.on_persona_complete(persona, outcome.is_ok());
            self.state().record(persona, outcome);
        }

        let snapshot = {
            let mut run = self.state();
            run.finish();
            run.clone()
        };

        info!(
            "Analysis {}: {}/{} personas succeeded",
            snapshot.status(),
            snapshot.success_count(),
            snapshot.total_count()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "analysis_finished",
            serde_json::json!({
                "status": snapshot.status(),
                "succeeded": snapshot.success_count(),
                "failed": snapshot.failure_count(),
            }),
        ));
        progress.on_analysis_complete(&snapshot);

        Ok(snapshot)
    }

    /// Remove all inserted annotations and reset to Idle.
    ///
    /// Safe to call when there is nothing to clear.
    pub async fn clear_analysis(&self) -> Result<(), ClearAnalysisError> {
        let running = self.state().is_running();
        if running {
            return Err(ClearAnalysisError::AlreadyRunning);
        }

        self.document.clear_annotations().await?;
        self.state().reset();
        debug!("Feedback cleared");
        Ok(())
    }

    /// Validate the document and clear previous annotations.
    ///
    /// Nothing is written to the document unless the text is non-blank.
    async fn check_preconditions(&self) -> Result<String, RunError> {
        if !self.document.supports_annotations() {
            return Err(RunError::AnnotationsUnsupported);
        }

        let text = self
            .document
            .read_text()
            .await
            .map_err(|e| RunError::RunAbort {
                cause: format!("could not read document: {}", e),
            })?;

        if text.trim().is_empty() {
            return Err(RunError::DocumentEmpty);
        }

        self.clear_previous_annotations().await?;
        Ok(text)
    }

    /// Best-effort clear: a failed clear is tolerated only when the
    /// document reports no annotations left.
    async fn clear_previous_annotations(&self) -> Result<(), RunError> {
        let clear_error = match self.document.clear_annotations().await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        match self.document.count_annotations().await {
            Ok(0) => {
                warn!(
                    "Clearing previous feedback failed but nothing was left to clear: {}",
                    clear_error
                );
                Ok(())
            }
            Ok(remaining) => Err(RunError::RunAbort {
                cause: format!(
                    "could not clear {} previous annotations: {}",
                    remaining, clear_error
                ),
            }),
            Err(count_error) => Err(RunError::RunAbort {
                cause: format!(
                    "could not clear previous annotations: {} (count failed: {})",
                    clear_error, count_error
                ),
            }),
        }
    }

    /// Request, validate and write feedback for one persona
    async fn process_persona(
        &self,
        persona: PersonaId,
        document_text: &str,
        prompts: &PromptConfig,
    ) -> PersonaOutcome {
        let fail = |cause: FailureCause| PersonaFailure::new(persona, cause);

        let request = FeedbackRequest {
            document_text,
            system_prompt: &prompts.system_prompt,
            persona_prompt: prompts.persona_prompt(persona),
            persona,
        };

        self.conversation_logger.log(ConversationEvent::new(
            "persona_request",
            serde_json::json!({
                "persona": persona.as_str(),
                "persona_prompt": excerpt(request.persona_prompt, 200),
            }),
        ));

        let result = self
            .client
            .invoke(&request)
            .await
            .map_err(|e| fail(e.into()))?;

        result.validate().map_err(|e| fail(e.into()))?;

        // A failed write discards the result so the report matches the document
        self.write_feedback(persona, &result)
            .await
            .map_err(|e| {
                fail(FailureCause::DocumentAccess {
                    message: e.to_string(),
                })
            })?;

        Ok(result)
    }

    /// Insert snippet comments in order, then the trailing section
    async fn write_feedback(
        &self,
        persona: PersonaId,
        result: &FeedbackResult,
    ) -> Result<(), DocumentAccessError> {
        let info = persona.info();

        for comment in &result.snippet_comments {
            self.document
                .insert_comment(comment.anchor.start(), info, &comment.comment_text)
                .await?;
        }

        self.document
            .insert_trailing_section(
                &FeedbackResult::section_heading(info),
                &result.section_body(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::feedback_client::FeedbackClientError;
    use async_trait::async_trait;
    use sideview_domain::{
        Anchor, FeedbackScores, PersonaInfo, RunStatus, ScoreCriterion, SnippetComment,
    };
    use std::collections::HashMap;
    use std::sync::{OnceLock, Weak};

    // ==================== Test Mocks ====================

    fn valid_result(comments: usize) -> FeedbackResult {
        let scores = ScoreCriterion::ALL
            .iter()
            .fold(FeedbackScores::new(), |s, c| s.with(*c, 75.0));
        (0..comments).fold(FeedbackResult::new(scores, "Looks good"), |r, i| {
            r.with_snippet_comment(SnippetComment::new(
                format!("comment {}", i),
                Anchor::offset(i * 3),
            ))
        })
    }

    /// Feedback client with a scripted response per persona
    struct ScriptedClient {
        responses: Mutex<HashMap<PersonaId, Result<FeedbackResult, FeedbackClientError>>>,
        calls: Mutex<Vec<PersonaId>>,
        prompts_seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        /// Every persona succeeds with `comments` snippet comments
        fn all_succeed(comments: usize) -> Self {
            let responses = PersonaId::ALL
                .into_iter()
                .map(|p| (p, Ok(valid_result(comments))))
                .collect();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
                prompts_seen: Mutex::new(Vec::new()),
            }
        }

        fn with_response(
            self,
            persona: PersonaId,
            response: Result<FeedbackResult, FeedbackClientError>,
        ) -> Self {
            self.responses.lock().unwrap().insert(persona, response);
            self
        }

        fn calls(&self) -> Vec<PersonaId> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedbackClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn invoke(
            &self,
            request: &FeedbackRequest<'_>,
        ) -> Result<FeedbackResult, FeedbackClientError> {
            self.calls.lock().unwrap().push(request.persona);
            self.prompts_seen.lock().unwrap().push((
                request.system_prompt.to_string(),
                request.persona_prompt.to_string(),
            ));
            self.responses
                .lock()
                .unwrap()
                .get(&request.persona)
                .cloned()
                .unwrap_or_else(|| Err(FeedbackClientError::transport("no script")))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum DocCall {
        Clear,
        Comment {
            offset: usize,
            author: String,
            text: String,
        },
        Section {
            heading: String,
        },
    }

    /// In-memory document that records every mutating call
    struct RecordingDocument {
        text: String,
        supports_annotations: bool,
        annotations: Mutex<usize>,
        calls: Mutex<Vec<DocCall>>,
        fail_clear: bool,
        /// Fail `insert_comment` for this author
        fail_comments_for: Option<&'static str>,
    }

    impl RecordingDocument {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                supports_annotations: true,
                annotations: Mutex::new(0),
                calls: Mutex::new(Vec::new()),
                fail_clear: false,
                fail_comments_for: None,
            }
        }

        fn with_existing_annotations(self, count: usize) -> Self {
            *self.annotations.lock().unwrap() = count;
            self
        }

        fn calls(&self) -> Vec<DocCall> {
            self.calls.lock().unwrap().clone()
        }

        fn mutation_count(&self) -> usize {
            self.calls().len()
        }
    }

    #[async_trait]
    impl DocumentAdapter for RecordingDocument {
        fn supports_annotations(&self) -> bool {
            self.supports_annotations
        }

        async fn read_text(&self) -> Result<String, DocumentAccessError> {
            Ok(self.text.clone())
        }

        async fn clear_annotations(&self) -> Result<(), DocumentAccessError> {
            if self.fail_clear {
                return Err(DocumentAccessError::Protected("read-only".to_string()));
            }
            self.calls.lock().unwrap().push(DocCall::Clear);
            *self.annotations.lock().unwrap() = 0;
            Ok(())
        }

        async fn insert_comment(
            &self,
            anchor_offset: usize,
            author: &PersonaInfo,
            text: &str,
        ) -> Result<(), DocumentAccessError> {
            if self.fail_comments_for == Some(author.display_name) {
                return Err(DocumentAccessError::Io("write failed".to_string()));
            }
            self.calls.lock().unwrap().push(DocCall::Comment {
                offset: anchor_offset,
                author: author.display_name.to_string(),
                text: text.to_string(),
            });
            *self.annotations.lock().unwrap() += 1;
            Ok(())
        }

        async fn insert_trailing_section(
            &self,
            heading: &str,
            _body: &str,
        ) -> Result<(), DocumentAccessError> {
            self.calls.lock().unwrap().push(DocCall::Section {
                heading: heading.to_string(),
            });
            *self.annotations.lock().unwrap() += 1;
            Ok(())
        }

        async fn count_annotations(&self) -> Result<usize, DocumentAccessError> {
            Ok(*self.annotations.lock().unwrap())
        }
    }

    /// Progress notifier that records the callback sequence
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl AnalysisProgressNotifier for RecordingProgress {
        fn on_analysis_start(&self, total_personas: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start:{}", total_personas));
        }

        fn on_persona_start(&self, persona: PersonaId) {
            self.events.lock().unwrap().push(format!("begin:{}", persona));
        }

        fn on_persona_complete(&self, persona: PersonaId, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("end:{}:{}", persona, success));
        }

        fn on_analysis_complete(&self, run: &AnalysisRun) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}", run.status()));
        }
    }

    fn orchestrator(
        client: Arc<ScriptedClient>,
        document: Arc<RecordingDocument>,
    ) -> FeedbackOrchestrator {
        FeedbackOrchestrator::new(client, document)
    }

    const TEXT: &str = "Quarterly plan\n\nWe will ship the new billing flow in May.";

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_completed_run_has_entry_per_persona() {
        let client = Arc::new(ScriptedClient::all_succeed(2));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client.clone(), document);

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Completed);
        assert_eq!(run.processed_count(), PersonaId::count());
        assert_eq!(run.result_count(), PersonaId::count());
        assert!(run.current_persona().is_none());
        assert!(run.run_error().is_none());
        assert_eq!(client.calls(), PersonaId::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_empty_document_never_calls_client_or_mutates() {
        for text in ["", "   \n\t\n  "] {
            let client = Arc::new(ScriptedClient::all_succeed(1));
            let document = Arc::new(RecordingDocument::new(text).with_existing_annotations(3));
            let use_case = orchestrator(client.clone(), document.clone());

            let err = use_case
                .run_analysis(&PromptConfig::builtin())
                .await
                .unwrap_err();

            assert_eq!(err, RunAnalysisError::Run(RunError::DocumentEmpty));
            assert!(client.calls().is_empty());
            assert_eq!(document.mutation_count(), 0);
            assert_eq!(document.count_annotations().await.unwrap(), 3);

            let run = use_case.snapshot();
            assert_eq!(run.status(), RunStatus::Failed);
            assert_eq!(run.run_error(), Some(&RunError::DocumentEmpty));
            assert_eq!(run.result_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_single_persona_failure_does_not_abort_run() {
        let client = Arc::new(
            ScriptedClient::all_succeed(1).with_response(
                PersonaId::Hr,
                Err(FeedbackClientError::remote(500, "internal error")),
            ),
        );
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client.clone(), document);

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Completed);
        assert_eq!(run.processed_count(), 5);
        let failure = run.result(PersonaId::Hr).unwrap().as_ref().unwrap_err();
        assert_eq!(
            failure.cause,
            FailureCause::Remote {
                status: Some(500),
                message: "internal error".to_string()
            }
        );
        for persona in PersonaId::ALL.into_iter().filter(|p| *p != PersonaId::Hr) {
            assert!(run.result(persona).unwrap().is_ok(), "{} should succeed", persona);
        }
        // Later personas were still attempted
        assert_eq!(client.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_all_personas_failing_marks_run_failed() {
        let client = Arc::new(
            PersonaId::ALL
                .into_iter()
                .fold(ScriptedClient::all_succeed(0), |c, p| {
                    c.with_response(p, Err(FeedbackClientError::parse("not json")))
                }),
        );
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document);

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Failed);
        assert!(run.run_error().is_none());
        assert_eq!(run.failure_count(), 5);
        assert_eq!(run.processed_count(), 5);
    }

    #[tokio::test]
    async fn test_validation_failure_is_persona_failure() {
        let incomplete = FeedbackResult::new(
            FeedbackScores::new().with(ScoreCriterion::Clarity, 50.0),
            "partial",
        );
        let client = Arc::new(
            ScriptedClient::all_succeed(1).with_response(PersonaId::Legal, Ok(incomplete)),
        );
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document.clone());

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        let failure = run.result(PersonaId::Legal).unwrap().as_ref().unwrap_err();
        assert_eq!(failure.cause.kind(), "validation");
        // Nothing was written for the rejected persona
        assert!(!document.calls().iter().any(|c| matches!(
            c,
            DocCall::Section { heading } if heading == "Legal Feedback"
        )));
    }

    #[tokio::test]
    async fn test_write_failure_discards_result() {
        let client = Arc::new(ScriptedClient::all_succeed(2));
        let mut document = RecordingDocument::new(TEXT);
        document.fail_comments_for = Some("Technical");
        let use_case = orchestrator(client, Arc::new(document));

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Completed);
        let failure = run
            .result(PersonaId::Technical)
            .unwrap()
            .as_ref()
            .unwrap_err();
        assert_eq!(failure.cause.kind(), "document_access");
        assert_eq!(run.success_count(), 4);
    }

    #[tokio::test]
    async fn test_comments_inserted_in_order_then_one_section() {
        let client = Arc::new(ScriptedClient::all_succeed(3));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document.clone());

        use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        let calls = document.calls();
        assert_eq!(calls[0], DocCall::Clear);

        // Per persona: 3 comments in order, then exactly one section
        let per_persona: Vec<_> = calls[1..].chunks(4).collect();
        assert_eq!(per_persona.len(), 5);
        for (chunk, persona) in per_persona.iter().zip(PersonaId::ALL) {
            for (i, call) in chunk[..3].iter().enumerate() {
                assert_eq!(
                    call,
                    &DocCall::Comment {
                        offset: i * 3,
                        author: persona.display_name().to_string(),
                        text: format!("comment {}", i),
                    }
                );
            }
            assert_eq!(
                chunk[3],
                DocCall::Section {
                    heading: format!("{} Feedback", persona.display_name())
                }
            );
        }
    }

    #[tokio::test]
    async fn test_clear_analysis_resets_results() {
        let client = Arc::new(ScriptedClient::all_succeed(2));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document.clone());

        use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();
        assert!(document.count_annotations().await.unwrap() > 0);

        use_case.clear_analysis().await.unwrap();

        for persona in PersonaId::ALL {
            assert!(use_case.get_result(persona).is_none());
        }
        assert_eq!(document.count_annotations().await.unwrap(), 0);
        assert_eq!(use_case.snapshot().status(), RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_clear_analysis_twice_is_idempotent() {
        let client = Arc::new(ScriptedClient::all_succeed(1));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document);

        use_case.clear_analysis().await.unwrap();
        let after_first = use_case.snapshot();
        use_case.clear_analysis().await.unwrap();
        assert_eq!(use_case.snapshot(), after_first);
        assert_eq!(after_first, AnalysisRun::new());
    }

    #[tokio::test]
    async fn test_unsupported_document_fails_fast() {
        let client = Arc::new(ScriptedClient::all_succeed(1));
        let mut document = RecordingDocument::new(TEXT);
        document.supports_annotations = false;
        let document = Arc::new(document);
        let use_case = orchestrator(client.clone(), document.clone());

        let err = use_case
            .run_analysis(&PromptConfig::builtin())
            .await
            .unwrap_err();

        assert_eq!(err, RunAnalysisError::Run(RunError::AnnotationsUnsupported));
        assert!(client.calls().is_empty());
        assert_eq!(document.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_clear_with_nothing_left_still_runs() {
        let client = Arc::new(ScriptedClient::all_succeed(1));
        let mut document = RecordingDocument::new(TEXT);
        document.fail_clear = true;
        let use_case = orchestrator(client.clone(), Arc::new(document));

        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert_eq!(run.status(), RunStatus::Completed);
        assert_eq!(client.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_failed_clear_with_leftovers_aborts() {
        let client = Arc::new(ScriptedClient::all_succeed(1));
        let mut document = RecordingDocument::new(TEXT).with_existing_annotations(2);
        document.fail_clear = true;
        let use_case = orchestrator(client.clone(), Arc::new(document));

        let err = use_case
            .run_analysis(&PromptConfig::builtin())
            .await
            .unwrap_err();

        assert!(matches!(err, RunAnalysisError::Run(RunError::RunAbort { .. })));
        assert!(client.calls().is_empty());
        let run = use_case.snapshot();
        assert_eq!(run.status(), RunStatus::Failed);
        assert_eq!(run.processed_count(), 0);
    }

    #[tokio::test]
    async fn test_new_run_replaces_previous_results() {
        let client = Arc::new(
            ScriptedClient::all_succeed(1)
                .with_response(PersonaId::Junior, Err(FeedbackClientError::parse("?"))),
        );
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client.clone(), document);

        use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();
        assert!(use_case.get_result(PersonaId::Junior).unwrap().is_err());

        client
            .responses
            .lock()
            .unwrap()
            .insert(PersonaId::Junior, Ok(valid_result(0)));
        let run = use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        assert!(run.result(PersonaId::Junior).unwrap().is_ok());
        assert_eq!(run.processed_count(), 5);
    }

    #[tokio::test]
    async fn test_empty_persona_prompts_are_sent_as_is() {
        let client = Arc::new(ScriptedClient::all_succeed(0));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client.clone(), document);

        let prompts = PromptConfig::new("SYSTEM").with_persona_prompt(PersonaId::Hr, "HR ONLY");
        use_case.run_analysis(&prompts).await.unwrap();

        let seen = client.prompts_seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|(system, _)| system == "SYSTEM"));
        assert_eq!(seen[2].1, "HR ONLY");
        assert_eq!(seen[0].1, "");
    }

    #[tokio::test]
    async fn test_progress_callbacks_in_order() {
        let client = Arc::new(
            ScriptedClient::all_succeed(0)
                .with_response(PersonaId::Technical, Err(FeedbackClientError::parse("x"))),
        );
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document);
        let progress = RecordingProgress::default();

        use_case
            .run_analysis_with_progress(&PromptConfig::builtin(), &progress)
            .await
            .unwrap();

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start:5",
                "begin:management",
                "end:management:true",
                "begin:technical",
                "end:technical:false",
                "begin:hr",
                "end:hr:true",
                "begin:legal",
                "end:legal:true",
                "begin:junior",
                "end:junior:true",
                "done:completed",
            ]
        );
    }

    /// Client that inspects the orchestrator's state while it is being called
    struct ObservingClient {
        orchestrator: OnceLock<Weak<FeedbackOrchestrator>>,
        observed: Mutex<Vec<(PersonaId, Option<PersonaId>, usize)>>,
    }

    #[async_trait]
    impl FeedbackClient for ObservingClient {
        fn name(&self) -> &str {
            "observing"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn invoke(
            &self,
            request: &FeedbackRequest<'_>,
        ) -> Result<FeedbackResult, FeedbackClientError> {
            if let Some(orchestrator) = self.orchestrator.get().and_then(Weak::upgrade) {
                let run = orchestrator.snapshot();
                self.observed.lock().unwrap().push((
                    request.persona,
                    run.current_persona(),
                    run.processed_count(),
                ));
            }
            Ok(valid_result(0))
        }
    }

    #[tokio::test]
    async fn test_current_persona_visible_before_remote_call() {
        let client = Arc::new(ObservingClient {
            orchestrator: OnceLock::new(),
            observed: Mutex::new(Vec::new()),
        });
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = Arc::new(FeedbackOrchestrator::new(client.clone(), document));
        client
            .orchestrator
            .set(Arc::downgrade(&use_case))
            .unwrap_or_else(|_| panic!("orchestrator already set"));

        use_case.run_analysis(&PromptConfig::builtin()).await.unwrap();

        let observed = client.observed.lock().unwrap().clone();
        assert_eq!(observed.len(), 5);
        for (index, (requested, current, processed)) in observed.into_iter().enumerate() {
            assert_eq!(current, Some(requested));
            assert_eq!(processed, index);
        }
    }

    #[tokio::test]
    async fn test_get_result_none_before_run() {
        let client = Arc::new(ScriptedClient::all_succeed(0));
        let document = Arc::new(RecordingDocument::new(TEXT));
        let use_case = orchestrator(client, document);
        assert!(use_case.get_result(PersonaId::Management).is_none());
    }
}
