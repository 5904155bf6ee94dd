//! The session service: lifecycle operations and the per-turn evaluator.
//!
//! Every turn runs under the session's own lock, including the escalated
//! reasoning call, so concurrent chats on one session are serialized while
//! unrelated sessions proceed in parallel.

use crate::config::EngineConfig;
use crate::dto::{
    ChatResponse, HintResponse, ProgressResponse, RevealResponse, StartSessionResponse,
    SummaryResponse,
};
use clinsim_core::error::Result;
use clinsim_core::matching::{count_keyword_hits, token_overlap_match};
use clinsim_core::objective;
use clinsim_core::progress::ProgressBoard;
use clinsim_core::reasoning::{OutcomeKind, ReasoningOutcome, ReasoningService, TurnContext};
use clinsim_core::scenario::{ScenarioCatalog, ScenarioFilter};
use clinsim_core::scoring::{self, EXTERNAL_DEFAULT_SCORES, ScoreSet};
use clinsim_core::session::{ConversationMessage, SessionState, SessionStore};
use std::sync::Arc;
use uuid::Uuid;

/// Distinct diagnosis-phrase tokens required before the fast path marks
/// the diagnosis correct.
const DIAGNOSIS_MIN_TOKEN_OVERLAP: usize = 2;

/// Cumulative treatment keyword hits required for a heuristic win.
const TREATMENT_HITS_TO_WIN: u32 = 2;

/// Scripted patient reply when the diagnosis lands but no plan came with it.
const TREATMENT_PLAN_PROMPT: &str =
    "That matches what I've been feeling, Doctor. What's your treatment plan for me?";

const HEURISTIC_WIN_CLOSING: &str = "COMMAND AI: Diagnosis and treatment protocols verified \
correct. Patient outcome projected: OPTIMAL. Mission objectives met. Stand down and access \
Debrief.";

const PLAN_ACCEPTED_CLOSING: &str = "/// COMMAND AI: PROTOCOLS ACCEPTED. CASE CLOSED. ///";

const SESSION_COMPLETE_NOTICE: &str =
    "/// MISSION STATUS: COMPLETE. Access 'End Mission' for debrief. ///";

const HINTS_EXHAUSTED: &str = "INTEL EXHAUSTED.";

const NO_HIDDEN_OBJECTIVES: &str = "No hidden objectives remain.";

/// Orchestrates diagnostic training sessions.
///
/// Owns the scenario catalog, the session store, the progress board, and
/// the reasoning collaborator used for escalated turns.
pub struct SessionService {
    catalog: Arc<dyn ScenarioCatalog>,
    reasoner: Arc<dyn ReasoningService>,
    store: Arc<SessionStore>,
    progress: ProgressBoard,
    config: EngineConfig,
}

impl SessionService {
    pub fn new(
        catalog: Arc<dyn ScenarioCatalog>,
        reasoner: Arc<dyn ReasoningService>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            reasoner,
            store: Arc::new(SessionStore::new()),
            progress: ProgressBoard::new(),
            config,
        }
    }

    /// Wires a service around the Gemini-backed reasoning service
    /// (configured from the environment) and the embedded case catalog.
    pub fn gemini_from_env(config: EngineConfig) -> Result<Self> {
        let reasoner = clinsim_interaction::GeminiReasoner::try_from_env()?;
        Ok(Self::new(
            Arc::new(clinsim_core::scenario::BuiltinCatalog::default()),
            Arc::new(reasoner),
            config,
        ))
    }

    /// Starts the background eviction sweeper when a session TTL is
    /// configured; otherwise does nothing.
    pub fn start_eviction_sweeper(&self) {
        if let Some(ttl) = self.config.session_ttl() {
            self.store
                .start_eviction_sweeper(ttl, self.config.eviction_interval());
        }
    }

    /// Creates a new session for a scenario matching `filter`.
    pub async fn start_session(&self, filter: &ScenarioFilter) -> Result<StartSessionResponse> {
        let scenario = self.catalog.select(filter)?;
        let session_id = Uuid::new_v4().to_string();
        let state = SessionState::new(session_id.clone(), scenario);

        tracing::info!(
            session_id = %session_id,
            case_id = %state.scenario.id,
            specialty = %state.scenario.specialty,
            level = state.scenario.level,
            "session started"
        );

        let response = StartSessionResponse {
            session_id: state.id.clone(),
            case_id: state.scenario.id.clone(),
            specialty: state.scenario.specialty.clone(),
            level: state.scenario.level,
            difficulty: state.scenario.difficulty,
            patient_name: state.scenario.patient_name.clone(),
            age: state.scenario.age,
            gender: state.scenario.gender.clone(),
            chief_complaint: state.scenario.chief_complaint.clone(),
            max_stage: state.scenario.max_stage(),
            objectives: objective::public_view(&state.objectives),
        };
        self.store.insert(state).await;
        Ok(response)
    }

    /// Processes one operator turn.
    ///
    /// The fast heuristic path resolves the turn locally when it can:
    /// a freshly correct diagnosis without a plan gets a scripted prompt,
    /// and a correct diagnosis with enough cumulative treatment keyword
    /// hits wins outright. Everything else escalates to the reasoning
    /// service, with a hard timeout and a non-accepting fallback so the
    /// session never stalls on a dead collaborator.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatResponse> {
        let entry = self.store.get(session_id).await?;
        let mut state = entry.lock().await;
        state.touch();

        let message = message.trim();
        if message.is_empty() {
            return Ok(chat_snapshot(&state, String::new()));
        }

        if state.finished {
            state
                .conversation
                .push(ConversationMessage::operator(message));
            state
                .conversation
                .push(ConversationMessage::system(SESSION_COMPLETE_NOTICE));
            return Ok(chat_snapshot(&state, SESSION_COMPLETE_NOTICE.to_string()));
        }

        state
            .conversation
            .push(ConversationMessage::operator(message));
        state.turns += 1;
        objective::update_from_message(&mut state.objectives, message);

        let was_correct = state.diagnosis_correct;
        if !state.diagnosis_correct {
            let diagnosis_keywords = state.scenario.diagnosis_keywords();
            if token_overlap_match(message, &diagnosis_keywords, DIAGNOSIS_MIN_TOKEN_OVERLAP) {
                state.diagnosis_correct = true;
                objective::mark_achieved(&mut state.objectives, "diagnosis");
            }
        }
        let newly_correct = state.diagnosis_correct && !was_correct;

        // Treatment mentions only count once the diagnosis is on the table.
        let message_hits = if state.diagnosis_correct {
            count_keyword_hits(message, &state.scenario.expected_treatment_keywords) as u32
        } else {
            0
        };
        state.treatment_hit_count += message_hits;

        if newly_correct && message_hits == 0 {
            state
                .conversation
                .push(ConversationMessage::patient(TREATMENT_PLAN_PROMPT));
            return Ok(chat_snapshot(&state, TREATMENT_PLAN_PROMPT.to_string()));
        }

        if state.diagnosis_correct
            && !state.scenario.expected_treatment_keywords.is_empty()
            && state.treatment_hit_count >= TREATMENT_HITS_TO_WIN
        {
            state.treatment_accepted = true;
            state.finished = true;
            state.stage_when_accepted = Some(state.stage);
            state.scores = ScoreSet::heuristic_win(state.turns, state.hints_used);
            state.final_feedback = Some(
                "COMMAND AI: Heuristic verification passed. Diagnosis and protocols match the \
                 case file."
                    .to_string(),
            );
            state
                .conversation
                .push(ConversationMessage::system(HEURISTIC_WIN_CLOSING));
            tracing::info!(
                session_id = %state.id,
                turns = state.turns,
                "session won on heuristic path"
            );
            return Ok(chat_snapshot(&state, HEURISTIC_WIN_CLOSING.to_string()));
        }

        let context = TurnContext {
            scenario: state.scenario.clone(),
            transcript: state.transcript(),
            last_operator_message: message.to_string(),
            stage: state.stage,
            hints_used: state.hints_used,
            turns: state.turns,
        };
        let outcome = match tokio::time::timeout(
            self.config.reasoning_timeout(),
            self.reasoner.evaluate_or_simulate(&context),
        )
        .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                tracing::warn!(
                    session_id = %state.id,
                    error = %err,
                    "reasoning service failed; using fallback"
                );
                ReasoningOutcome::fallback()
            }
            Err(_) => {
                tracing::warn!(session_id = %state.id, "reasoning service timed out; using fallback");
                ReasoningOutcome::fallback()
            }
        };

        let reply = self.apply_outcome(&mut state, outcome);
        Ok(chat_snapshot(&state, reply))
    }

    /// Applies an escalated-turn outcome to the session and returns the
    /// reply text for the operator.
    fn apply_outcome(&self, state: &mut SessionState, outcome: ReasoningOutcome) -> String {
        if outcome.accepted {
            // An accepted plan implies the evaluator judged the diagnosis
            // correct even if the fast path never matched it verbatim.
            state.diagnosis_correct = true;
            state.treatment_accepted = true;
            state.finished = true;
            state.stage_when_accepted = Some(state.stage);
            state.scores = outcome.scores.unwrap_or(EXTERNAL_DEFAULT_SCORES);
            if let Some(feedback) = outcome.feedback.filter(|f| !f.trim().is_empty()) {
                state.final_feedback = Some(feedback);
            }
            objective::mark_achieved(&mut state.objectives, "diagnosis");
            state
                .conversation
                .push(ConversationMessage::patient(&outcome.reply));
            state
                .conversation
                .push(ConversationMessage::system(PLAN_ACCEPTED_CLOSING));
            tracing::info!(session_id = %state.id, "treatment plan accepted by evaluator");
            return format!("{}\n{}", outcome.reply, PLAN_ACCEPTED_CLOSING);
        }

        state
            .conversation
            .push(ConversationMessage::patient(&outcome.reply));

        match outcome.kind {
            OutcomeKind::PatientSimulation => {
                // History-taking turn: the patient opens up a little more.
                state.stage = (state.stage + 1).min(state.scenario.max_stage());
            }
            OutcomeKind::PlanEvaluation => {
                // Rejected plan: keep the latest verdict for the debrief,
                // but the interview stays where it was.
                if let Some(scores) = outcome.scores {
                    state.scores = scores;
                }
                if let Some(feedback) = outcome.feedback.filter(|f| !f.trim().is_empty()) {
                    state.final_feedback = Some(feedback);
                }
            }
        }
        outcome.reply
    }

    /// Hands out the next unused hint, or the exhaustion sentinel once all
    /// hints are spent. Exhausted calls do not raise the hint counter.
    pub async fn hint(&self, session_id: &str) -> Result<HintResponse> {
        let entry = self.store.get(session_id).await?;
        let mut state = entry.lock().await;
        state.touch();

        let total_hints = state.scenario.hints.len();
        let next = state.hints_used as usize;
        if next >= total_hints {
            return Ok(HintResponse {
                hint: HINTS_EXHAUSTED.to_string(),
                hints_used: state.hints_used,
                total_hints,
                exhausted: true,
            });
        }

        let hint = state.scenario.hints[next].clone();
        state.hints_used += 1;
        tracing::debug!(session_id = %state.id, hints_used = state.hints_used, "hint served");
        state
            .conversation
            .push(ConversationMessage::system(format!("INTEL: {hint}")));
        Ok(HintResponse {
            hint,
            hints_used: state.hints_used,
            total_hints,
            exhausted: state.hints_used as usize >= total_hints,
        })
    }

    /// Force-reveals the next hidden objective at the cost of one final
    /// star. A call with nothing left to reveal costs nothing.
    pub async fn reveal_objective(&self, session_id: &str) -> Result<RevealResponse> {
        let entry = self.store.get(session_id).await?;
        let mut state = entry.lock().await;
        state.touch();

        let revealed = objective::reveal_next_hidden(&mut state.objectives);
        let message = match &revealed {
            Some(view) => {
                state.reveals_used += 1;
                tracing::debug!(
                    session_id = %state.id,
                    objective_id = %view.id,
                    reveals_used = state.reveals_used,
                    "objective force-revealed"
                );
                let line = format!("OBJECTIVE REVEALED: {}", view.label);
                state
                    .conversation
                    .push(ConversationMessage::system(&line));
                line
            }
            None => NO_HIDDEN_OBJECTIVES.to_string(),
        };
        Ok(RevealResponse {
            message,
            revealed,
            reveals_used: state.reveals_used,
            objectives: objective::public_view(&state.objectives),
        })
    }

    /// Builds the after-action debrief and records the final stars on the
    /// progress board. Safe to call on unfinished sessions and safe to
    /// call repeatedly; the board only ever ratchets upward.
    pub async fn summary(&self, session_id: &str) -> Result<SummaryResponse> {
        let entry = self.store.get(session_id).await?;
        let mut state = entry.lock().await;
        state.touch();

        let base = scoring::base_stars(
            state.diagnosis_correct,
            state.treatment_accepted,
            state.hints_used,
            state.turns,
        );
        let stars = scoring::final_stars(base, state.reveals_used);
        tracing::info!(
            session_id = %state.id,
            stars,
            turns = state.turns,
            finished = state.finished,
            "debrief generated"
        );
        self.progress
            .record(&state.scenario.specialty, state.scenario.level, stars)
            .await;

        Ok(SummaryResponse {
            session_id: state.id.clone(),
            case_id: state.scenario.id.clone(),
            specialty: state.scenario.specialty.clone(),
            level: state.scenario.level,
            diagnosis: state.scenario.expected_diagnosis.clone(),
            feedback: debrief_text(&state),
            turns: state.turns,
            diagnosis_correct: state.diagnosis_correct,
            treatment_accepted: state.treatment_accepted,
            stage_when_accepted: state.stage_when_accepted,
            hints_used: state.hints_used,
            reveals_used: state.reveals_used,
            scores: state.scores,
            stars,
        })
    }

    /// Drops a session from the store. Returns false for unknown ids.
    pub async fn discard_session(&self, session_id: &str) -> bool {
        self.store.remove(session_id).await
    }

    /// Best recorded stars per `"specialty|level"`.
    pub async fn progress(&self) -> ProgressResponse {
        ProgressResponse {
            best_stars: self.progress.snapshot().await,
        }
    }

    pub async fn reset_progress(&self) {
        self.progress.reset().await;
    }

    /// Specialties available in the catalog.
    pub fn specialties(&self) -> Vec<String> {
        self.catalog.specialties()
    }

    /// Levels available for a specialty.
    pub fn levels(&self, specialty: &str) -> Vec<u32> {
        self.catalog.levels(specialty)
    }
}

fn chat_snapshot(state: &SessionState, reply: String) -> ChatResponse {
    ChatResponse {
        reply,
        finished: state.finished,
        stage: state.stage,
        turns: state.turns,
        diagnosis_correct: state.diagnosis_correct,
        treatment_accepted: state.treatment_accepted,
        treatment_hit_count: state.treatment_hit_count,
        hints_used: state.hints_used,
        objectives: objective::public_view(&state.objectives),
    }
}

fn debrief_text(state: &SessionState) -> String {
    let stage_line = match state.stage_when_accepted {
        Some(stage) => stage.to_string(),
        None => "N/A".to_string(),
    };
    let analysis = match &state.final_feedback {
        Some(feedback) if !feedback.trim().is_empty() => feedback.clone(),
        _ => {
            if state.treatment_accepted {
                "Protocols executed within acceptable parameters.".to_string()
            } else if state.diagnosis_correct {
                "Diagnosis confirmed, but no accepted treatment protocol on record.".to_string()
            } else {
                "Target pathology was not identified. Review the case file and retry.".to_string()
            }
        }
    };

    format!(
        "/// AFTER ACTION REPORT ///\n\
         TARGET DIAGNOSIS: {diagnosis}\n\
         PERFORMANCE METRICS:\n\
         - SENSORY STAGE AT ACCEPTANCE: {stage_line}\n\
         - INTEL REQUESTS: {hints}\n\
         - OBJECTIVES FORCE-REVEALED: {reveals}\n\
         - TRANSMISSION CYCLES: {turns}\n\n\
         TACTICAL ANALYSIS: {analysis}",
        diagnosis = state.scenario.expected_diagnosis.to_uppercase(),
        stage_line = stage_line,
        hints = state.hints_used,
        reveals = state.reveals_used,
        turns = state.turns,
        analysis = analysis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clinsim_core::error::ClinsimError;
    use clinsim_core::scenario::{BuiltinCatalog, Difficulty, ScenarioDefinition};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn scenario() -> ScenarioDefinition {
        ScenarioDefinition {
            id: "neuro_1_tension_headache".into(),
            specialty: "neurology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Rohan Verma".into(),
            age: 25,
            gender: "M".into(),
            chief_complaint: "Headache for two weeks".into(),
            stages: vec![
                "Dull band-like pressure around the head.".into(),
                "Worse in the evening after screen work.".into(),
                "Neck muscles feel tight; no nausea or aura.".into(),
            ],
            hints: vec![
                "Ask what time of day it is worst.".into(),
                "Check for aura and nausea to rule out migraine.".into(),
            ],
            expected_diagnosis: "tension-type headache".into(),
            diagnosis_synonyms: vec!["tension headache".into()],
            expected_treatment_keywords: vec!["paracetamol".into(), "relaxation".into()],
        }
    }

    struct MockReasoner {
        outcomes: Mutex<VecDeque<ReasoningOutcome>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    impl MockReasoner {
        fn new() -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                delay: None,
                fail: false,
            }
        }

        fn with_outcomes(outcomes: Vec<ReasoningOutcome>) -> Self {
            let mut mock = Self::new();
            mock.outcomes = Mutex::new(outcomes.into());
            mock
        }

        fn failing() -> Self {
            let mut mock = Self::new();
            mock.fail = true;
            mock
        }

        fn slow(delay: Duration) -> Self {
            let mut mock = Self::new();
            mock.delay = Some(delay);
            mock
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn default_sim_outcome() -> ReasoningOutcome {
            ReasoningOutcome {
                reply: "It hurts mostly in the evening, doctor.".to_string(),
                accepted: false,
                kind: OutcomeKind::PatientSimulation,
                scores: None,
                feedback: None,
            }
        }
    }

    #[async_trait]
    impl ReasoningService for MockReasoner {
        async fn evaluate_or_simulate(&self, _context: &TurnContext) -> Result<ReasoningOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ClinsimError::collaborator("reasoning service down"));
            }
            let queued = self.outcomes.lock().unwrap().pop_front();
            Ok(queued.unwrap_or_else(Self::default_sim_outcome))
        }
    }

    fn service_with(reasoner: Arc<MockReasoner>) -> SessionService {
        SessionService::new(
            Arc::new(BuiltinCatalog::new(vec![scenario()])),
            reasoner,
            EngineConfig::default(),
        )
    }

    async fn started(service: &SessionService) -> String {
        service
            .start_session(&ScenarioFilter::default())
            .await
            .unwrap()
            .session_id
    }

    #[tokio::test]
    async fn test_start_session_hides_objectives() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let response = service
            .start_session(&ScenarioFilter::default())
            .await
            .unwrap();

        assert_eq!(response.case_id, "neuro_1_tension_headache");
        assert_eq!(response.specialty, "neurology");
        assert_eq!(response.max_stage, 2);
        assert_eq!(response.objectives.len(), 3);
        assert!(response.objectives.iter().all(|o| !o.visible && !o.achieved));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let err = service.chat("missing", "hello").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(service.hint("missing").await.is_err());
        assert!(service.summary("missing").await.is_err());
        assert!(!service.discard_session("missing").await);
    }

    #[tokio::test]
    async fn test_history_question_escalates_and_advances_stage() {
        let mock = Arc::new(MockReasoner::new());
        let service = service_with(mock.clone());
        let id = started(&service).await;

        let response = service
            .chat(&id, "How long has the pain been going on?")
            .await
            .unwrap();
        assert_eq!(response.reply, "It hurts mostly in the evening, doctor.");
        assert_eq!(response.stage, 1);
        assert_eq!(response.turns, 1);
        assert!(!response.finished);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_stage_caps_at_last_stage() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        let mut last_stage = 0;
        for _ in 0..6 {
            last_stage = service
                .chat(&id, "Anything else you have noticed?")
                .await
                .unwrap()
                .stage;
        }
        assert_eq!(last_stage, 2);
    }

    #[tokio::test]
    async fn test_diagnosis_without_plan_prompts_for_treatment() {
        let mock = Arc::new(MockReasoner::new());
        let service = service_with(mock.clone());
        let id = started(&service).await;

        let response = service
            .chat(&id, "I think this is a tension headache")
            .await
            .unwrap();
        assert_eq!(response.reply, TREATMENT_PLAN_PROMPT);
        assert!(response.diagnosis_correct);
        assert!(!response.finished);
        assert_eq!(response.treatment_hit_count, 0);
        // the scripted prompt never touches the reasoning service
        assert_eq!(mock.calls(), 0);

        let diagnosis_objective = &response.objectives[0];
        assert!(diagnosis_objective.achieved && diagnosis_objective.visible);
        assert!(!diagnosis_objective.revealed_by_user);
    }

    #[tokio::test]
    async fn test_heuristic_win_in_two_turns() {
        let mock = Arc::new(MockReasoner::new());
        let service = service_with(mock.clone());
        let id = started(&service).await;

        service
            .chat(&id, "I think this is a tension headache")
            .await
            .unwrap();
        let response = service
            .chat(&id, "Let's start paracetamol and relaxation therapy")
            .await
            .unwrap();

        assert!(response.finished);
        assert!(response.treatment_accepted);
        assert_eq!(response.treatment_hit_count, 2);
        assert_eq!(response.reply, HEURISTIC_WIN_CLOSING);
        assert_eq!(mock.calls(), 0);

        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.scores.accuracy, 100);
        assert_eq!(summary.scores.thoroughness, 90);
        assert_eq!(summary.scores.efficiency, 100);
        assert_eq!(summary.stars, 3);
        assert_eq!(summary.stage_when_accepted, Some(0));
    }

    #[tokio::test]
    async fn test_treatment_hits_accumulate_across_turns() {
        let mock = Arc::new(MockReasoner::new());
        let service = service_with(mock.clone());
        let id = started(&service).await;

        // One keyword alongside the diagnosis: not enough yet, escalates.
        let first = service
            .chat(&id, "This is a tension headache, start paracetamol")
            .await
            .unwrap();
        assert!(!first.finished);
        assert_eq!(first.treatment_hit_count, 1);
        assert_eq!(mock.calls(), 1);

        let second = service
            .chat(&id, "Also add relaxation exercises and stress breaks")
            .await
            .unwrap();
        assert!(second.finished);
        assert_eq!(second.treatment_hit_count, 2);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_accepted_plan_finalizes_session() {
        let accepted = ReasoningOutcome {
            reply: "Thank you, doctor. That makes sense.".to_string(),
            accepted: true,
            kind: OutcomeKind::PlanEvaluation,
            scores: Some(ScoreSet::clamped(88, 77, 66)),
            feedback: Some("Solid plan, well sequenced.".to_string()),
        };
        let mock = Arc::new(MockReasoner::with_outcomes(vec![accepted]));
        let service = service_with(mock.clone());
        let id = started(&service).await;

        let response = service
            .chat(&id, "My plan: rest, hydration and stress management")
            .await
            .unwrap();
        assert!(response.finished);
        assert!(response.treatment_accepted);
        // acceptance implies the diagnosis even without a verbatim match
        assert!(response.diagnosis_correct);
        assert!(response.reply.contains("Thank you, doctor."));
        assert!(response.reply.contains(PLAN_ACCEPTED_CLOSING));

        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.scores, ScoreSet::clamped(88, 77, 66));
        assert_eq!(summary.stars, 3);
        assert!(summary.feedback.contains("Solid plan, well sequenced."));
    }

    #[tokio::test]
    async fn test_rejected_plan_keeps_session_open() {
        let rejected = ReasoningOutcome {
            reply: "I'm not sure that covers it, doctor.".to_string(),
            accepted: false,
            kind: OutcomeKind::PlanEvaluation,
            scores: Some(ScoreSet::clamped(40, 60, 80)),
            feedback: Some("Plan incomplete: no first-line analgesic.".to_string()),
        };
        let service = service_with(Arc::new(MockReasoner::with_outcomes(vec![rejected])));
        let id = started(&service).await;

        let response = service
            .chat(&id, "My plan is bed rest only")
            .await
            .unwrap();
        assert!(!response.finished);
        // a rejected plan is not a history-taking turn
        assert_eq!(response.stage, 0);

        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.scores, ScoreSet::clamped(40, 60, 80));
        assert!(summary.feedback.contains("no first-line analgesic"));
    }

    #[tokio::test]
    async fn test_reasoner_error_falls_back() {
        let mock = Arc::new(MockReasoner::failing());
        let service = service_with(mock.clone());
        let id = started(&service).await;

        let response = service.chat(&id, "What do you make of this?").await.unwrap();
        assert_eq!(response.reply, ReasoningOutcome::fallback().reply);
        assert!(!response.finished);
        assert_eq!(response.stage, 0);
        assert_eq!(response.turns, 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_reasoner_timeout_falls_back() {
        let mock = Arc::new(MockReasoner::slow(Duration::from_secs(60)));
        let service = SessionService::new(
            Arc::new(BuiltinCatalog::new(vec![scenario()])),
            mock,
            EngineConfig {
                reasoning_timeout_secs: 0,
                ..EngineConfig::default()
            },
        );
        let id = started(&service).await;

        let response = service.chat(&id, "Any thoughts?").await.unwrap();
        assert_eq!(response.reply, ReasoningOutcome::fallback().reply);
        assert!(!response.finished);
    }

    #[tokio::test]
    async fn test_chat_after_finish_returns_closing_notice() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        service
            .chat(&id, "Tension headache; paracetamol plus relaxation")
            .await
            .unwrap();
        let after = service.chat(&id, "Can we keep talking?").await.unwrap();
        assert_eq!(after.reply, SESSION_COMPLETE_NOTICE);
        assert!(after.finished);
        // post-completion chatter never counts against the grade
        assert_eq!(after.turns, 1);
    }

    #[tokio::test]
    async fn test_empty_message_is_a_noop() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        let response = service.chat(&id, "   ").await.unwrap();
        assert_eq!(response.reply, "");
        assert_eq!(response.turns, 0);
    }

    #[tokio::test]
    async fn test_hint_sequence_and_exhaustion() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        let first = service.hint(&id).await.unwrap();
        assert_eq!(first.hint, "Ask what time of day it is worst.");
        assert_eq!(first.hints_used, 1);
        assert!(!first.exhausted);

        let second = service.hint(&id).await.unwrap();
        assert_eq!(second.hints_used, 2);
        assert!(second.exhausted);

        // further requests return the sentinel without spending anything
        let third = service.hint(&id).await.unwrap();
        assert_eq!(third.hint, HINTS_EXHAUSTED);
        assert_eq!(third.hints_used, 2);
    }

    #[tokio::test]
    async fn test_hints_lower_the_final_grade() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        service.hint(&id).await.unwrap();
        service
            .chat(&id, "Tension headache; start paracetamol and relaxation")
            .await
            .unwrap();

        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.stars, 2);
        // 100 - 25 for the single hint
        assert_eq!(summary.scores.efficiency, 75);
    }

    #[tokio::test]
    async fn test_reveal_sequence_and_star_cost() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        let first = service.reveal_objective(&id).await.unwrap();
        let revealed = first.revealed.unwrap();
        assert_eq!(revealed.id, "diagnosis");
        assert!(revealed.revealed_by_user);
        assert_eq!(first.reveals_used, 1);

        service.reveal_objective(&id).await.unwrap();
        service.reveal_objective(&id).await.unwrap();
        let spent = service.reveal_objective(&id).await.unwrap();
        assert_eq!(spent.message, NO_HIDDEN_OBJECTIVES);
        assert_eq!(spent.reveals_used, 3);

        service
            .chat(&id, "Tension headache; paracetamol and relaxation")
            .await
            .unwrap();
        let summary = service.summary(&id).await.unwrap();
        // base 3 minus one star per reveal, floored at zero
        assert_eq!(summary.stars, 0);
    }

    #[tokio::test]
    async fn test_summary_without_diagnosis() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        service.chat(&id, "Where does it hurt?").await.unwrap();
        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.stars, 0);
        assert!(!summary.diagnosis_correct);
        assert_eq!(summary.stage_when_accepted, None);
        assert!(summary.feedback.contains("not identified"));
        assert!(summary.feedback.contains("TENSION-TYPE HEADACHE"));
    }

    #[tokio::test]
    async fn test_summary_records_progress() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;

        service
            .chat(&id, "Tension headache; paracetamol and relaxation")
            .await
            .unwrap();
        service.summary(&id).await.unwrap();

        let progress = service.progress().await;
        assert_eq!(progress.best_stars.get("neurology|1"), Some(&3));

        service.reset_progress().await;
        assert!(service.progress().await.best_stars.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_listings() {
        let service = service_with(Arc::new(MockReasoner::new()));
        assert_eq!(service.specialties(), vec!["neurology".to_string()]);
        assert_eq!(service.levels("neurology"), vec![1]);
        assert!(service.levels("cardiology").is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_chats_are_serialized_per_session() {
        let service = Arc::new(service_with(Arc::new(MockReasoner::new())));
        let id = started(&service).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = Arc::clone(&service);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .chat(&id, &format!("Follow-up question number {i}"))
                    .await
                    .unwrap()
                    .turns
            }));
        }

        let mut turn_snapshots: Vec<u32> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|handle| handle.unwrap())
            .collect();
        turn_snapshots.sort_unstable();

        // every turn saw a unique, gap-free counter value
        assert_eq!(turn_snapshots, (1..=16).collect::<Vec<u32>>());
        assert_eq!(service.summary(&id).await.unwrap().turns, 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_treatment_mentions_accrue_exactly_once() {
        let mock = Arc::new(MockReasoner::new());
        let service = Arc::new(service_with(mock.clone()));
        let id = started(&service).await;

        // Land the diagnosis first so treatment mentions start counting.
        let setup = service
            .chat(&id, "I think this is a tension headache")
            .await
            .unwrap();
        assert_eq!(setup.reply, TREATMENT_PLAN_PROMPT);
        assert_eq!(setup.treatment_hit_count, 0);

        // Eight racing chats, each carrying exactly one treatment keyword.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .chat(&id, "Let's give paracetamol right away")
                    .await
                    .unwrap()
            }));
        }
        let responses: Vec<ChatResponse> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|handle| handle.unwrap())
            .collect();

        // Serialized counting: the first mention escalates at one hit, the
        // second wins at exactly two, and the rest hit the finished path.
        let wins: Vec<_> = responses
            .iter()
            .filter(|r| r.reply == HEURISTIC_WIN_CLOSING)
            .collect();
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].treatment_hit_count, 2);

        let open: Vec<_> = responses.iter().filter(|r| !r.finished).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].treatment_hit_count, 1);
        assert_eq!(mock.calls(), 1);

        assert_eq!(
            responses
                .iter()
                .filter(|r| r.reply == SESSION_COMPLETE_NOTICE)
                .count(),
            6
        );

        // A dropped increment would need a third counting turn to win.
        let summary = service.summary(&id).await.unwrap();
        assert_eq!(summary.turns, 3);
        assert!(summary.treatment_accepted);
    }

    #[tokio::test]
    async fn test_discard_session() {
        let service = service_with(Arc::new(MockReasoner::new()));
        let id = started(&service).await;
        assert!(service.discard_session(&id).await);
        assert!(service.chat(&id, "hello").await.unwrap_err().is_not_found());
    }
}
