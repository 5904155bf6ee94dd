//! External reasoning service contract.
//!
//! When the heuristic path cannot resolve a turn, the evaluator escalates
//! to a natural-language-capable collaborator: it either simulates the
//! patient's next reply or judges the operator's free-form treatment plan.
//! This module defines that boundary; implementations live outside the
//! core (see the interaction crate).

use crate::error::Result;
use crate::scenario::ScenarioDefinition;
use crate::scoring::ScoreSet;
use async_trait::async_trait;

/// Everything the reasoning service needs about the current turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub scenario: ScenarioDefinition,
    /// Formatted operator/patient transcript up to and including the
    /// current operator message.
    pub transcript: String,
    /// The operator message that triggered this escalation.
    pub last_operator_message: String,
    /// Current symptom-reveal stage index.
    pub stage: usize,
    pub hints_used: u32,
    /// Operator turns taken so far, including this one.
    pub turns: u32,
}

/// Which branch of the collaborator produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Ordinary in-character patient reply; the session's stage advances.
    PatientSimulation,
    /// The operator's plan was judged (accepted or rejected).
    PlanEvaluation,
}

/// The collaborator's verdict for one escalated turn.
#[derive(Debug, Clone)]
pub struct ReasoningOutcome {
    /// Patient-authored reply text to append to the conversation.
    pub reply: String,
    /// Whether the treatment plan was accepted (finalizes the session).
    pub accepted: bool,
    pub kind: OutcomeKind,
    /// Scores reported by the evaluator, if any.
    pub scores: Option<ScoreSet>,
    /// Free-form evaluator feedback for the final debrief.
    pub feedback: Option<String>,
}

impl ReasoningOutcome {
    /// The fixed non-accepting substitute used when the collaborator is
    /// unreachable, times out, or returns unusable output. The session
    /// keeps moving instead of stalling.
    pub fn fallback() -> Self {
        Self {
            reply: "I'm not sure I understand that plan, Doctor. Can you explain it briefly?"
                .to_string(),
            accepted: false,
            kind: OutcomeKind::PlanEvaluation,
            scores: Some(ScoreSet::clamped(0, 0, 0)),
            feedback: Some("PROTOCOL ERROR: Plan unclear or unparsed.".to_string()),
        }
    }
}

/// The external reasoning collaborator.
///
/// Called at most once per escalated turn, always while the per-session
/// lock is held. Implementations must be safe to retry with the same
/// context; the engine checks the session is still unfinished before
/// applying any outcome.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn evaluate_or_simulate(&self, context: &TurnContext) -> Result<ReasoningOutcome>;
}
