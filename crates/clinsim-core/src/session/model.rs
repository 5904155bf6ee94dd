//! Per-session mutable state.

use super::message::{ConversationMessage, SpeakerRole};
use crate::objective::{self, Objective};
use crate::scenario::ScenarioDefinition;
use crate::scoring::ScoreSet;
use std::time::Instant;

/// The aggregate root for one diagnostic session.
///
/// Created once at session start and mutated in place on every
/// chat/hint/reveal turn, always under the store's per-session lock.
/// The progress flags (`diagnosis_correct`, `treatment_accepted`,
/// `finished`) and the counters are monotonic: once set/incremented they
/// never go back.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: String,
    /// The scenario chosen at session start (owned clone, never mutated).
    pub scenario: ScenarioDefinition,
    pub conversation: Vec<ConversationMessage>,
    /// Current symptom-reveal index, `0..=scenario.max_stage()`.
    pub stage: usize,
    /// Operator turns taken so far.
    pub turns: u32,
    pub diagnosis_correct: bool,
    pub treatment_accepted: bool,
    pub finished: bool,
    /// Cumulative treatment keyword hits across all turns.
    pub treatment_hit_count: u32,
    pub hints_used: u32,
    pub reveals_used: u32,
    /// Stage index at the moment the treatment plan was accepted.
    pub stage_when_accepted: Option<usize>,
    pub scores: ScoreSet,
    pub objectives: Vec<Objective>,
    /// Evaluator feedback captured for the final debrief.
    pub final_feedback: Option<String>,
    /// Last read-modify-write touch, used by the eviction policy.
    pub last_touched: Instant,
}

impl SessionState {
    /// Creates a fresh session for a scenario, building its hidden
    /// objective checklist.
    pub fn new(id: impl Into<String>, scenario: ScenarioDefinition) -> Self {
        let objectives = objective::build_objectives(&scenario);
        Self {
            id: id.into(),
            scenario,
            conversation: Vec::new(),
            stage: 0,
            turns: 0,
            diagnosis_correct: false,
            treatment_accepted: false,
            finished: false,
            treatment_hit_count: 0,
            hints_used: 0,
            reveals_used: 0,
            stage_when_accepted: None,
            scores: ScoreSet::default(),
            objectives,
            final_feedback: None,
            last_touched: Instant::now(),
        }
    }

    /// Refreshes the eviction timestamp.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// Formats the operator/patient transcript for the reasoning service.
    /// System entries are excluded.
    pub fn transcript(&self) -> String {
        self.conversation
            .iter()
            .filter_map(|m| match m.role {
                SpeakerRole::Operator => Some(format!("DOCTOR (OPERATOR): {}", m.content)),
                SpeakerRole::Patient => Some(format!("PATIENT (SUBJECT): {}", m.content)),
                SpeakerRole::System => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
