//! Serializable response payloads for the session operations.
//!
//! These are the shapes a transport layer would serialize as-is. None of
//! them carry the scenario's answer key (expected diagnosis, treatment
//! keywords, or objective keyword lists).

use clinsim_core::objective::ObjectiveView;
use clinsim_core::scenario::Difficulty;
use clinsim_core::scoring::ScoreSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Returned by `start_session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub case_id: String,
    pub specialty: String,
    pub level: u32,
    pub difficulty: Difficulty,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub chief_complaint: String,
    pub max_stage: usize,
    pub objectives: Vec<ObjectiveView>,
}

/// Returned by `chat`: the patient/system reply plus a snapshot of the
/// session's progress flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub finished: bool,
    pub stage: usize,
    pub turns: u32,
    pub diagnosis_correct: bool,
    pub treatment_accepted: bool,
    pub treatment_hit_count: u32,
    pub hints_used: u32,
    pub objectives: Vec<ObjectiveView>,
}

/// Returned by `hint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub hint: String,
    pub hints_used: u32,
    pub total_hints: usize,
    pub exhausted: bool,
}

/// Returned by `reveal_objective`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealResponse {
    pub message: String,
    pub revealed: Option<ObjectiveView>,
    pub reveals_used: u32,
    pub objectives: Vec<ObjectiveView>,
}

/// Returned by `summary`: the after-action debrief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub session_id: String,
    pub case_id: String,
    pub specialty: String,
    pub level: u32,
    pub diagnosis: String,
    pub feedback: String,
    pub turns: u32,
    pub diagnosis_correct: bool,
    pub treatment_accepted: bool,
    pub stage_when_accepted: Option<usize>,
    pub hints_used: u32,
    pub reveals_used: u32,
    pub scores: ScoreSet,
    pub stars: u8,
}

/// Returned by `progress`: best stars per `"specialty|level"` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub best_stars: HashMap<String, u8>,
}
