//! Scenario domain model.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A fixed diagnostic case definition.
///
/// Scenario definitions are immutable and shared; a session takes its own
/// clone at start and never mutates it. The `stages` sequence reveals
/// symptoms progressively as the session's stage index advances, and the
/// expected diagnosis/treatment fields drive the matching heuristics only —
/// they are never exposed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Unique case identifier (e.g. "neuro_1_tension_headache")
    pub id: String,
    /// Medical specialty this case belongs to
    pub specialty: String,
    /// Numeric level within the specialty
    pub level: u32,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Patient display name
    pub patient_name: String,
    /// Patient age in years
    pub age: u32,
    /// Patient gender descriptor
    pub gender: String,
    /// Presenting complaint shown at session start
    pub chief_complaint: String,
    /// Progressively revealing symptom texts, one per stage
    #[serde(default)]
    pub stages: Vec<String>,
    /// Ordered hint texts served on request
    #[serde(default)]
    pub hints: Vec<String>,
    /// The expected diagnosis label
    pub expected_diagnosis: String,
    /// Optional explicit diagnosis synonyms accepted by the heuristic
    #[serde(default)]
    pub diagnosis_synonyms: Vec<String>,
    /// Expected treatment keyword phrases
    #[serde(default)]
    pub expected_treatment_keywords: Vec<String>,
}

impl ScenarioDefinition {
    /// The maximum stage index. Zero when the stage list is empty.
    pub fn max_stage(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// The keyword phrases accepted as a diagnosis mention: the explicit
    /// synonym list when provided, otherwise the expected diagnosis itself.
    pub fn diagnosis_keywords(&self) -> Vec<String> {
        if self.diagnosis_synonyms.is_empty() {
            vec![self.expected_diagnosis.clone()]
        } else {
            self.diagnosis_synonyms.clone()
        }
    }
}
