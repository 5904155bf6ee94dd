//! Hidden objective checklist.
//!
//! Each session carries a hidden checklist built from its scenario: one
//! diagnosis objective plus one objective per expected treatment keyword.
//! Objectives are only ever flipped (achieved/visible), never removed, and
//! their internal keyword lists must never leave the engine.

use crate::matching::phrase_hit;
use crate::scenario::ScenarioDefinition;
use serde::{Deserialize, Serialize};

/// What an objective tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    Diagnosis,
    Treatment,
}

/// One hidden checklist item.
///
/// The keyword list is private: it is the answer key and is stripped from
/// every outward projection (see [`public_view`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub id: String,
    pub label: String,
    pub kind: ObjectiveKind,
    pub visible: bool,
    pub achieved: bool,
    pub revealed_by_user: bool,
    keywords: Vec<String>,
}

/// Client-safe projection of an [`Objective`] without its keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub id: String,
    pub label: String,
    pub kind: ObjectiveKind,
    pub visible: bool,
    pub achieved: bool,
    pub revealed_by_user: bool,
}

impl Objective {
    fn hidden(id: String, label: String, kind: ObjectiveKind, keywords: Vec<String>) -> Self {
        Self {
            id,
            label,
            kind,
            visible: false,
            achieved: false,
            revealed_by_user: false,
            keywords,
        }
    }

    fn to_view(&self) -> ObjectiveView {
        ObjectiveView {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
            visible: self.visible,
            achieved: self.achieved,
            revealed_by_user: self.revealed_by_user,
        }
    }
}

/// Builds the checklist for a scenario: the diagnosis objective first, then
/// one treatment objective per non-empty treatment keyword, all hidden.
pub fn build_objectives(scenario: &ScenarioDefinition) -> Vec<Objective> {
    let mut objectives = vec![Objective::hidden(
        "diagnosis".to_string(),
        format!("Diagnosis: {}", scenario.expected_diagnosis),
        ObjectiveKind::Diagnosis,
        vec![scenario.expected_diagnosis.clone()],
    )];

    for (index, keyword) in scenario
        .expected_treatment_keywords
        .iter()
        .filter(|kw| !kw.trim().is_empty())
        .enumerate()
    {
        objectives.push(Objective::hidden(
            format!("treatment_{}", index + 1),
            format!("Treatment: {}", keyword),
            ObjectiveKind::Treatment,
            vec![keyword.clone()],
        ));
    }

    objectives
}

/// Marks every not-yet-achieved objective whose keywords appear in
/// `message` as achieved and visible. Idempotent: re-running on the same
/// message never un-achieves anything.
pub fn update_from_message(objectives: &mut [Objective], message: &str) {
    for objective in objectives.iter_mut().filter(|o| !o.achieved) {
        if objective
            .keywords
            .iter()
            .any(|kw| phrase_hit(message, kw, 1))
        {
            objective.achieved = true;
            objective.visible = true;
        }
    }
}

/// Marks the objective with `id` achieved and visible, if present. Used
/// when an objective is satisfied through a path its own keywords cannot
/// see, such as a diagnosis matched via a synonym.
pub fn mark_achieved(objectives: &mut [Objective], id: &str) {
    if let Some(objective) = objectives.iter_mut().find(|o| o.id == id) {
        objective.achieved = true;
        objective.visible = true;
    }
}

/// Reveals the first still-hidden objective (diagnosis first, then
/// treatments in declaration order), marking it achieved at the cost of the
/// caller's reveal counter. Returns `None` when everything is visible.
pub fn reveal_next_hidden(objectives: &mut [Objective]) -> Option<ObjectiveView> {
    let objective = objectives.iter_mut().find(|o| !o.visible)?;
    objective.visible = true;
    objective.achieved = true;
    objective.revealed_by_user = true;
    Some(objective.to_view())
}

/// Projects the checklist for the client, omitting the keyword lists.
pub fn public_view(objectives: &[Objective]) -> Vec<ObjectiveView> {
    objectives.iter().map(Objective::to_view).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Difficulty;

    fn scenario() -> ScenarioDefinition {
        ScenarioDefinition {
            id: "neuro_1_tension_headache".into(),
            specialty: "neurology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Rohan Verma".into(),
            age: 25,
            gender: "M".into(),
            chief_complaint: "Headache".into(),
            stages: vec!["Band-like headache.".into()],
            hints: vec![],
            expected_diagnosis: "tension-type headache".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec![
                "paracetamol".into(),
                "".into(),
                "relaxation".into(),
            ],
        }
    }

    #[test]
    fn test_build_skips_empty_keywords() {
        let objectives = build_objectives(&scenario());
        assert_eq!(objectives.len(), 3);
        assert_eq!(objectives[0].id, "diagnosis");
        assert_eq!(objectives[0].kind, ObjectiveKind::Diagnosis);
        assert_eq!(objectives[1].id, "treatment_1");
        assert_eq!(objectives[2].id, "treatment_2");
        assert!(objectives.iter().all(|o| !o.visible && !o.achieved));
    }

    #[test]
    fn test_update_from_message_is_idempotent() {
        let mut objectives = build_objectives(&scenario());
        update_from_message(&mut objectives, "let's try paracetamol first");
        assert!(objectives[1].achieved && objectives[1].visible);
        assert!(!objectives[1].revealed_by_user);
        assert!(!objectives[0].achieved);

        let snapshot = objectives.clone();
        update_from_message(&mut objectives, "let's try paracetamol first");
        assert_eq!(objectives, snapshot);
    }

    #[test]
    fn test_update_matches_typo() {
        let mut objectives = build_objectives(&scenario());
        update_from_message(&mut objectives, "start paracetaml and rest");
        assert!(objectives[1].achieved);
    }

    #[test]
    fn test_mark_achieved_by_id() {
        let mut objectives = build_objectives(&scenario());
        mark_achieved(&mut objectives, "diagnosis");
        assert!(objectives[0].achieved && objectives[0].visible);
        assert!(!objectives[0].revealed_by_user);

        // unknown ids are ignored
        mark_achieved(&mut objectives, "treatment_99");
        assert!(!objectives[1].achieved);
    }

    #[test]
    fn test_reveal_order_and_exhaustion() {
        let mut objectives = build_objectives(&scenario());
        let first = reveal_next_hidden(&mut objectives).unwrap();
        assert_eq!(first.id, "diagnosis");
        assert!(first.revealed_by_user && first.achieved && first.visible);

        let second = reveal_next_hidden(&mut objectives).unwrap();
        assert_eq!(second.id, "treatment_1");
        let third = reveal_next_hidden(&mut objectives).unwrap();
        assert_eq!(third.id, "treatment_2");
        assert!(reveal_next_hidden(&mut objectives).is_none());
    }

    #[test]
    fn test_public_view_has_no_keywords() {
        let objectives = build_objectives(&scenario());
        let views = public_view(&objectives);
        assert_eq!(views.len(), objectives.len());
        // the serialized projection must not carry the keyword answer key
        let json = serde_json::to_string(&views).unwrap();
        assert!(!json.contains("\"keywords\""));
        assert!(json.contains("treatment_1"));
    }
}
