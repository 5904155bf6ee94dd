//! Prompt construction and response cleanup for the reasoning service.

use clinsim_core::reasoning::TurnContext;
use clinsim_core::scenario::ScenarioDefinition;

/// Phrases that mark an operator message as a diagnosis/treatment attempt
/// rather than an ordinary history-taking question.
const TREATMENT_ATTEMPT_MARKERS: [&str; 11] = [
    "diagnosis",
    "diagnose",
    "impression",
    "i suspect",
    "treatment",
    "plan",
    "prescribe",
    "recommend",
    "start you on",
    "we will give",
    "we will start",
];

/// Decides whether the operator message should go to the plan evaluator
/// instead of the patient simulator.
pub fn is_treatment_attempt(message: &str, scenario: &ScenarioDefinition) -> bool {
    let lowered = message.to_lowercase();
    if TREATMENT_ATTEMPT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return true;
    }
    scenario
        .expected_treatment_keywords
        .iter()
        .filter(|kw| !kw.is_empty())
        .any(|kw| lowered.contains(&kw.to_lowercase()))
}

/// Strips a surrounding markdown code fence (with optional `json` tag) from
/// a model response.
pub fn strip_code_fences(text: &str) -> String {
    let mut s = text.trim();
    if s.starts_with("```") {
        s = s.trim_start_matches('`');
        if s.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            s = &s[4..];
        }
        if let Some(stripped) = s.strip_suffix("```") {
            s = stripped;
        }
    }
    s.trim().to_string()
}

/// Builds the plan-evaluator prompt: case file, acceptance rules, scoring
/// algorithm, and the strict JSON output contract.
pub fn evaluator_prompt(context: &TurnContext) -> String {
    let case = &context.scenario;
    format!(
        r#"IDENTITY: Medical Oversight Command AI (MCO-AI).
MISSION: Evaluate Field Operator's diagnostic and treatment protocol accuracy.

CASE FILE:
- True Pathology: {diagnosis}
- Required Protocols (Keywords): {protocols}
- Hints Used: {hints}
- Turns Taken: {turns}

ACCEPTANCE RULES:
- accepted = true ONLY IF:
  * The operator's diagnosis clearly matches the true pathology (or a close synonym), AND
  * They propose at least 2 appropriate treatment / management steps that match the required protocols.
- If diagnosis or treatment is incomplete or unsafe, set accepted = false.

SCORING ALGORITHM (0-100):
1. ACCURACY:
   - 0  = Dangerous / wrong plan.
   - 50 = Partially correct but missing key steps.
   - 100 = Diagnosis + plan fully in line with standard of care.
2. THOROUGHNESS:
   - High if they asked relevant questions and ruled out key differentials.
   - Lower if they jumped to a guess or asked many irrelevant questions.
3. EFFICIENCY:
   - Start at 100.
   - Deduct 25 points for each hint.
   - Deduct 10 points for each TURN over 6.

TASK:
1. Analyze the Operator's latest transmission and the whole transcript.
2. Decide if the plan is acceptable based on the rules above.
3. Generate a NATURAL patient response.
4. Output honest tactical feedback and scores.

OUTPUT FORMAT (Strict JSON):
{{
  "accepted": true/false,
  "patient_reply": "Natural patient response...",
  "short_feedback": "Tactical/Technical analysis...",
  "score_accuracy": 0-100,
  "score_thoroughness": 0-100,
  "score_efficiency": 0-100
}}

TRANSCRIPT LOG:
{transcript}

OUTPUT JSON:"#,
        diagnosis = case.expected_diagnosis,
        protocols = case.expected_treatment_keywords.join(", "),
        hints = context.hints_used,
        turns = context.turns,
        transcript = context.transcript,
    )
}

/// Builds the in-character patient-simulation prompt, revealing only the
/// symptom stages up to the session's current stage.
pub fn patient_prompt(context: &TurnContext) -> String {
    let case = &context.scenario;
    let stage = context.stage.min(case.max_stage());
    let visible: Vec<String> = case
        .stages
        .iter()
        .take(stage + 1)
        .map(|s| format!("- {}", s))
        .collect();
    let symptom_data = if visible.is_empty() {
        "N/A".to_string()
    } else {
        visible.join("\n")
    };

    format!(
        r#"SIMULATION MODE: ACTIVE.
ROLE: {name}, {age}y/{gender}.
COMPLAINT: {complaint}

CURRENT SYMPTOM DATA (Reveal ONLY this to the Doctor):
{symptom_data}

DIRECTIVES:
- You are a human patient. Do NOT mention you are an AI or simulation.
- Answer the DOCTOR's specific question directly first, then add 1-2 relevant details.
- If asked about symptoms NOT in your Current Data, say you haven't noticed that.
- Keep responses concise (1-3 sentences).
- Avoid repeating the exact same line more than once.
- If the doctor has already clearly explained the plan and you seem to understand it, acknowledge once and stop asking for clarification about the same plan.

TRANSCRIPT LOG:
{transcript}

PATIENT RESPONSE:"#,
        name = case.patient_name,
        age = case.age,
        gender = case.gender,
        complaint = case.chief_complaint,
        symptom_data = symptom_data,
        transcript = context.transcript,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinsim_core::scenario::Difficulty;

    fn scenario() -> ScenarioDefinition {
        ScenarioDefinition {
            id: "case".into(),
            specialty: "neurology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Rohan Verma".into(),
            age: 25,
            gender: "M".into(),
            chief_complaint: "Headache".into(),
            stages: vec!["Stage 0".into(), "Stage 1".into(), "Stage 2".into()],
            hints: vec![],
            expected_diagnosis: "tension-type headache".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec!["paracetamol".into(), "relaxation".into()],
        }
    }

    fn context(message: &str, stage: usize) -> TurnContext {
        TurnContext {
            scenario: scenario(),
            transcript: format!("DOCTOR (OPERATOR): {}", message),
            last_operator_message: message.to_string(),
            stage,
            hints_used: 1,
            turns: 3,
        }
    }

    #[test]
    fn test_is_treatment_attempt_markers_and_keywords() {
        let case = scenario();
        assert!(is_treatment_attempt("My diagnosis is clear", &case));
        assert!(is_treatment_attempt("I suspect something chronic", &case));
        assert!(is_treatment_attempt("Take paracetamol twice a day", &case));
        assert!(!is_treatment_attempt("How long has this been going on?", &case));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```JSON {\"a\":1} ```  "), "{\"a\":1}");
    }

    #[test]
    fn test_patient_prompt_reveals_only_visible_stages() {
        let prompt = patient_prompt(&context("Tell me more", 1));
        assert!(prompt.contains("Stage 0"));
        assert!(prompt.contains("Stage 1"));
        assert!(!prompt.contains("Stage 2"));
        // stage index is clamped to the last stage
        let prompt = patient_prompt(&context("Tell me more", 99));
        assert!(prompt.contains("Stage 2"));
    }

    #[test]
    fn test_evaluator_prompt_carries_case_file() {
        let prompt = evaluator_prompt(&context("I prescribe paracetamol", 0));
        assert!(prompt.contains("tension-type headache"));
        assert!(prompt.contains("paracetamol, relaxation"));
        assert!(prompt.contains("Hints Used: 1"));
        assert!(prompt.contains("Turns Taken: 3"));
    }
}
