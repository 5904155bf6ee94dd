//! Per-session scoring and final star grading.

use serde::{Deserialize, Serialize};

/// The three per-session performance scores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSet {
    pub accuracy: u8,
    pub thoroughness: u8,
    pub efficiency: u8,
}

/// Scores adopted when the external evaluator accepts a plan without
/// reporting its own numbers.
pub const EXTERNAL_DEFAULT_SCORES: ScoreSet = ScoreSet {
    accuracy: 70,
    thoroughness: 70,
    efficiency: 70,
};

impl ScoreSet {
    /// Builds a score set from unclamped values, clamping each to 0..=100.
    pub fn clamped(accuracy: i64, thoroughness: i64, efficiency: i64) -> Self {
        Self {
            accuracy: accuracy.clamp(0, 100) as u8,
            thoroughness: thoroughness.clamp(0, 100) as u8,
            efficiency: efficiency.clamp(0, 100) as u8,
        }
    }

    /// Scores for a session solved on the fast heuristic path.
    ///
    /// Accuracy is full; thoroughness drops when the operator flailed for
    /// more than ten turns; efficiency is penalized 25 per hint and 10 per
    /// turn beyond six.
    pub fn heuristic_win(turns: u32, hints_used: u32) -> Self {
        let thoroughness = if turns > 10 { 70 } else { 90 };
        let hint_penalty = 25 * i64::from(hints_used);
        let turn_penalty = 10 * i64::from(turns.saturating_sub(6));
        Self::clamped(100, thoroughness, 100 - hint_penalty - turn_penalty)
    }
}

/// Final star grade before reveal deductions.
///
/// 0 if the diagnosis was never correct, 1 if the diagnosis was correct but
/// no treatment plan was accepted, otherwise 3 minus penalties for hint use
/// and for taking more than twelve turns, floored at 1.
pub fn base_stars(
    diagnosis_correct: bool,
    treatment_accepted: bool,
    hints_used: u32,
    turns: u32,
) -> u8 {
    if !diagnosis_correct {
        return 0;
    }
    if !treatment_accepted {
        return 1;
    }
    let mut stars: u8 = 3;
    if hints_used > 0 {
        stars -= 1;
    }
    if turns > 12 {
        stars -= 1;
    }
    stars.max(1)
}

/// Deducts one star per reveal spent, never going below zero.
pub fn final_stars(base: u8, reveals_used: u32) -> u8 {
    base.saturating_sub(reveals_used.min(u32::from(u8::MAX)) as u8)
}
