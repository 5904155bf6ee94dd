//! External collaborator implementations for the Clinsim engine.
//!
//! The only collaborator today is the Gemini-backed reasoning service that
//! simulates the patient and judges free-form treatment plans when the
//! heuristic path cannot decide a turn.

mod gemini;
mod prompt;

pub use gemini::GeminiReasoner;
pub use prompt::{is_treatment_attempt, strip_code_fences};
