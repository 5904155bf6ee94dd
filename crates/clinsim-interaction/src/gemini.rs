//! GeminiReasoner - Direct REST API implementation of the reasoning service.
//!
//! Calls the Gemini `generateContent` REST API directly without any CLI
//! dependency. The API key comes from the environment or explicit
//! construction.

use crate::prompt;
use async_trait::async_trait;
use clinsim_core::error::{ClinsimError, Result};
use clinsim_core::reasoning::{OutcomeKind, ReasoningOutcome, ReasoningService, TurnContext};
use clinsim_core::scoring::ScoreSet;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Reply used when the simulator returns empty text.
const EMPTY_PATIENT_REPLY: &str = "I'm feeling a bit overwhelmed, doctor.";

/// Reasoning service backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiReasoner {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiReasoner {
    /// Creates a new reasoner with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from the environment.
    ///
    /// Reads `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (optional,
    /// defaults to `gemini-2.0-flash`).
    pub fn try_from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ClinsimError::config("GEMINI_API_KEY is not set"))?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, prompt_text: String) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt_text }],
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                ClinsimError::collaborator(format!("Gemini API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ClinsimError::collaborator(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ReasoningService for GeminiReasoner {
    async fn evaluate_or_simulate(&self, context: &TurnContext) -> Result<ReasoningOutcome> {
        if prompt::is_treatment_attempt(&context.last_operator_message, &context.scenario) {
            let raw = self.generate(prompt::evaluator_prompt(context)).await?;
            let cleaned = prompt::strip_code_fences(&raw);

            match serde_json::from_str::<EvaluatorVerdict>(&cleaned) {
                Ok(verdict) => {
                    tracing::info!(
                        case_id = %context.scenario.id,
                        accepted = verdict.accepted,
                        "evaluator verdict parsed"
                    );
                    Ok(verdict.into_outcome())
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        raw_len = raw.len(),
                        "failed to parse evaluator JSON; using fallback"
                    );
                    Ok(ReasoningOutcome::fallback())
                }
            }
        } else {
            let text = self.generate(prompt::patient_prompt(context)).await?;
            let reply = if text.trim().is_empty() {
                tracing::warn!("empty patient reply from Gemini; substituting fallback text");
                EMPTY_PATIENT_REPLY.to_string()
            } else {
                text.trim().to_string()
            };
            Ok(ReasoningOutcome {
                reply,
                accepted: false,
                kind: OutcomeKind::PatientSimulation,
                scores: None,
                feedback: None,
            })
        }
    }
}

/// The strict-JSON verdict shape requested from the evaluator prompt.
#[derive(Debug, Deserialize)]
struct EvaluatorVerdict {
    #[serde(default)]
    accepted: bool,
    #[serde(default)]
    patient_reply: String,
    #[serde(default)]
    short_feedback: String,
    #[serde(default = "default_score")]
    score_accuracy: i64,
    #[serde(default = "default_score")]
    score_thoroughness: i64,
    #[serde(default = "default_score")]
    score_efficiency: i64,
}

fn default_score() -> i64 {
    70
}

impl EvaluatorVerdict {
    fn into_outcome(self) -> ReasoningOutcome {
        let reply = if self.patient_reply.trim().is_empty() {
            EMPTY_PATIENT_REPLY.to_string()
        } else {
            self.patient_reply.trim().to_string()
        };
        ReasoningOutcome {
            reply,
            accepted: self.accepted,
            kind: OutcomeKind::PlanEvaluation,
            scores: Some(ScoreSet::clamped(
                self.score_accuracy,
                self.score_thoroughness,
                self.score_efficiency,
            )),
            feedback: Some(self.short_feedback),
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            ClinsimError::collaborator("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String) -> ClinsimError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    ClinsimError::collaborator(format!("Gemini API error (HTTP {}): {}", status, message))
}
