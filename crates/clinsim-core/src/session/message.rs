//! Conversation message types.

use serde::{Deserialize, Serialize};

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// The operator (the "doctor" driving the session).
    Operator,
    /// The simulated patient.
    Patient,
    /// Engine-generated message (closing banners, prompts).
    System,
}

/// A single entry in a session's conversation log.
///
/// Content is immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: SpeakerRole,
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ConversationMessage {
    fn new(role: SpeakerRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn operator(content: impl Into<String>) -> Self {
        Self::new(SpeakerRole::Operator, content)
    }

    pub fn patient(content: impl Into<String>) -> Self {
        Self::new(SpeakerRole::Patient, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(SpeakerRole::System, content)
    }
}
