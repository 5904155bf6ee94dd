//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`SpeakerRole`, `ConversationMessage`)
//! - `model`: Per-session mutable state (`SessionState`)
//! - `store`: In-memory store with per-session locking (`SessionStore`)

mod message;
mod model;
mod store;

// Re-export public API
pub use message::{ConversationMessage, SpeakerRole};
pub use model::SessionState;
pub use store::SessionStore;
