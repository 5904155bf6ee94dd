//! Application layer of the Clinsim engine.
//!
//! Exposes the [`SessionService`]: the per-session turn evaluator plus the
//! operations a transport layer would mount (start/chat/hint/reveal/
//! summary/progress). Transport framing itself is out of scope.

pub mod config;
pub mod dto;
pub mod service;
pub mod telemetry;

pub use config::EngineConfig;
pub use service::SessionService;
