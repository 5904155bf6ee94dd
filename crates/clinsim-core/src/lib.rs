pub mod error;
pub mod matching;
pub mod objective;
pub mod progress;
pub mod reasoning;
pub mod scenario;
pub mod scoring;
pub mod session;

// Re-export common error type
pub use error::ClinsimError;
