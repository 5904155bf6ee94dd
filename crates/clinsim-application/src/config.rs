//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_reasoning_timeout_secs() -> u64 {
    20
}

fn default_eviction_interval_secs() -> u64 {
    300
}

/// Tunables for the session engine.
///
/// Deserializable from the same TOML file that carries the scenario
/// catalog, with every field optional. By default sessions are kept for
/// the process lifetime; eviction only runs when `session_ttl_secs` is
/// set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on one reasoning-service call, in seconds.
    #[serde(default = "default_reasoning_timeout_secs")]
    pub reasoning_timeout_secs: u64,
    /// Idle time after which a session may be evicted. `None` disables
    /// eviction entirely.
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,
    /// How often the background sweeper checks for stale sessions.
    #[serde(default = "default_eviction_interval_secs")]
    pub eviction_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reasoning_timeout_secs: default_reasoning_timeout_secs(),
            session_ttl_secs: None,
            eviction_interval_secs: default_eviction_interval_secs(),
        }
    }
}

impl EngineConfig {
    pub fn reasoning_timeout(&self) -> Duration {
        Duration::from_secs(self.reasoning_timeout_secs)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }
}
