//! In-memory session store with per-session locking.

use super::model::SessionState;
use crate::error::{ClinsimError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Owns every live session, keyed by session id.
///
/// Each session sits behind its own `tokio::sync::Mutex`; a caller locks
/// that mutex for the full duration of a turn (including the reasoning
/// service call), which serializes mutations per session while leaving
/// unrelated sessions fully parallel. The outer map lock is only held for
/// the brief lookup/insert, never across a turn.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly created session and returns its handle.
    pub async fn insert(&self, state: SessionState) -> Arc<Mutex<SessionState>> {
        let id = state.id.clone();
        let entry = Arc::new(Mutex::new(state));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, entry.clone());
        entry
    }

    /// Looks up a session handle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown session ids.
    pub async fn get(&self, session_id: &str) -> Result<Arc<Mutex<SessionState>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| ClinsimError::not_found("session", session_id))
    }

    /// Removes a session. Returns true if it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle longer than `ttl`. Sessions currently locked by
    /// an in-flight turn are always kept. Returns the number evicted.
    pub async fn evict_stale(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(state) => state.last_touched.elapsed() < ttl,
            // locked means a turn is in flight right now
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "evicted stale sessions");
        }
        evicted
    }

    /// Spawns a background sweeper that evicts stale sessions at a fixed
    /// interval. Without a sweeper (or explicit `evict_stale` calls) the
    /// store keeps sessions for the process lifetime.
    pub fn start_eviction_sweeper(self: &Arc<Self>, ttl: Duration, interval: Duration) {
        let store = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            tracing::info!(ttl_secs = ttl.as_secs(), "session eviction sweeper started");

            loop {
                ticker.tick().await;
                store.evict_stale(ttl).await;
            }
        });
    }
}
