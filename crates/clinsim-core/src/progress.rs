//! Global best-stars progress ratchet.

use std::collections::HashMap;
use tokio::sync::RwLock;

fn progress_key(specialty: &str, level: u32) -> String {
    format!("{}|{}", specialty, level)
}

/// Best star rating achieved per (specialty, level), across all sessions.
///
/// The board is a monotonic ratchet: `record` only ever raises a stored
/// value. Sessions in different specialties/levels can finish concurrently,
/// so the map lives behind an async lock.
#[derive(Debug, Default)]
pub struct ProgressBoard {
    best: RwLock<HashMap<String, u8>>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished session's stars. Returns true if this raised the
    /// stored best for the key.
    pub async fn record(&self, specialty: &str, level: u32, stars: u8) -> bool {
        let key = progress_key(specialty, level);
        let mut best = self.best.write().await;
        let current = best.get(&key).copied().unwrap_or(0);
        if stars > current {
            best.insert(key, stars);
            true
        } else {
            false
        }
    }

    /// A copy of the current `"specialty|level" -> stars` map.
    pub async fn snapshot(&self) -> HashMap<String, u8> {
        self.best.read().await.clone()
    }

    /// Wipes all recorded progress.
    pub async fn reset(&self) {
        self.best.write().await.clear();
    }
}
