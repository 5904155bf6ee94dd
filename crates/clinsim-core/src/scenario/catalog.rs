//! Scenario catalog trait and selection rules.

use super::model::{Difficulty, ScenarioDefinition};
use crate::error::{ClinsimError, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Optional selection filters for starting a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFilter {
    /// Restrict to a specialty (exact match)
    #[serde(default)]
    pub specialty: Option<String>,
    /// Restrict to a numeric level (exact match, only with specialty)
    #[serde(default)]
    pub level: Option<u32>,
    /// Restrict to a difficulty tier
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// A read-only lookup of scenario definitions.
///
/// Selection precedence, in order:
/// 1. Exact (specialty, level) match when both filters are given and found.
/// 2. (specialty, difficulty) when both given and the filter is non-empty.
/// 3. Specialty alone.
/// 4. Difficulty alone.
/// 5. The full catalog.
///
/// Whenever a filter step yields zero candidates the selection falls back to
/// the full catalog. Among the remaining candidates the choice is uniform
/// random.
pub trait ScenarioCatalog: Send + Sync {
    /// All scenario definitions in this catalog.
    fn scenarios(&self) -> &[ScenarioDefinition];

    /// Picks one scenario according to the selection precedence.
    ///
    /// # Errors
    ///
    /// Returns an error only if the catalog itself is empty.
    fn select(&self, filter: &ScenarioFilter) -> Result<ScenarioDefinition> {
        let all = self.scenarios();
        if all.is_empty() {
            return Err(ClinsimError::config("scenario catalog is empty"));
        }
        let mut rng = rand::thread_rng();

        if let (Some(specialty), Some(level)) = (&filter.specialty, filter.level) {
            let exact: Vec<&ScenarioDefinition> = all
                .iter()
                .filter(|s| &s.specialty == specialty && s.level == level)
                .collect();
            if let Some(chosen) = exact.choose(&mut rng) {
                return Ok((*chosen).clone());
            }
        }

        if let (Some(specialty), Some(difficulty)) = (&filter.specialty, filter.difficulty) {
            let group: Vec<&ScenarioDefinition> = all
                .iter()
                .filter(|s| &s.specialty == specialty && s.difficulty == difficulty)
                .collect();
            if let Some(chosen) = group.choose(&mut rng) {
                return Ok((*chosen).clone());
            }
        }

        if let Some(specialty) = &filter.specialty {
            let group: Vec<&ScenarioDefinition> =
                all.iter().filter(|s| &s.specialty == specialty).collect();
            if let Some(chosen) = group.choose(&mut rng) {
                return Ok((*chosen).clone());
            }
        }

        if let Some(difficulty) = filter.difficulty {
            let group: Vec<&ScenarioDefinition> =
                all.iter().filter(|s| s.difficulty == difficulty).collect();
            if let Some(chosen) = group.choose(&mut rng) {
                return Ok((*chosen).clone());
            }
        }

        // Unfiltered fallback; the catalog is known non-empty here.
        all.choose(&mut rng)
            .cloned()
            .ok_or_else(|| ClinsimError::config("scenario catalog is empty"))
    }

    /// Sorted, de-duplicated list of specialties in this catalog.
    fn specialties(&self) -> Vec<String> {
        let mut specialties: Vec<String> = self
            .scenarios()
            .iter()
            .map(|s| s.specialty.clone())
            .collect();
        specialties.sort();
        specialties.dedup();
        specialties
    }

    /// Sorted, de-duplicated list of levels available for a specialty.
    fn levels(&self, specialty: &str) -> Vec<u32> {
        let mut levels: Vec<u32> = self
            .scenarios()
            .iter()
            .filter(|s| s.specialty == specialty)
            .map(|s| s.level)
            .collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }
}
