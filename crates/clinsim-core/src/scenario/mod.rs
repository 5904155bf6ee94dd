//! Scenario domain module.
//!
//! A scenario is one fixed diagnostic case: the simulated patient, the
//! progressively revealed symptom stages, the hints, and the expected
//! diagnosis and treatment keywords used by the evaluation heuristics.
//!
//! # Module Structure
//!
//! - `model`: Core scenario definition (`ScenarioDefinition`, `Difficulty`)
//! - `catalog`: Catalog trait and selection/filtering rules (`ScenarioCatalog`)
//! - `builtin`: The embedded default case catalog (`BuiltinCatalog`)

mod builtin;
mod catalog;
mod model;

// Re-export public API
pub use builtin::BuiltinCatalog;
pub use catalog::{ScenarioCatalog, ScenarioFilter};
pub use model::{Difficulty, ScenarioDefinition};
