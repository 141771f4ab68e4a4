//! Plant Growth Simulator
//!
//! Educational simulator: set water, light and temperature for a handful of
//! plants, step them, and watch them grow or die.
//!
//! - `growth/`: Rule table and the growth evaluator (the scoring core)
//! - `plant`: Plant state and the alive/dead transition
//! - `simulation`: A session of plants stepped through the evaluator
//! - `snapshot` / `storage`: Saved sessions in a JSON list file
//! - `config`: Environment-driven settings

pub mod config;
pub mod growth;
pub mod plant;
pub mod simulation;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types
pub use config::SimulatorConfig;
pub use growth::{
    calculate_growth, calculate_growth_code, evaluate_factor, EnvironmentalRange, Factor,
    GrowthAssessment, GrowthEvaluator, GrowthOutcome, GrowthRules, Reading, DEATH_SENTINEL,
};
pub use plant::{apply_outcome, DeathCause, PlantState, Transition};
pub use simulation::{Simulation, SimulationError, StepReport};
pub use snapshot::{SimulationSnapshot, SnapshotError};
pub use storage::{SnapshotStore, StorageError};
