//! Simulation session
//!
//! Owns a fixed set of plants and steps them through the growth evaluator.

use crate::growth::{GrowthAssessment, GrowthEvaluator, Reading};
use crate::plant::{apply_outcome, DeathCause, PlantState, Transition, DEFAULT_INITIAL_HEIGHT};
use crate::snapshot::{SimulationSnapshot, SnapshotError};
use thiserror::Error;

/// Number of plants in a default session
pub const DEFAULT_PLANT_COUNT: usize = 4;

/// Largest session the simulator supports
pub const MAX_PLANT_COUNT: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("plant {index} does not exist (session has {count} plants)")]
    PlantIndexOutOfRange { index: usize, count: usize },

    #[error("expected {expected} readings, got {found}")]
    ReadingCountMismatch { expected: usize, found: usize },
}

/// Outcome of stepping one plant
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 0-based plant index
    pub index: usize,

    /// Reading supplied for this step
    pub reading: Reading,

    /// `None` when the plant was already dead and nothing was evaluated
    pub assessment: Option<GrowthAssessment>,

    /// What the step did to the plant
    pub transition: Transition,

    /// Plant state after the step
    pub plant: PlantState,
}

impl StepReport {
    /// User-facing message for this step
    pub fn message(&self) -> String {
        let n = self.index + 1;
        match self.transition {
            Transition::Grew { delta, height } => {
                format!("Plant {}: change +{} cm -> height {:.1} cm", n, delta, height)
            }
            Transition::Died(DeathCause::ExtremeConditions) => {
                let why = self
                    .assessment
                    .and_then(|a| a.limiting_factor())
                    .map(|f| format!(" ({} out of tolerance)", f.display_name().to_lowercase()))
                    .unwrap_or_default();
                format!("Plant {} died from extreme conditions{}", n, why)
            }
            Transition::Died(DeathCause::HeightExhausted) => {
                format!("Plant {} could not withstand the conditions and died", n)
            }
            Transition::AlreadyDead => format!("Plant {} is already dead", n),
        }
    }
}

/// A running session of plants
#[derive(Debug, Clone)]
pub struct Simulation {
    number: u32,
    initial_height: f64,
    plants: Vec<PlantState>,
    evaluator: GrowthEvaluator,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(DEFAULT_PLANT_COUNT, DEFAULT_INITIAL_HEIGHT)
    }
}

impl Simulation {
    pub fn new(plant_count: usize, initial_height: f64) -> Self {
        Self::with_evaluator(plant_count, initial_height, GrowthEvaluator::default())
    }

    pub fn with_evaluator(
        plant_count: usize,
        initial_height: f64,
        evaluator: GrowthEvaluator,
    ) -> Self {
        Self {
            number: 1,
            initial_height,
            plants: vec![PlantState::new(initial_height); plant_count],
            evaluator,
        }
    }

    /// Resume a saved session
    pub fn from_snapshot(
        snapshot: &SimulationSnapshot,
        initial_height: f64,
        evaluator: GrowthEvaluator,
    ) -> Result<Self, SnapshotError> {
        Ok(Self {
            number: snapshot.number,
            initial_height,
            plants: snapshot.plants()?,
            evaluator,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn plants(&self) -> &[PlantState] {
        &self.plants
    }

    pub fn plant(&self, index: usize) -> Option<&PlantState> {
        self.plants.get(index)
    }

    pub fn evaluator(&self) -> &GrowthEvaluator {
        &self.evaluator
    }

    pub fn alive_count(&self) -> usize {
        self.plants.iter().filter(|p| p.alive).count()
    }

    /// Height of the tallest plant (0 if all are dead)
    pub fn tallest(&self) -> f64 {
        self.plants.iter().map(|p| p.height).fold(0.0, f64::max)
    }

    /// Evaluate `reading` for one plant and apply the result
    pub fn simulate_one(
        &mut self,
        index: usize,
        reading: Reading,
    ) -> Result<StepReport, SimulationError> {
        let count = self.plants.len();
        let plant = self
            .plants
            .get_mut(index)
            .ok_or(SimulationError::PlantIndexOutOfRange { index, count })?;

        if plant.is_dead() {
            tracing::debug!("Plant {} is dead, step ignored", index + 1);
            return Ok(StepReport {
                index,
                reading,
                assessment: None,
                transition: Transition::AlreadyDead,
                plant: *plant,
            });
        }

        let assessment = self.evaluator.assess(&reading);
        let (next, transition) = apply_outcome(*plant, assessment.overall, reading);
        *plant = next;

        if let Transition::Died(cause) = transition {
            tracing::info!("Plant {} died ({:?}) with reading {:?}", index + 1, cause, reading);
        } else {
            tracing::debug!(
                "Plant {}: {:?} -> {:.1} cm",
                index + 1,
                assessment.overall,
                next.height
            );
        }

        Ok(StepReport {
            index,
            reading,
            assessment: Some(assessment),
            transition,
            plant: next,
        })
    }

    /// Step every plant in order, one reading per plant
    pub fn simulate_all(
        &mut self,
        readings: &[Reading],
    ) -> Result<Vec<StepReport>, SimulationError> {
        if readings.len() != self.plants.len() {
            return Err(SimulationError::ReadingCountMismatch {
                expected: self.plants.len(),
                found: readings.len(),
            });
        }
        readings
            .iter()
            .enumerate()
            .map(|(i, &reading)| self.simulate_one(i, reading))
            .collect()
    }

    /// Restore every plant to its starting state. Saved snapshots are untouched.
    pub fn reset(&mut self) {
        let count = self.plants.len();
        self.plants = vec![PlantState::new(self.initial_height); count];
        tracing::info!("Session reset ({} plants at {:.1} cm)", count, self.initial_height);
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot::from_plants(self.number, &self.plants)
    }

    /// Record the number the store assigned on save
    pub fn set_number(&mut self, number: u32) {
        self.number = number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{Factor, GrowthOutcome};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_session() {
        let sim = Simulation::default();
        assert_eq!(sim.plants().len(), 4);
        assert_eq!(sim.alive_count(), 4);
        assert_relative_eq!(sim.tallest(), 3.0);
        assert!(sim.plants().iter().all(|p| p.last_reading == Reading::default()));
    }

    #[test]
    fn test_simulate_one_grows() {
        let mut sim = Simulation::default();
        let report = sim.simulate_one(0, Reading::new(30.0, 8.0, 22.0)).unwrap();
        assert_eq!(report.transition, Transition::Grew { delta: 3, height: 6.0 });
        assert_eq!(report.assessment.unwrap().limiting_factor(), Some(Factor::Water));
        assert_relative_eq!(sim.plant(0).unwrap().height, 6.0);
        assert_relative_eq!(sim.plant(1).unwrap().height, 3.0);
        assert_eq!(report.message(), "Plant 1: change +3 cm -> height 6.0 cm");
    }

    #[test]
    fn test_dead_plant_rejects_steps() {
        let mut sim = Simulation::default();
        let report = sim.simulate_one(2, Reading::new(0.0, 8.0, 22.0)).unwrap();
        assert_eq!(report.transition, Transition::Died(DeathCause::ExtremeConditions));
        assert_eq!(report.assessment.unwrap().overall, GrowthOutcome::Death);
        assert!(report.message().contains("water out of tolerance"));

        let report = sim.simulate_one(2, Reading::default()).unwrap();
        assert_eq!(report.transition, Transition::AlreadyDead);
        assert_eq!(report.assessment, None);
        let plant = sim.plant(2).unwrap();
        assert_eq!(plant.height, 0.0);
        assert_eq!(plant.last_reading, Reading::new(0.0, 8.0, 22.0));
        assert_eq!(sim.alive_count(), 3);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut sim = Simulation::default();
        assert_eq!(
            sim.simulate_one(4, Reading::default()),
            Err(SimulationError::PlantIndexOutOfRange { index: 4, count: 4 })
        );
    }

    #[test]
    fn test_simulate_all() {
        let mut sim = Simulation::default();
        let readings = [
            Reading::default(),
            Reading::new(20.0, 8.0, 22.0),
            Reading::new(80.0, 11.0, 22.0),
            Reading::new(80.0, 8.0, 50.0),
        ];
        let reports = sim.simulate_all(&readings).unwrap();
        let heights: Vec<f64> = reports.iter().map(|r| r.plant.height).collect();
        assert_eq!(heights, vec![9.0, 4.0, 6.0, 0.0]);
        assert_eq!(sim.alive_count(), 3);

        assert_eq!(
            sim.simulate_all(&readings[..2]),
            Err(SimulationError::ReadingCountMismatch { expected: 4, found: 2 })
        );
    }

    #[test]
    fn test_reset_revives() {
        let mut sim = Simulation::default();
        sim.simulate_one(0, Reading::new(0.0, 0.0, 0.0)).unwrap();
        sim.simulate_one(1, Reading::default()).unwrap();
        sim.reset();
        assert_eq!(sim.alive_count(), 4);
        assert!(sim.plants().iter().all(|p| p.height == 3.0));
    }

    #[test]
    fn test_snapshot_resume() {
        let mut sim = Simulation::default();
        sim.simulate_one(0, Reading::default()).unwrap();
        sim.simulate_one(3, Reading::new(1000.0, 8.0, 22.0)).unwrap();
        sim.set_number(5);

        let snap = sim.snapshot();
        assert_eq!(snap.number, 5);
        let resumed = Simulation::from_snapshot(&snap, 3.0, GrowthEvaluator::default()).unwrap();
        assert_eq!(resumed.plants(), sim.plants());
        assert_eq!(resumed.number(), 5);
    }
}
