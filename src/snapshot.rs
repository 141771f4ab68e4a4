//! Simulation snapshots
//!
//! The on-disk shape keeps the column layout and keys of existing save
//! files (`numero`, `alturas`, `muertas`, `condiciones`) so they load as-is.

use crate::growth::Reading;
use crate::plant::PlantState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot has no plants")]
    NoPlants,

    #[error(
        "snapshot columns disagree: {heights} heights, {dead} dead flags, {conditions} readings"
    )]
    ColumnMismatch {
        heights: usize,
        dead: usize,
        conditions: usize,
    },
}

/// State of every plant in a session at the moment it was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// 1-based position in the save file, assigned on save
    #[serde(rename = "numero", default)]
    pub number: u32,

    /// Height per plant (cm)
    #[serde(rename = "alturas")]
    pub heights: Vec<f64>,

    /// Dead flag per plant
    #[serde(rename = "muertas")]
    pub dead: Vec<bool>,

    /// Last reading per plant. Older saves may omit it.
    #[serde(rename = "condiciones", default)]
    pub conditions: Vec<Reading>,

    /// When the store wrote this record; absent in older saves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SimulationSnapshot {
    pub fn from_plants(number: u32, plants: &[PlantState]) -> Self {
        Self {
            number,
            heights: plants.iter().map(|p| p.height).collect(),
            dead: plants.iter().map(|p| !p.alive).collect(),
            conditions: plants.iter().map(|p| p.last_reading).collect(),
            saved_at: None,
        }
    }

    pub fn plant_count(&self) -> usize {
        self.heights.len()
    }

    /// Rebuild plant records. Missing readings fall back to the default
    /// reading; dead plants are pinned at height 0.
    pub fn plants(&self) -> Result<Vec<PlantState>, SnapshotError> {
        let count = self.heights.len();
        if count == 0 {
            return Err(SnapshotError::NoPlants);
        }
        let conditions_ok = self.conditions.is_empty() || self.conditions.len() == count;
        if self.dead.len() != count || !conditions_ok {
            return Err(SnapshotError::ColumnMismatch {
                heights: count,
                dead: self.dead.len(),
                conditions: self.conditions.len(),
            });
        }

        Ok((0..count)
            .map(|i| {
                let alive = !self.dead[i];
                PlantState {
                    height: if alive { self.heights[i].max(0.0) } else { 0.0 },
                    alive,
                    last_reading: self.conditions.get(i).copied().unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Multi-line report, one line per plant
    pub fn summary(&self) -> Result<String, SnapshotError> {
        let plants = self.plants()?;
        let mut lines = vec![format!("Simulation #{}", self.number)];
        if let Some(at) = self.saved_at {
            lines.push(format!("  saved {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        for (i, plant) in plants.iter().enumerate() {
            let r = plant.last_reading;
            lines.push(format!(
                "  Plant {}: {} | water {} ml, light {} h, temp {} °C",
                i + 1,
                plant.status_text(),
                r.water,
                r.light,
                r.temperature
            ));
        }
        Ok(lines.join("\n"))
    }
}
