//! Simulator configuration
//!
//! Settings come from environment variables with sensible defaults:
//! - `PLANT_SIM_DATA`: snapshot file (default `data/guardado.json`)
//! - `PLANT_SIM_PLANTS`: number of plants per session (1-4, default 4)
//! - `PLANT_SIM_INITIAL_HEIGHT`: starting height in cm (default 3.0)
//! - `PLANT_SIM_RULES`: optional JSON rule table replacing the default one

use crate::growth::GrowthRules;
use crate::plant::DEFAULT_INITIAL_HEIGHT;
use crate::simulation::{DEFAULT_PLANT_COUNT, MAX_PLANT_COUNT};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "data/guardado.json";

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// JSON file holding the saved snapshot list
    pub data_file: PathBuf,

    /// Plants per session (1-4)
    pub plant_count: usize,

    /// Height of a fresh or reset plant (cm)
    pub initial_height: f64,

    /// Rule table the evaluator uses
    pub rules: GrowthRules,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            plant_count: DEFAULT_PLANT_COUNT,
            initial_height: DEFAULT_INITIAL_HEIGHT,
            rules: GrowthRules::default(),
        }
    }
}

impl SimulatorConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the real env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("PLANT_SIM_DATA") {
            config.data_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup("PLANT_SIM_PLANTS") {
            let count: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("PLANT_SIM_PLANTS is not a count: {:?}", raw))?;
            if count == 0 || count > MAX_PLANT_COUNT {
                anyhow::bail!(
                    "PLANT_SIM_PLANTS must be between 1 and {}, got {}",
                    MAX_PLANT_COUNT,
                    count
                );
            }
            config.plant_count = count;
        }

        if let Some(raw) = lookup("PLANT_SIM_INITIAL_HEIGHT") {
            let height: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("PLANT_SIM_INITIAL_HEIGHT is not a number: {:?}", raw))?;
            if !height.is_finite() || height < 0.0 {
                anyhow::bail!(
                    "PLANT_SIM_INITIAL_HEIGHT must be a non-negative number, got {}",
                    height
                );
            }
            config.initial_height = height;
        }

        if let Some(path) = lookup("PLANT_SIM_RULES") {
            config.rules = load_rules(Path::new(&path))?;
        }

        Ok(config)
    }
}

/// Load and validate a rule table from JSON
pub fn load_rules(path: &Path) -> Result<GrowthRules> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {:?}", path))?;

    let rules: GrowthRules = serde_json::from_str(&contents)
        .with_context(|| "Failed to parse rules JSON")?;

    rules
        .validate()
        .with_context(|| format!("Invalid rules in {:?}", path))?;

    Ok(rules)
}
