//! Environmental ranges and the growth rule table
//!
//! Each factor (water, light, temperature) has an ideal [min, max] interval
//! and two tolerance widths stacked outside it. The default table is the
//! tomato-plant table the simulator ships with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environmental factors evaluated for every plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Water,
    Light,
    Temperature,
}

impl Factor {
    /// Unit the factor is measured in
    pub fn unit(&self) -> &'static str {
        match self {
            Factor::Water => "ml",
            Factor::Light => "h",
            Factor::Temperature => "°C",
        }
    }

    /// Friendly name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Factor::Water => "Water",
            Factor::Light => "Light",
            Factor::Temperature => "Temperature",
        }
    }

    /// All factors, in evaluation order
    pub fn all() -> &'static [Factor] {
        &[Factor::Water, Factor::Light, Factor::Temperature]
    }
}

/// Ideal interval plus tolerance bands for a single factor.
///
/// Bands, from the inside out:
/// - ideal: `[min, max]`
/// - extended: `(min - extended_tolerance, min)` and `(max, max + extended_tolerance]`
/// - near: `[min - extended_tolerance - near_tolerance, min - extended_tolerance]`
///   and `(max + extended_tolerance, max + extended_tolerance + near_tolerance]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalRange {
    /// Lower edge of the ideal interval (inclusive)
    pub min: f64,

    /// Upper edge of the ideal interval (inclusive)
    pub max: f64,

    /// Width of the partial-growth band on each side of the ideal interval
    pub extended_tolerance: f64,

    /// Width of the minimal-growth band beyond the extended band
    pub near_tolerance: f64,
}

impl EnvironmentalRange {
    pub const fn new(min: f64, max: f64, extended_tolerance: f64, near_tolerance: f64) -> Self {
        Self {
            min,
            max,
            extended_tolerance,
            near_tolerance,
        }
    }

    /// Lowest value that still avoids death
    pub fn survival_floor(&self) -> f64 {
        self.min - self.extended_tolerance - self.near_tolerance
    }

    /// Highest value that still avoids death
    pub fn survival_ceiling(&self) -> f64 {
        self.max + self.extended_tolerance + self.near_tolerance
    }

    /// Midpoint of the ideal interval
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn validate(&self, factor: Factor) -> Result<(), RulesError> {
        let values = [self.min, self.max, self.extended_tolerance, self.near_tolerance];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RulesError::NonFinite(factor));
        }
        if self.min > self.max {
            return Err(RulesError::InvertedRange {
                factor,
                min: self.min,
                max: self.max,
            });
        }
        if self.extended_tolerance < 0.0 || self.near_tolerance < 0.0 {
            return Err(RulesError::NegativeTolerance(factor));
        }
        Ok(())
    }
}

/// Problems found when validating a rule table
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("{0:?} range contains a non-finite value")]
    NonFinite(Factor),

    #[error("{factor:?} range is inverted (min {min} > max {max})")]
    InvertedRange { factor: Factor, min: f64, max: f64 },

    #[error("{0:?} range has a negative tolerance")]
    NegativeTolerance(Factor),
}

/// The full rule table: one range per factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRules {
    /// Water per step (ml)
    pub water: EnvironmentalRange,

    /// Direct light exposure (hours)
    pub light: EnvironmentalRange,

    /// Air temperature (°C)
    pub temperature: EnvironmentalRange,
}

impl Default for GrowthRules {
    fn default() -> Self {
        Self {
            water: EnvironmentalRange::new(70.0, 90.0, 50.0, 10.0),
            light: EnvironmentalRange::new(6.0, 10.0, 2.0, 2.0),
            temperature: EnvironmentalRange::new(18.0, 28.0, 2.0, 2.0),
        }
    }
}

impl GrowthRules {
    /// Range for a given factor
    pub fn range(&self, factor: Factor) -> &EnvironmentalRange {
        match factor {
            Factor::Water => &self.water,
            Factor::Light => &self.light,
            Factor::Temperature => &self.temperature,
        }
    }

    /// Check every range is well formed
    pub fn validate(&self) -> Result<(), RulesError> {
        for &factor in Factor::all() {
            self.range(factor).validate(factor)?;
        }
        Ok(())
    }

    /// Multi-line summary of the ideal ranges, e.g. for a help panel
    pub fn describe(&self) -> String {
        Factor::all()
            .iter()
            .map(|&factor| {
                let r = self.range(factor);
                format!(
                    "{}: {}-{} {} (±{} extended, ±{} near)",
                    factor.display_name(),
                    r.min,
                    r.max,
                    factor.unit(),
                    r.extended_tolerance,
                    r.near_tolerance
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
