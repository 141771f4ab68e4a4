//! Growth Evaluator
//!
//! Classifies each environmental reading into one of four bands and combines
//! the three factors with the law of the minimum: the worst factor decides
//! the growth, and any lethal factor kills the plant outright.

use super::ranges::{EnvironmentalRange, Factor, GrowthRules};
use serde::{Deserialize, Serialize};

/// Integer code reported for a lethal outcome. No valid delta is ever <= -2,
/// so this cannot be mistaken for growth.
pub const DEATH_SENTINEL: i32 = -999;

/// Result of evaluating one factor, or the combined result of all three.
///
/// Variants are ordered from worst to best, so `min` picks the limiting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthOutcome {
    /// Beyond the near-tolerance band
    Death,

    /// Near-tolerance band: +1 cm
    Near,

    /// Extended-tolerance band: +3 cm
    Extended,

    /// Ideal range: +6 cm
    Ideal,
}

impl GrowthOutcome {
    /// Height delta in cm, or `None` for death
    pub fn delta(&self) -> Option<i32> {
        match self {
            GrowthOutcome::Ideal => Some(6),
            GrowthOutcome::Extended => Some(3),
            GrowthOutcome::Near => Some(1),
            GrowthOutcome::Death => None,
        }
    }

    /// Integer code: 6, 3, 1, or [`DEATH_SENTINEL`]
    pub fn code(&self) -> i32 {
        self.delta().unwrap_or(DEATH_SENTINEL)
    }

    /// Inverse of [`GrowthOutcome::code`]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            6 => Some(GrowthOutcome::Ideal),
            3 => Some(GrowthOutcome::Extended),
            1 => Some(GrowthOutcome::Near),
            DEATH_SENTINEL => Some(GrowthOutcome::Death),
            _ => None,
        }
    }

    pub fn is_death(&self) -> bool {
        *self == GrowthOutcome::Death
    }

    /// Simple display text
    pub fn display_text(&self) -> &'static str {
        match self {
            GrowthOutcome::Ideal => "+6 cm (ideal conditions)",
            GrowthOutcome::Extended => "+3 cm (within tolerance)",
            GrowthOutcome::Near => "+1 cm (close to tolerance)",
            GrowthOutcome::Death => "death (extreme conditions)",
        }
    }
}

/// Classify a single reading against its range.
///
/// The lower edge of each outer band belongs to the wider band below it:
/// `min - extended_tolerance` itself scores as near tolerance. NaN matches
/// no band and is lethal.
pub fn evaluate_factor(value: f64, range: &EnvironmentalRange) -> GrowthOutcome {
    let extended_low = range.min - range.extended_tolerance;
    let extended_high = range.max + range.extended_tolerance;
    let floor = extended_low - range.near_tolerance;
    let ceiling = extended_high + range.near_tolerance;

    if range.min <= value && value <= range.max {
        GrowthOutcome::Ideal
    } else if (extended_low < value && value < range.min)
        || (range.max < value && value <= extended_high)
    {
        GrowthOutcome::Extended
    } else if (floor <= value && value <= extended_low)
        || (extended_high < value && value <= ceiling)
    {
        GrowthOutcome::Near
    } else {
        GrowthOutcome::Death
    }
}

/// One environmental reading for a plant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Water given (ml)
    #[serde(rename = "agua")]
    pub water: f64,

    /// Hours of direct light
    #[serde(rename = "luz")]
    pub light: f64,

    /// Temperature (°C)
    #[serde(rename = "temp")]
    pub temperature: f64,
}

impl Reading {
    pub const fn new(water: f64, light: f64, temperature: f64) -> Self {
        Self {
            water,
            light,
            temperature,
        }
    }

    /// Value for a given factor
    pub fn value(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Water => self.water,
            Factor::Light => self.light,
            Factor::Temperature => self.temperature,
        }
    }
}

impl Default for Reading {
    /// 80 ml, 8 h, 22 °C
    fn default() -> Self {
        Self::new(80.0, 8.0, 22.0)
    }
}

/// Per-factor breakdown of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthAssessment {
    /// Band the water reading fell in
    pub water: GrowthOutcome,

    /// Band the light reading fell in
    pub light: GrowthOutcome,

    /// Band the temperature reading fell in
    pub temperature: GrowthOutcome,

    /// Worst of the three; this is what the plant receives
    pub overall: GrowthOutcome,
}

impl GrowthAssessment {
    pub fn factor(&self, factor: Factor) -> GrowthOutcome {
        match factor {
            Factor::Water => self.water,
            Factor::Light => self.light,
            Factor::Temperature => self.temperature,
        }
    }

    /// The first factor that scored below ideal and set the overall outcome.
    /// `None` when every factor is ideal.
    pub fn limiting_factor(&self) -> Option<Factor> {
        if self.overall == GrowthOutcome::Ideal {
            return None;
        }
        Factor::all()
            .iter()
            .copied()
            .find(|&f| self.factor(f) == self.overall)
    }
}

/// Evaluates readings against an owned, immutable rule table.
#[derive(Debug, Clone, Default)]
pub struct GrowthEvaluator {
    rules: GrowthRules,
}

impl GrowthEvaluator {
    pub fn new(rules: GrowthRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GrowthRules {
        &self.rules
    }

    /// Combined outcome for the three factors
    pub fn calculate_growth(&self, water: f64, light: f64, temperature: f64) -> GrowthOutcome {
        self.assess(&Reading::new(water, light, temperature)).overall
    }

    /// Evaluate every factor and keep the breakdown
    pub fn assess(&self, reading: &Reading) -> GrowthAssessment {
        let water = evaluate_factor(reading.water, &self.rules.water);
        let light = evaluate_factor(reading.light, &self.rules.light);
        let temperature = evaluate_factor(reading.temperature, &self.rules.temperature);

        // Death sorts lowest, so it wins here without a separate check
        let overall = water.min(light).min(temperature);

        GrowthAssessment {
            water,
            light,
            temperature,
            overall,
        }
    }
}

/// Evaluate with the default rule table
pub fn calculate_growth(water: f64, light: f64, temperature: f64) -> GrowthOutcome {
    GrowthEvaluator::default().calculate_growth(water, light, temperature)
}

/// Evaluate with the default rule table and return the integer code
/// (6, 3, 1, or -999)
pub fn calculate_growth_code(water: f64, light: f64, temperature: f64) -> i32 {
    calculate_growth(water, light, temperature).code()
}
