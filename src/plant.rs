//! Plant state and the growth transition
//!
//! A plant is either alive with a non-negative height or dead at height 0.
//! Death is terminal: `apply_outcome` is the only place that moves a plant
//! between the two states, and it refuses to touch a dead plant.

use crate::growth::{GrowthOutcome, Reading};
use serde::{Deserialize, Serialize};

/// Starting height of a fresh plant (cm)
pub const DEFAULT_INITIAL_HEIGHT: f64 = 3.0;

/// Caller-owned record for one plant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    /// Current height (cm), never negative; 0 once dead
    pub height: f64,

    /// False once the plant has died; never flips back
    pub alive: bool,

    /// Reading applied on the most recent step that found the plant alive
    pub last_reading: Reading,
}

/// Why a plant died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// A factor fell beyond its tolerance bands
    ExtremeConditions,

    /// Height reached zero after applying the delta
    HeightExhausted,
}

/// What a single step did to a plant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Plant grew by `delta` cm and is now `height` cm tall
    Grew { delta: i32, height: f64 },
    /// Plant died on this step
    Died(DeathCause),
    /// Plant was already dead; nothing changed
    AlreadyDead,
}

impl PlantState {
    /// Living plant at `height` with the default reading
    pub fn new(height: f64) -> Self {
        Self {
            height: height.max(0.0),
            alive: true,
            last_reading: Reading::default(),
        }
    }

    fn dead(last_reading: Reading) -> Self {
        Self {
            height: 0.0,
            alive: false,
            last_reading,
        }
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    /// Short status line, e.g. "12.0 cm" or "dead"
    pub fn status_text(&self) -> String {
        if self.alive {
            format!("{:.1} cm", self.height)
        } else {
            "dead".to_string()
        }
    }
}

impl Default for PlantState {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_HEIGHT)
    }
}

/// Apply an evaluated outcome to a plant.
///
/// `reading` is recorded as the plant's last reading whenever the plant was
/// alive at the start of the step, including the step that kills it.
pub fn apply_outcome(
    state: PlantState,
    outcome: GrowthOutcome,
    reading: Reading,
) -> (PlantState, Transition) {
    if !state.alive {
        return (state, Transition::AlreadyDead);
    }

    let Some(delta) = outcome.delta() else {
        return (
            PlantState::dead(reading),
            Transition::Died(DeathCause::ExtremeConditions),
        );
    };

    let height = (state.height + f64::from(delta)).max(0.0);
    if height <= 0.0 {
        return (
            PlantState::dead(reading),
            Transition::Died(DeathCause::HeightExhausted),
        );
    }

    (
        PlantState {
            height,
            alive: true,
            last_reading: reading,
        },
        Transition::Grew { delta, height },
    )
}
