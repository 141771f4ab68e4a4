//! Growth rules
//!
//! - `ranges.rs` - EnvironmentalRange + the default tomato rule table
//! - `evaluator.rs` - Band classification and the law-of-the-minimum combiner

pub mod evaluator;
pub mod ranges;

// Re-export public API
pub use evaluator::{
    calculate_growth, calculate_growth_code, evaluate_factor, GrowthAssessment, GrowthEvaluator,
    GrowthOutcome, Reading, DEATH_SENTINEL,
};
pub use ranges::{EnvironmentalRange, Factor, GrowthRules, RulesError};
