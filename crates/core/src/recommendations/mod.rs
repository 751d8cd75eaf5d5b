//! Food Recommendation Engine
//!
//! Scores every catalog product against a pet profile with a fixed rule stack
//! (base fit, age, breed size, activity, health conditions), relaxes acceptance
//! thresholds when too few products qualify, spreads the top slots across brands
//! and renders a readable explanation per pick.

mod classify;
mod diversity;
mod engine;
mod explanation;
mod health;
mod relaxation;
mod scoring;
mod types;

pub use classify::{determine_breed_size, map_dog_age_to_age_range, ProfileFacts};
pub use diversity::apply_brand_diversity;
pub use engine::{generate_food_recommendations, RecommendationEngine};
pub use explanation::{add_detailed_explanations, Explanation};
pub use health::{
    apply_health_condition_rules, should_avoid_ingredient, HealthCondition, HealthConditionRule,
};
pub use relaxation::{score_catalog, RelaxationLevel, ScoreThresholds};
pub use scoring::{
    apply_activity_level_rule, apply_age_rule, apply_breed_size_rule, base_score_with_reasons,
    calculate_base_score,
};
pub use types::*;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, DomainError>;

/// Score every product starts from before any rule is applied
pub const NEUTRAL_BASE_SCORE: f64 = 50.0;

/// Products whose base score falls below this are skipped unless relaxation is at least level 2
pub const MIN_BASE_SCORE: f64 = 20.0;

pub const DEFAULT_MIN_RECOMMENDATIONS: usize = 3;

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

/// Per-repeat brand penalty multiplier (0 disables diversity, 1 is full strength)
pub const DEFAULT_DIVERSITY_FACTOR: f64 = 0.8;

/// Score points removed per already-chosen product of the same brand at full diversity
pub const BRAND_REPEAT_PENALTY: f64 = 10.0;
