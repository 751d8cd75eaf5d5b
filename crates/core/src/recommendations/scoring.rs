//! Base fit score and the age, breed-size and activity rules

use crate::domain::food::{AgeRange, BreedSize, DietaryIndicator, FoodProduct};
use crate::domain::profile::{ActivityLevel, PetProfile};

use super::classify::ProfileFacts;
use super::types::RuleOutcome;
use super::{RecommendationResult, NEUTRAL_BASE_SCORE};

const EXCLUSIVE_MATCH_BONUS: f64 = 20.0;
const INCLUSIVE_MATCH_BONUS: f64 = 10.0;
const MISMATCH_PENALTY: f64 = -30.0;

/// Base compatibility score from life stage and size fit alone.
pub fn calculate_base_score(profile: &PetProfile, product: &FoodProduct) -> RecommendationResult<f64> {
    let facts = ProfileFacts::derive(profile)?;
    Ok(base_score_with_reasons(&facts, product).score)
}

pub fn base_score_with_reasons(facts: &ProfileFacts<'_>, product: &FoodProduct) -> RuleOutcome {
    let mut outcome = RuleOutcome::starting_at(NEUTRAL_BASE_SCORE);
    let age_range = facts.age_range;
    let breed_size = facts.breed_size;

    match membership(&product.suitable_ages, &age_range) {
        Membership::Exclusive => outcome
            .adjust(EXCLUSIVE_MATCH_BONUS, format!("Specifically formulated for {age_range} dogs")),
        Membership::Inclusive => {
            outcome.adjust(INCLUSIVE_MATCH_BONUS, format!("Suitable for {age_range} dogs"))
        }
        Membership::Absent => {
            outcome.adjust(MISMATCH_PENALTY, format!("Not formulated for {age_range} dogs"))
        }
    }

    match membership(&product.suitable_breed_sizes, &breed_size) {
        Membership::Exclusive => outcome.adjust(
            EXCLUSIVE_MATCH_BONUS,
            format!("Specifically formulated for {breed_size} breed size"),
        ),
        Membership::Inclusive => {
            outcome.adjust(INCLUSIVE_MATCH_BONUS, format!("Suitable for {breed_size} breed size"))
        }
        Membership::Absent => outcome
            .adjust(MISMATCH_PENALTY, format!("Not formulated for {breed_size} breed size dogs")),
    }

    outcome
}

enum Membership {
    Exclusive,
    Inclusive,
    Absent,
}

fn membership<T: PartialEq>(values: &[T], target: &T) -> Membership {
    if !values.contains(target) {
        Membership::Absent
    } else if values.iter().all(|value| value == target) {
        Membership::Exclusive
    } else {
        Membership::Inclusive
    }
}

/// Life-stage nutrient heuristics.
pub fn apply_age_rule(facts: &ProfileFacts<'_>, product: &FoodProduct, score: f64) -> RuleOutcome {
    let mut outcome = RuleOutcome::starting_at(score);
    let nutrition = &product.nutritional_value;

    match facts.age_range {
        AgeRange::Puppy => {
            if nutrition.protein >= 25.0 {
                outcome.adjust(10.0, "High protein content ideal for puppy growth");
            }
            if nutrition.fat >= 15.0 {
                outcome.adjust(5.0, "Good fat content for puppy development");
            }
            if product.features_mention(&["dha", "puppy development"]) {
                outcome.adjust(
                    10.0,
                    "Contains nutrients supporting puppy brain and eye development",
                );
            }
            if facts.age() < 0.5 && !product.features_mention(&["young puppy", "starter"]) {
                outcome.adjust(-10.0, "May not be ideal for very young puppies under 6 months");
            }
        }
        AgeRange::Senior => {
            if product.features_mention(&["joint", "mobility"]) {
                outcome.adjust(10.0, "Contains joint support for senior dogs");
            }
            if nutrition.calories_per_cup < 350.0 {
                outcome.adjust(5.0, "Appropriate calorie content for senior dogs");
            }
            if nutrition.fiber > 5.0 {
                outcome.adjust(5.0, "Good fiber content for senior digestive health");
            }
            if facts.age() >= 10.0 && !product.features_mention(&["geriatric", "mature senior"]) {
                outcome.adjust(-5.0, "Consider a formula specifically for geriatric dogs");
            }
        }
        AgeRange::Adult => {
            if (18.0..=30.0).contains(&nutrition.protein) {
                outcome.adjust(5.0, "Appropriate protein content for adult maintenance");
            }
            if (10.0..=20.0).contains(&nutrition.fat) {
                outcome.adjust(5.0, "Suitable fat content for adult dogs");
            }
        }
    }

    outcome
}

/// Kibble size, calorie density and growth control by size class.
pub fn apply_breed_size_rule(
    facts: &ProfileFacts<'_>,
    product: &FoodProduct,
    score: f64,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::starting_at(score);
    let calories = product.nutritional_value.calories_per_cup;

    match facts.breed_size {
        BreedSize::Small => {
            if product.features_mention(&["small bite", "small breed"]) {
                outcome.adjust(10.0, "Kibble size appropriate for small breeds");
            }
            if calories >= 350.0 {
                outcome.adjust(5.0, "Higher calorie density suitable for small breed metabolism");
            }
        }
        BreedSize::Medium => {
            if !product.features_mention(&["small breed", "large breed"]) {
                outcome.adjust(5.0, "Formula well-suited for medium breeds");
            }
        }
        BreedSize::Large => {
            if product.features_mention(&["joint support", "large breed"]) {
                outcome.adjust(10.0, "Contains features beneficial for large breeds");
            }
            if facts.age() < 2.0 && facts.age_range == AgeRange::Puppy {
                if product.features_mention(&["large breed puppy", "controlled growth"]) {
                    outcome.adjust(
                        15.0,
                        "Specifically formulated for large breed puppy development",
                    );
                } else {
                    outcome.adjust(-10.0, "Not specially formulated for large breed puppy needs");
                }
            }
            if facts.age() >= 2.0 && calories < 400.0 {
                outcome.adjust(5.0, "Appropriate calorie content to help maintain healthy weight");
            }
        }
    }

    outcome
}

/// Calorie, protein and fat banding per activity level.
pub fn apply_activity_level_rule(
    facts: &ProfileFacts<'_>,
    product: &FoodProduct,
    score: f64,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::starting_at(score);
    let nutrition = &product.nutritional_value;
    let calories = nutrition.calories_per_cup;

    match facts.profile.activity_level {
        ActivityLevel::Low => {
            if calories <= 325.0 {
                outcome.adjust(10.0, "Lower calorie content appropriate for less active dogs");
            } else if calories > 400.0 {
                outcome.adjust(-10.0, "Calorie content may be too high for less active dogs");
            }
            if product.has_indicator(DietaryIndicator::WeightManagement) {
                outcome
                    .adjust(10.0, "Weight management formula suitable for less active lifestyle");
            }
            if nutrition.fiber >= 5.0 {
                outcome.adjust(
                    5.0,
                    "Good fiber content helps maintain healthy weight for less active dogs",
                );
            }
        }
        ActivityLevel::Moderate => {
            if (325.0..=400.0).contains(&calories) {
                outcome.adjust(10.0, "Balanced calorie content ideal for moderately active dogs");
            }
            if (20.0..=30.0).contains(&nutrition.protein) && (10.0..=20.0).contains(&nutrition.fat)
            {
                outcome.adjust(
                    5.0,
                    "Well-balanced protein and fat profile for average activity levels",
                );
            }
        }
        ActivityLevel::High => {
            if calories >= 400.0 {
                outcome.adjust(15.0, "Higher calorie content suitable for active dogs");
            } else if calories < 350.0 {
                outcome.adjust(-15.0, "Calorie content may be too low for highly active dogs");
            }
            if nutrition.protein >= 25.0 {
                outcome.adjust(
                    10.0,
                    "High protein content supports muscle maintenance for active dogs",
                );
            }
            if nutrition.fat >= 15.0 {
                outcome
                    .adjust(5.0, "Good fat content provides sustained energy for active dogs");
            }
            if product.has_indicator(DietaryIndicator::HighProtein)
                || product.features_mention(&["performance", "active", "energy"])
            {
                outcome.adjust(10.0, "Performance formula designed for active dogs");
            }
        }
        ActivityLevel::VeryHigh => {
            if calories >= 450.0 {
                outcome.adjust(20.0, "High calorie content necessary for very active dogs");
            } else if calories < 400.0 {
                outcome.adjust(-15.0, "Calorie content too low for extremely active dogs");
            }
            if nutrition.protein >= 30.0 {
                outcome.adjust(
                    15.0,
                    "Very high protein content essential for muscle recovery in extremely active dogs",
                );
            }
            if nutrition.fat >= 20.0 {
                outcome
                    .adjust(10.0, "High fat content provides maximum energy for very active dogs");
            }
            if product.features_mention(&["performance", "working", "sport", "high energy"]) {
                outcome.adjust(15.0, "Specialized formula designed for working or sport dogs");
            }
        }
    }

    outcome
}
