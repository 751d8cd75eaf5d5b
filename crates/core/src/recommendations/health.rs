//! Health condition catalog and the condition-aware scoring rule

use std::fmt;

use serde::Serialize;

use crate::domain::food::{DietaryIndicator, FoodProduct};

use super::classify::ProfileFacts;
use super::types::RuleOutcome;

/// Boost when a formulation names one of the dog's conditions
pub const FORMULATION_MATCH_BOOST: f64 = 30.0;
/// Per-condition bonus when several conditions are addressed by formulation
pub const MULTI_CONDITION_FORMULATION_BONUS: f64 = 20.0;
/// Per-condition bonus when several conditions are addressed through indicators
pub const MULTI_CONDITION_INDICATOR_BONUS: f64 = 15.0;

const COMMON_ALLERGENS: [&str; 3] = ["wheat", "corn", "soy"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Allergies,
    Obesity,
    JointIssues,
    Diabetes,
    KidneyDisease,
    HeartDisease,
    Pancreatitis,
    DentalIssues,
    GiIssues,
    SkinConditions,
}

/// Dietary guidance for one condition.
#[derive(Debug, PartialEq, Eq)]
pub struct HealthConditionRule {
    pub recommended_dietary_indicators: &'static [DietaryIndicator],
    pub ingredients_to_avoid: &'static [&'static str],
    pub description: &'static str,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 10] = [
        Self::Allergies,
        Self::Obesity,
        Self::JointIssues,
        Self::Diabetes,
        Self::KidneyDisease,
        Self::HeartDisease,
        Self::Pancreatitis,
        Self::DentalIssues,
        Self::GiIssues,
        Self::SkinConditions,
    ];

    /// Recognise a free-text condition id. Case, spaces and hyphens are ignored;
    /// a few common aliases map onto their canonical condition.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "joint_problems" | "arthritis" => return Some(Self::JointIssues),
            "kidney" | "renal_disease" => return Some(Self::KidneyDisease),
            "overweight" => return Some(Self::Obesity),
            _ => {}
        }
        Self::ALL.into_iter().find(|condition| condition.id() == normalized)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Allergies => "allergies",
            Self::Obesity => "obesity",
            Self::JointIssues => "joint_issues",
            Self::Diabetes => "diabetes",
            Self::KidneyDisease => "kidney_disease",
            Self::HeartDisease => "heart_disease",
            Self::Pancreatitis => "pancreatitis",
            Self::DentalIssues => "dental_issues",
            Self::GiIssues => "gi_issues",
            Self::SkinConditions => "skin_conditions",
        }
    }

    /// Human-readable name used in reasons
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allergies => "allergies",
            Self::Obesity => "obesity",
            Self::JointIssues => "joint issues",
            Self::Diabetes => "diabetes",
            Self::KidneyDisease => "kidney disease",
            Self::HeartDisease => "heart disease",
            Self::Pancreatitis => "pancreatitis",
            Self::DentalIssues => "dental issues",
            Self::GiIssues => "gi issues",
            Self::SkinConditions => "skin conditions",
        }
    }

    /// Lowercase terms that identify this condition inside free text.
    pub fn match_terms(&self) -> &'static [&'static str] {
        match self {
            Self::Allergies => &["allergies"],
            Self::Obesity => &["obesity"],
            Self::JointIssues => &["joint_issues", "joint issues", "joint problems", "arthritis"],
            Self::Diabetes => &["diabetes"],
            Self::KidneyDisease => &["kidney_disease", "kidney disease"],
            Self::HeartDisease => &["heart_disease", "heart disease"],
            Self::Pancreatitis => &["pancreatitis"],
            Self::DentalIssues => &["dental_issues", "dental issues"],
            Self::GiIssues => &["gi_issues", "gi issues"],
            Self::SkinConditions => &["skin_conditions", "skin conditions"],
        }
    }

    pub fn mentioned_in(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.match_terms().iter().any(|term| text.contains(term))
    }

    pub fn rule(&self) -> &'static HealthConditionRule {
        match self {
            Self::Allergies => &HealthConditionRule {
                recommended_dietary_indicators: &[
                    DietaryIndicator::LimitedIngredient,
                    DietaryIndicator::Natural,
                ],
                ingredients_to_avoid: &["corn", "wheat", "soy", "dairy", "chicken", "beef"],
                description: "Limited ingredient formulas with novel protein sources are recommended for dogs with allergies",
            },
            Self::Obesity => &HealthConditionRule {
                recommended_dietary_indicators: &[DietaryIndicator::WeightManagement],
                ingredients_to_avoid: &["added sugars", "corn syrup", "excessive fat"],
                description: "Weight management formulas with reduced calories and fat are recommended for overweight dogs",
            },
            Self::JointIssues => &HealthConditionRule {
                recommended_dietary_indicators: &[DietaryIndicator::Natural],
                ingredients_to_avoid: &[],
                description: "Formulas with glucosamine, chondroitin, and omega-3 fatty acids can support joint health",
            },
            Self::Diabetes => &HealthConditionRule {
                recommended_dietary_indicators: &[DietaryIndicator::HighProtein],
                ingredients_to_avoid: &["corn", "white rice", "simple carbohydrates"],
                description: "Low glycemic foods with complex carbohydrates and high protein are better for diabetic dogs",
            },
            Self::KidneyDisease => &HealthConditionRule {
                recommended_dietary_indicators: &[],
                ingredients_to_avoid: &["excessive protein", "phosphorus", "sodium"],
                description: "Lower protein, phosphorus, and sodium content is recommended for dogs with kidney issues",
            },
            Self::HeartDisease => &HealthConditionRule {
                recommended_dietary_indicators: &[],
                ingredients_to_avoid: &["high sodium"],
                description: "Reduced sodium formulas are recommended for dogs with heart conditions",
            },
            Self::Pancreatitis => &HealthConditionRule {
                recommended_dietary_indicators: &[],
                ingredients_to_avoid: &["high fat"],
                description: "Low-fat formulas are essential for dogs with pancreatitis",
            },
            Self::DentalIssues => &HealthConditionRule {
                recommended_dietary_indicators: &[],
                ingredients_to_avoid: &[],
                description: "Dental-specific formulas or kibble designed to reduce tartar buildup can help with dental issues",
            },
            Self::GiIssues => &HealthConditionRule {
                recommended_dietary_indicators: &[DietaryIndicator::SensitiveStomach],
                ingredients_to_avoid: &["wheat", "dairy", "artificial additives"],
                description: "Easily digestible formulas with limited ingredients are better for dogs with sensitive stomachs",
            },
            Self::SkinConditions => &HealthConditionRule {
                recommended_dietary_indicators: &[DietaryIndicator::Natural],
                ingredients_to_avoid: &["artificial additives", "preservatives"],
                description: "Foods rich in omega-3 and omega-6 fatty acids can support skin health",
            },
        }
    }

    /// Whether the product carries any indicator recommended for this condition.
    pub fn indicated_by(&self, product: &FoodProduct) -> bool {
        self.rule()
            .recommended_dietary_indicators
            .iter()
            .any(|indicator| product.has_indicator(*indicator))
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// True when the ingredient name contains any avoid-list term, case-insensitively.
pub fn should_avoid_ingredient(ingredient: &str, avoid: &[&str]) -> bool {
    let ingredient = ingredient.to_lowercase();
    avoid.iter().any(|term| ingredient.contains(&term.to_lowercase()))
}

/// Apply condition-specific boosts, penalties and warnings.
///
/// Profiles without recognised conditions pass through unchanged.
pub fn apply_health_condition_rules(
    facts: &ProfileFacts<'_>,
    product: &FoodProduct,
    score: f64,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::starting_at(score);
    if facts.conditions.is_empty() {
        return outcome;
    }

    let mut addressed = 0usize;
    for condition in &facts.conditions {
        if product.special_formulations.iter().any(|formulation| condition.mentioned_in(formulation))
        {
            addressed += 1;
            outcome.adjust(
                FORMULATION_MATCH_BOOST,
                format!(
                    "Boosted score because this food is specially formulated for {}",
                    condition.label()
                ),
            );
        }
        apply_condition_specifics(*condition, product, &mut outcome);
    }

    let condition_count = facts.conditions.len();
    if condition_count > 1 {
        if addressed > 1 {
            let boost = MULTI_CONDITION_FORMULATION_BONUS * addressed as f64;
            outcome.adjust(
                boost,
                format!("Extra boost of {boost} for addressing {addressed} health conditions"),
            );
        }

        let indicated =
            facts.conditions.iter().filter(|condition| condition.indicated_by(product)).count();
        if indicated > 1 {
            outcome.adjust(
                MULTI_CONDITION_INDICATOR_BONUS * indicated as f64,
                format!("Extra boost for addressing {indicated} health conditions through dietary indicators"),
            );
        }
    }

    outcome
}

fn apply_condition_specifics(
    condition: HealthCondition,
    product: &FoodProduct,
    outcome: &mut RuleOutcome,
) {
    let nutrition = &product.nutritional_value;

    match condition {
        HealthCondition::Allergies => {
            if product.formulations_mention(&["hypoallergenic", "limited ingredient", "allergy"]) {
                outcome.adjust(
                    25.0,
                    "Boosted score for hypoallergenic or limited ingredient formulation",
                );
            }
            if product.features_mention(&["sensitivit", "novel protein"]) {
                outcome.adjust(15.0, "Boosted score for food sensitivities formula or novel protein");
            }
            if product.has_indicator(DietaryIndicator::LimitedIngredient) {
                outcome
                    .adjust(15.0, "Boosted score for limited ingredient formula (good for allergies)");
            }
            if product.has_indicator(DietaryIndicator::Natural) {
                outcome.adjust(10.0, "Boosted score for natural formula (better for allergies)");
            }
            if product
                .ingredients
                .iter()
                .any(|ingredient| should_avoid_ingredient(&ingredient.name, &COMMON_ALLERGENS))
            {
                outcome.adjust(-20.0, "Penalized for containing common allergens (wheat, corn, or soy)");
                outcome.warn(
                    "This food contains ingredients (wheat, corn, or soy) that are problematic for dogs with allergies",
                );
            }
        }
        HealthCondition::JointIssues => {
            if product.formulations_mention(&["joint", "mobility", "glucosamine"]) {
                outcome.adjust(30.0, "Boosted score for joint support formulation");
            }
            if product.features_mention(&["joint", "mobility", "glucosamine", "chondroitin"]) {
                outcome.adjust(25.0, "Boosted score for joint support features");
            }
            if nutrition.glucosamine.is_some_and(|value| value > 400.0) {
                outcome.adjust(15.0, "Boosted score for high glucosamine content for joint health");
            }
            if nutrition.omega3.is_some_and(|value| value > 0.5) {
                outcome.adjust(
                    15.0,
                    "Boosted score for high omega-3 fatty acids content (good for joint health)",
                );
            }
            if product.has_indicator(DietaryIndicator::Natural) {
                outcome
                    .adjust(10.0, "Boosted score for natural formula (beneficial for joint health)");
            }
        }
        HealthCondition::Diabetes => {
            if product.formulations_mention(&["diabetes", "glycemic", "blood sugar"]) {
                outcome.adjust(30.0, "Boosted score for diabetes-friendly formulation");
            }
            if product.features_mention(&["diabet", "glycemic", "blood sugar"]) {
                outcome.adjust(25.0, "Boosted score for diabetes-friendly special features");
            }
            if nutrition.carbohydrates < 30.0 {
                outcome.adjust(15.0, "Boosted score for low carbohydrate content");
            }
            if nutrition.fiber > 5.0 {
                outcome.adjust(15.0, "Boosted score for high fiber content");
            }
            if product.has_indicator(DietaryIndicator::HighProtein) {
                outcome.adjust(15.0, "Boosted score for high protein formula (good for diabetic dogs)");
            }
        }
        HealthCondition::Obesity => {
            if product.formulations_mention(&["weight", "light", "diet"]) {
                outcome.adjust(
                    30.0,
                    "Boosted score for weight management formulation specifically for obesity",
                );
            }
            if product.features_mention(&["weight", "calorie", "diet"]) {
                outcome
                    .adjust(15.0, "Boosted score for weight control special features for obesity");
            }
            if nutrition.calories_per_cup < 350.0 {
                outcome.adjust(15.0, "Boosted score for low calorie content beneficial for obesity");
            }
            if nutrition.fat < 10.0 {
                outcome.adjust(15.0, "Boosted score for low fat content ideal for obesity");
            }
            if product.has_indicator(DietaryIndicator::WeightManagement) {
                outcome
                    .adjust(15.0, "Boosted score for weight management formula suited for obesity");
            }
        }
        HealthCondition::KidneyDisease => {
            if product.formulations_mention(&["kidney", "renal"]) {
                outcome.adjust(30.0, "Boosted score for kidney health formulation");
            }
            if nutrition.protein > 25.0 {
                outcome.adjust(
                    -25.0,
                    "Penalized for high protein content (not ideal for kidney disease)",
                );
            }
            if nutrition.phosphorus.is_some_and(|value| value < 0.5) {
                outcome.adjust(20.0, "Boosted score for low phosphorus content");
            }
        }
        HealthCondition::HeartDisease
        | HealthCondition::Pancreatitis
        | HealthCondition::DentalIssues
        | HealthCondition::GiIssues
        | HealthCondition::SkinConditions => {}
    }
}
