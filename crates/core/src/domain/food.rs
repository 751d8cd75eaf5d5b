use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

use super::mentions_any;

/// Life stage a food is formulated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    Puppy,
    Adult,
    Senior,
}

impl AgeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Puppy => "puppy",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRange {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "puppy" => Ok(Self::Puppy),
            "adult" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            other => Err(DomainError::InvalidInput(format!("invalid age range: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedSize {
    Small,
    Medium,
    Large,
}

impl BreedSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for BreedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreedSize {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(DomainError::InvalidInput(format!("invalid breed size: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryIndicator {
    GrainFree,
    LimitedIngredient,
    WeightManagement,
    SensitiveStomach,
    Organic,
    Raw,
    Natural,
    HighProtein,
}

impl DietaryIndicator {
    pub const ALL: [DietaryIndicator; 8] = [
        Self::GrainFree,
        Self::LimitedIngredient,
        Self::WeightManagement,
        Self::SensitiveStomach,
        Self::Organic,
        Self::Raw,
        Self::Natural,
        Self::HighProtein,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrainFree => "grain-free",
            Self::LimitedIngredient => "limited-ingredient",
            Self::WeightManagement => "weight-management",
            Self::SensitiveStomach => "sensitive-stomach",
            Self::Organic => "organic",
            Self::Raw => "raw",
            Self::Natural => "natural",
            Self::HighProtein => "high-protein",
        }
    }
}

impl fmt::Display for DietaryIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryIndicator {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|indicator| indicator.as_str() == normalized)
            .ok_or_else(|| {
                DomainError::InvalidInput(format!("invalid dietary indicator: {normalized}"))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub potential_allergen: bool,
}

/// Guaranteed analysis. Percentages except where noted; optional fields are absent
/// from sparse catalog entries and any rule depending on them does not apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalValue {
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(default)]
    pub moisture: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    pub calories_per_cup: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega6: Option<f64>,
    /// mg per kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucosamine: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodProduct {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub brand_id: String,
    pub nutritional_value: NutritionalValue,
    pub suitable_ages: Vec<AgeRange>,
    pub suitable_breed_sizes: Vec<BreedSize>,
    #[serde(default)]
    pub dietary_indicators: Vec<DietaryIndicator>,
    /// Marketing copy, matched by keyword.
    #[serde(default)]
    pub special_features: Vec<String>,
    /// Conditions the formula claims to address, matched by keyword.
    #[serde(default)]
    pub special_formulations: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl FoodProduct {
    pub fn has_indicator(&self, indicator: DietaryIndicator) -> bool {
        self.dietary_indicators.contains(&indicator)
    }

    pub fn features_mention(&self, keywords: &[&str]) -> bool {
        mentions_any(&self.special_features, keywords)
    }

    pub fn formulations_mention(&self, keywords: &[&str]) -> bool {
        mentions_any(&self.special_formulations, keywords)
    }

    pub fn ingredients_mention(&self, keywords: &[&str]) -> bool {
        self.ingredients.iter().any(|ingredient| {
            let name = ingredient.name.to_lowercase();
            keywords.iter().any(|keyword| name.contains(keyword))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AgeRange, BreedSize, DietaryIndicator, FoodProduct};

    #[test]
    fn enums_parse_from_wire_strings() {
        assert_eq!("Senior".parse::<AgeRange>(), Ok(AgeRange::Senior));
        assert_eq!("large".parse::<BreedSize>(), Ok(BreedSize::Large));
        assert_eq!("grain_free".parse::<DietaryIndicator>(), Ok(DietaryIndicator::GrainFree));
    }

    #[test]
    fn invalid_enum_values_name_the_value() {
        let error = "invalid".parse::<AgeRange>().err().map(|error| error.to_string());
        assert_eq!(error.as_deref(), Some("invalid input: invalid age range: invalid"));

        let error = "giant".parse::<BreedSize>().err().map(|error| error.to_string());
        assert_eq!(error.as_deref(), Some("invalid input: invalid breed size: giant"));

        assert!("keto".parse::<DietaryIndicator>().is_err());
    }

    #[test]
    fn product_deserializes_sparse_entries() -> Result<(), serde_json::Error> {
        let product: FoodProduct = serde_json::from_str(
            r#"{
                "id": "p1",
                "brand_id": "b1",
                "nutritional_value": {"protein": 24, "fat": 14, "fiber": 4, "calories_per_cup": 360},
                "suitable_ages": ["adult"],
                "suitable_breed_sizes": ["medium"],
                "dietary_indicators": ["high-protein"]
            }"#,
        )?;

        assert!(product.has_indicator(DietaryIndicator::HighProtein));
        assert!(product.special_features.is_empty());
        assert_eq!(product.nutritional_value.glucosamine, None);
        assert!(!product.features_mention(&["joint"]));
        Ok(())
    }
}
