use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const POUNDS_TO_KILOGRAMS: f64 = 0.453592;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    #[serde(alias = "lbs")]
    Lb,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }

    pub fn to_kilograms(&self, value: f64) -> f64 {
        match self {
            Self::Kg => value,
            Self::Lb => value * POUNDS_TO_KILOGRAMS,
        }
    }
}

impl FromStr for WeightUnit {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" => Ok(Self::Kg),
            "lb" | "lbs" => Ok(Self::Lb),
            other => Err(DomainError::InvalidInput(format!("invalid weight unit: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "very_high" => Ok(Self::VeryHigh),
            other => Err(DomainError::InvalidInput(format!("invalid activity level: {other}"))),
        }
    }
}

/// A dog as described by its owner. Owned by the caller; the engine only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    pub name: String,
    #[serde(default)]
    pub breed: String,
    /// Age in years.
    pub age: f64,
    #[serde(alias = "weight")]
    pub weight_value: f64,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Condition identifiers; order only affects the order of generated reasons.
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PetProfile {
    pub fn new(
        name: impl Into<String>,
        breed: impl Into<String>,
        age: f64,
        weight_value: f64,
        weight_unit: WeightUnit,
    ) -> Self {
        Self {
            name: name.into(),
            breed: breed.into(),
            age,
            weight_value,
            weight_unit,
            activity_level: ActivityLevel::default(),
            health_conditions: Vec::new(),
            notes: None,
        }
    }

    pub fn with_activity_level(mut self, activity_level: ActivityLevel) -> Self {
        self.activity_level = activity_level;
        self
    }

    pub fn with_health_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.health_conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_unit.to_kilograms(self.weight_value)
    }

    /// Checks the profile the way the profile form does before it is saved.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("profile name is required".to_owned()));
        }
        if self.breed.trim().is_empty() {
            return Err(DomainError::InvariantViolation("profile breed is required".to_owned()));
        }
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(DomainError::InvariantViolation(
                "profile age must be a non-negative number".to_owned(),
            ));
        }
        if !self.weight_value.is_finite() || self.weight_value <= 0.0 {
            return Err(DomainError::InvariantViolation(
                "profile weight must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityLevel, PetProfile, WeightUnit};
    use crate::errors::DomainError;

    fn buddy() -> PetProfile {
        PetProfile::new("Buddy", "Labrador Retriever", 3.0, 30.0, WeightUnit::Kg)
    }

    #[test]
    fn pounds_convert_to_kilograms() {
        let profile = PetProfile::new("Milo", "Pug", 2.0, 15.0, WeightUnit::Lb);
        assert!((profile.weight_kg() - 6.80388).abs() < 1e-6);
    }

    #[test]
    fn weight_unit_accepts_lbs_alias() {
        assert_eq!("lbs".parse::<WeightUnit>(), Ok(WeightUnit::Lb));
        assert_eq!(" KG ".parse::<WeightUnit>(), Ok(WeightUnit::Kg));
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn activity_level_parses_wire_names() {
        assert_eq!("very_high".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryHigh));
        assert_eq!("very-high".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryHigh));
        assert_eq!(ActivityLevel::VeryHigh.to_string(), "very_high");
    }

    #[test]
    fn validation_accepts_complete_profile() {
        assert_eq!(buddy().validate(), Ok(()));
    }

    #[test]
    fn validation_names_the_failing_field() {
        let mut profile = buddy();
        profile.name = "  ".to_string();
        assert!(matches!(
            profile.validate(),
            Err(DomainError::InvariantViolation(ref message)) if message.contains("name")
        ));

        let mut profile = buddy();
        profile.weight_value = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(DomainError::InvariantViolation(ref message)) if message.contains("weight")
        ));

        let mut profile = buddy();
        profile.age = -0.5;
        assert!(matches!(
            profile.validate(),
            Err(DomainError::InvariantViolation(ref message)) if message.contains("age")
        ));
    }

    #[test]
    fn profile_deserializes_with_defaults_and_aliases() -> Result<(), serde_json::Error> {
        let profile: PetProfile = serde_json::from_str(
            r#"{"name":"Rex","breed":"Boxer","age":4,"weight":66,"weight_unit":"lbs"}"#,
        )?;

        assert_eq!(profile.weight_unit, WeightUnit::Lb);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert!(profile.health_conditions.is_empty());
        assert_eq!(profile.notes, None);
        Ok(())
    }

    #[test]
    fn notes_serialize_only_when_present() -> Result<(), serde_json::Error> {
        let plain = serde_json::to_value(buddy())?;
        assert!(plain.get("notes").is_none());

        let noted = buddy().with_notes("Picky in the mornings");
        assert_eq!(noted.notes.as_deref(), Some("Picky in the mornings"));
        assert_eq!(serde_json::to_value(&noted)?["notes"], "Picky in the mornings");
        Ok(())
    }
}
