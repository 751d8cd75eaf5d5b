use crate::domain::food::{AgeRange, BreedSize};
use crate::domain::profile::PetProfile;
use crate::errors::DomainError;

use super::health::HealthCondition;
use super::RecommendationResult;

const SMALL_BREED_MAX_KG: f64 = 10.0;
const MEDIUM_BREED_MAX_KG: f64 = 25.0;
const ADULT_FROM_YEARS: f64 = 1.0;
const SENIOR_FROM_YEARS: f64 = 7.0;

/// Size class from body weight: under 10kg small, under 25kg medium, otherwise large.
pub fn determine_breed_size(profile: &PetProfile) -> BreedSize {
    let weight_kg = profile.weight_kg();

    if weight_kg < SMALL_BREED_MAX_KG {
        BreedSize::Small
    } else if weight_kg < MEDIUM_BREED_MAX_KG {
        BreedSize::Medium
    } else {
        BreedSize::Large
    }
}

pub fn map_dog_age_to_age_range(age: f64) -> RecommendationResult<AgeRange> {
    if age < 0.0 || age.is_nan() {
        return Err(DomainError::negative_age());
    }

    Ok(if age < ADULT_FROM_YEARS {
        AgeRange::Puppy
    } else if age < SENIOR_FROM_YEARS {
        AgeRange::Adult
    } else {
        AgeRange::Senior
    })
}

/// Attributes derived once per profile and shared by every rule.
#[derive(Debug, Clone)]
pub struct ProfileFacts<'a> {
    pub profile: &'a PetProfile,
    pub age_range: AgeRange,
    pub breed_size: BreedSize,
    /// Recognised conditions, deduplicated, in profile order
    pub conditions: Vec<HealthCondition>,
}

impl<'a> ProfileFacts<'a> {
    pub fn derive(profile: &'a PetProfile) -> RecommendationResult<Self> {
        let age_range = map_dog_age_to_age_range(profile.age)?;
        let breed_size = determine_breed_size(profile);
        let conditions = recognised_conditions(profile);

        Ok(Self { profile, age_range, breed_size, conditions })
    }

    pub fn age(&self) -> f64 {
        self.profile.age
    }
}

/// Known conditions from the profile, deduplicated, in profile order.
pub(crate) fn recognised_conditions(profile: &PetProfile) -> Vec<HealthCondition> {
    let mut conditions: Vec<HealthCondition> = Vec::new();
    for raw in &profile.health_conditions {
        if let Some(condition) = HealthCondition::parse(raw) {
            if !conditions.contains(&condition) {
                conditions.push(condition);
            }
        }
    }
    conditions
}
