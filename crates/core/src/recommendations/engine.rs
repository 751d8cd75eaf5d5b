//! Recommendation Engine implementation

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::domain::food::FoodProduct;
use crate::domain::profile::PetProfile;

use super::classify::ProfileFacts;
use super::diversity::apply_brand_diversity;
use super::explanation::add_detailed_explanations;
use super::relaxation::collect_with_relaxation;
use super::types::{Recommendation, RecommendationOptions};
use super::RecommendationResult;

/// Rank foods from a catalog for a pet profile
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Catalog,
}

impl RecommendationEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Score, relax, diversify, truncate and explain in one call
    pub fn generate(
        &self,
        profile: &PetProfile,
        options: &RecommendationOptions,
    ) -> RecommendationResult<Vec<Recommendation>> {
        generate_food_recommendations(profile, self.catalog.products(), options)
    }
}

/// Produce the final ordered recommendation list.
///
/// Fails only when the profile age is negative. An empty catalog, or one where
/// nothing clears even the loosest thresholds, yields an empty list.
pub fn generate_food_recommendations(
    profile: &PetProfile,
    products: &[FoodProduct],
    options: &RecommendationOptions,
) -> RecommendationResult<Vec<Recommendation>> {
    let facts = ProfileFacts::derive(profile)?;
    debug!(
        event_name = "recommend.profile.classified",
        pet = %profile.name,
        age_range = %facts.age_range,
        breed_size = %facts.breed_size,
        conditions = facts.conditions.len(),
        "classified pet profile"
    );

    let mut recommendations = collect_with_relaxation(&facts, products, options);
    let accepted = recommendations.len();

    if options.diversity_factor > 0.0 && recommendations.len() > options.min_recommendations {
        recommendations = apply_brand_diversity(recommendations, options.diversity_factor);
    }

    // Input arrives score-ordered; diversity picks which products survive the cut.
    recommendations.truncate(options.max_recommendations);
    recommendations.sort_by(|left, right| right.score.total_cmp(&left.score));

    if options.include_explanations {
        add_detailed_explanations(&mut recommendations, profile);
    }

    info!(
        event_name = "recommend.completed",
        pet = %profile.name,
        catalog_size = products.len(),
        accepted,
        returned = recommendations.len(),
        "generated food recommendations"
    );

    Ok(recommendations)
}
