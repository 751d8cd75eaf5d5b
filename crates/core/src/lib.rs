pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendations;

pub use catalog::{Catalog, CatalogError, IngredientFilter, Nutrient};
pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::food::{
    AgeRange, Brand, BreedSize, DietaryIndicator, FoodProduct, Ingredient, NutritionalValue,
};
pub use domain::profile::{ActivityLevel, PetProfile, WeightUnit};
pub use errors::{ApplicationError, DomainError};
pub use recommendations::{
    generate_food_recommendations, Explanation, HealthCondition, MatchQuality, Recommendation,
    RecommendationEngine, RecommendationOptions, RelaxationLevel,
};
