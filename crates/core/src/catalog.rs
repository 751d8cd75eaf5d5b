//! Food catalog: the read-only product database the engine scores against.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::food::{AgeRange, BreedSize, Brand, DietaryIndicator, FoodProduct};
use crate::errors::DomainError;
use crate::recommendations::map_dog_age_to_age_range;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id `{0}` in catalog")]
    DuplicateProduct(String),
    #[error("brand name cannot be empty")]
    EmptyBrandName,
    #[error("brand \"{0}\" not found")]
    BrandNotFound(String),
    #[error("ingredient name cannot be empty")]
    EmptyIngredient,
    #[error("nutritional values cannot be negative")]
    NegativeRange,
    #[error("minimum value cannot be greater than maximum value")]
    InvertedRange,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngredientFilter {
    Include,
    Exclude,
}

/// Numeric columns of the guaranteed analysis that can be range-filtered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nutrient {
    Protein,
    Fat,
    Fiber,
    Moisture,
    Carbohydrates,
    CaloriesPerCup,
}

impl Nutrient {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Fat => "fat",
            Self::Fiber => "fiber",
            Self::Moisture => "moisture",
            Self::Carbohydrates => "carbohydrates",
            Self::CaloriesPerCup => "calories_per_cup",
        }
    }

    fn value_of(&self, product: &FoodProduct) -> f64 {
        let nutrition = &product.nutritional_value;
        match self {
            Self::Protein => nutrition.protein,
            Self::Fat => nutrition.fat,
            Self::Fiber => nutrition.fiber,
            Self::Moisture => nutrition.moisture,
            Self::Carbohydrates => nutrition.carbohydrates,
            Self::CaloriesPerCup => nutrition.calories_per_cup,
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "protein" => Ok(Self::Protein),
            "fat" => Ok(Self::Fat),
            "fiber" | "fibre" => Ok(Self::Fiber),
            "moisture" => Ok(Self::Moisture),
            "carbohydrates" | "carbs" => Ok(Self::Carbohydrates),
            "calories_per_cup" | "calories" => Ok(Self::CaloriesPerCup),
            other => Err(DomainError::InvalidInput(format!("invalid nutrient: {other}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    brands: Vec<Brand>,
    products: Vec<FoodProduct>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    brands: Vec<Brand>,
    products: Vec<FoodProduct>,
}

impl Catalog {
    pub fn new(brands: Vec<Brand>, products: Vec<FoodProduct>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        if !brands.is_empty() {
            let brand_ids: HashSet<&str> = brands.iter().map(|brand| brand.id.as_str()).collect();
            for product in &products {
                if !brand_ids.contains(product.brand_id.as_str()) {
                    warn!(
                        event_name = "catalog.product.unknown_brand",
                        product_id = %product.id,
                        brand_id = %product.brand_id,
                        "catalog product references a brand that is not listed"
                    );
                }
            }
        }

        Ok(Self { brands, products })
    }

    pub fn from_products(products: Vec<FoodProduct>) -> Result<Self, CatalogError> {
        Self::new(Vec::new(), products)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(document.brands, document.products)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    /// The catalog bundled with the crate.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_CATALOG)
    }

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn products(&self) -> &[FoodProduct] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &str) -> Option<&FoodProduct> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn brand(&self, brand_id: &str) -> Option<&Brand> {
        self.brands.iter().find(|brand| brand.id == brand_id)
    }

    pub fn foods_by_brand(&self, brand_name: &str) -> Result<Vec<&FoodProduct>, CatalogError> {
        let brand_name = brand_name.trim();
        if brand_name.is_empty() {
            return Err(CatalogError::EmptyBrandName);
        }

        let brand = self
            .brands
            .iter()
            .find(|brand| brand.name.eq_ignore_ascii_case(brand_name))
            .ok_or_else(|| CatalogError::BrandNotFound(brand_name.to_owned()))?;

        Ok(self.products.iter().filter(|product| product.brand_id == brand.id).collect())
    }

    pub fn foods_by_age_range(&self, age_range: AgeRange) -> Vec<&FoodProduct> {
        self.products.iter().filter(|product| product.suitable_ages.contains(&age_range)).collect()
    }

    pub fn foods_by_breed_size(&self, breed_size: BreedSize) -> Vec<&FoodProduct> {
        self.products
            .iter()
            .filter(|product| product.suitable_breed_sizes.contains(&breed_size))
            .collect()
    }

    pub fn foods_by_dietary_indicator(&self, indicator: DietaryIndicator) -> Vec<&FoodProduct> {
        self.products.iter().filter(|product| product.has_indicator(indicator)).collect()
    }

    pub fn foods_by_ingredient(
        &self,
        ingredient: &str,
        filter: IngredientFilter,
    ) -> Result<Vec<&FoodProduct>, CatalogError> {
        let needle = ingredient.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CatalogError::EmptyIngredient);
        }

        let keywords = [needle.as_str()];
        Ok(self
            .products
            .iter()
            .filter(|product| {
                let contains = product.ingredients_mention(&keywords);
                match filter {
                    IngredientFilter::Include => contains,
                    IngredientFilter::Exclude => !contains,
                }
            })
            .collect())
    }

    pub fn foods_by_nutritional_range(
        &self,
        nutrient: Nutrient,
        min: f64,
        max: f64,
    ) -> Result<Vec<&FoodProduct>, CatalogError> {
        if min < 0.0 || max < 0.0 {
            return Err(CatalogError::NegativeRange);
        }
        if min > max {
            return Err(CatalogError::InvertedRange);
        }

        Ok(self
            .products
            .iter()
            .filter(|product| {
                let value = nutrient.value_of(product);
                value >= min && value <= max
            })
            .collect())
    }

    /// Products suitable for the dog's life stage and size that carry every requested indicator.
    pub fn recommended_foods(
        &self,
        age: f64,
        breed_size: BreedSize,
        indicators: &[DietaryIndicator],
    ) -> Result<Vec<&FoodProduct>, CatalogError> {
        let age_range = map_dog_age_to_age_range(age)?;

        Ok(self
            .products
            .iter()
            .filter(|product| {
                product.suitable_ages.contains(&age_range)
                    && product.suitable_breed_sizes.contains(&breed_size)
                    && indicators.iter().all(|indicator| product.has_indicator(*indicator))
            })
            .collect())
    }
}
