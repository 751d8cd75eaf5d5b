use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Args;
use kibble_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use kibble_core::{
    AgeRange, ApplicationError, BreedSize, Catalog, DietaryIndicator, FoodProduct,
    IngredientFilter, Nutrient,
};
use serde::Serialize;

use crate::commands::recommend::load_catalog;
use crate::commands::CommandResult;

const COMMAND: &str = "catalog";

/// Catalog query flags. Every filter given narrows the result further.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    #[arg(long, help = "Food catalog JSON file (defaults to the bundled sample)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Brand name, case-insensitive")]
    pub brand: Option<String>,
    #[arg(long, help = "puppy | adult | senior")]
    pub age_range: Option<String>,
    #[arg(long, help = "small | medium | large")]
    pub breed_size: Option<String>,
    #[arg(long = "indicator", help = "Dietary indicator; repeat for several")]
    pub indicators: Vec<String>,
    #[arg(long, help = "Ingredient name fragment")]
    pub ingredient: Option<String>,
    #[arg(long, requires = "ingredient", help = "Keep products without --ingredient instead")]
    pub exclude: bool,
    #[arg(long, help = "Nutrient to range-filter, e.g. protein or calories_per_cup")]
    pub nutrient: Option<String>,
    #[arg(long, requires = "nutrient", help = "Lower bound for --nutrient, inclusive")]
    pub min: Option<f64>,
    #[arg(long, requires = "nutrient", help = "Upper bound for --nutrient, inclusive")]
    pub max: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ProductSummary<'a> {
    id: &'a str,
    name: &'a str,
    brand: &'a str,
    suitable_ages: &'a [AgeRange],
    suitable_breed_sizes: &'a [BreedSize],
    dietary_indicators: &'a [DietaryIndicator],
    protein: f64,
    fat: f64,
    calories_per_cup: f64,
}

pub fn run(args: &CatalogArgs, config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        overrides: ConfigOverrides {
            catalog_path: args.catalog.clone(),
            ..ConfigOverrides::default()
        },
    }) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let products = match query(&catalog, args) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let summaries: Vec<ProductSummary<'_>> = products
        .iter()
        .map(|product| ProductSummary {
            id: &product.id,
            name: &product.name,
            brand: catalog
                .brand(&product.brand_id)
                .map(|brand| brand.name.as_str())
                .unwrap_or(product.brand_id.as_str()),
            suitable_ages: &product.suitable_ages,
            suitable_breed_sizes: &product.suitable_breed_sizes,
            dietary_indicators: &product.dietary_indicators,
            protein: product.nutritional_value.protein,
            fat: product.nutritional_value.fat,
            calories_per_cup: product.nutritional_value.calories_per_cup,
        })
        .collect();

    let message = format!("{} of {} product(s) matched", summaries.len(), catalog.len());
    CommandResult::success_with_data(COMMAND, message, summaries)
}

/// Intersection of every requested filter, in catalog order.
fn query<'a>(
    catalog: &'a Catalog,
    args: &CatalogArgs,
) -> Result<Vec<&'a FoodProduct>, ApplicationError> {
    let mut selections: Vec<Vec<&FoodProduct>> = Vec::new();

    if let Some(brand) = &args.brand {
        selections.push(catalog.foods_by_brand(brand)?);
    }
    if let Some(age_range) = &args.age_range {
        selections.push(catalog.foods_by_age_range(age_range.parse::<AgeRange>()?));
    }
    if let Some(breed_size) = &args.breed_size {
        selections.push(catalog.foods_by_breed_size(breed_size.parse::<BreedSize>()?));
    }
    for indicator in &args.indicators {
        selections.push(catalog.foods_by_dietary_indicator(indicator.parse::<DietaryIndicator>()?));
    }
    if let Some(ingredient) = &args.ingredient {
        let filter =
            if args.exclude { IngredientFilter::Exclude } else { IngredientFilter::Include };
        selections.push(catalog.foods_by_ingredient(ingredient, filter)?);
    }
    if let Some(nutrient) = &args.nutrient {
        let nutrient = nutrient.parse::<Nutrient>()?;
        selections.push(catalog.foods_by_nutritional_range(
            nutrient,
            args.min.unwrap_or(0.0),
            args.max.unwrap_or(f64::MAX),
        )?);
    }

    let allowed: Option<HashSet<&str>> = selections.into_iter().fold(None, |acc, selection| {
        let ids: HashSet<&str> = selection.iter().map(|product| product.id.as_str()).collect();
        Some(match acc {
            Some(acc) => acc.intersection(&ids).copied().collect(),
            None => ids,
        })
    });

    Ok(catalog
        .products()
        .iter()
        .filter(|product| allowed.as_ref().map_or(true, |ids| ids.contains(product.id.as_str())))
        .collect())
}
