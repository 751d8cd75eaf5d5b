use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Args;
use kibble_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use kibble_core::{
    ActivityLevel, ApplicationError, Catalog, PetProfile, Recommendation, RecommendationEngine,
    WeightUnit,
};
use serde::Serialize;
use tracing::info;

use crate::commands::CommandResult;

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Read the pet profile from a JSON file instead of flags")]
    pub profile: Option<PathBuf>,
    #[arg(long, help = "Pet name")]
    pub name: Option<String>,
    #[arg(long, help = "Breed, free text")]
    pub breed: Option<String>,
    #[arg(long, help = "Age in years (fractions allowed)")]
    pub age: Option<f64>,
    #[arg(long, help = "Body weight, in --weight-unit")]
    pub weight: Option<f64>,
    #[arg(long, default_value = "kg", help = "kg | lb")]
    pub weight_unit: String,
    #[arg(long, default_value = "moderate", help = "low | moderate | high | very_high")]
    pub activity: String,
    #[arg(long = "condition", help = "Health condition id; repeat for several")]
    pub conditions: Vec<String>,
    #[arg(long, help = "Food catalog JSON file (defaults to the bundled sample)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Relax thresholds until this many foods qualify")]
    pub min: Option<usize>,
    #[arg(long, help = "Maximum number of foods returned; without --min it also caps the minimum")]
    pub max: Option<usize>,
    #[arg(long, help = "Brand diversity strength, 0.0 to 1.0")]
    pub diversity: Option<f64>,
    #[arg(long, help = "Return raw rule reasons instead of formatted explanations")]
    pub no_explanations: bool,
    #[arg(long, help = "Start from relaxed thresholds")]
    pub force_relaxation: bool,
}

#[derive(Debug, Serialize)]
struct RecommendPayload<'a> {
    pet: &'a PetProfile,
    recommendations: Vec<RecommendationView<'a>>,
}

#[derive(Debug, Serialize)]
struct RecommendationView<'a> {
    rank: usize,
    product_id: &'a str,
    product_name: &'a str,
    brand: &'a str,
    #[serde(flatten)]
    recommendation: &'a Recommendation,
}

pub fn run(args: &RecommendArgs, config_path: Option<&Path>) -> CommandResult {
    let overrides = ConfigOverrides {
        catalog_path: args.catalog.clone(),
        min_recommendations: args.min,
        max_recommendations: args.min.and(args.max),
        diversity_factor: args.diversity,
        include_explanations: args.no_explanations.then_some(false),
        ..ConfigOverrides::default()
    };
    let mut config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        overrides,
    }) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };
    if let (None, Some(max)) = (args.min, args.max) {
        cap_minimum(&mut config, max);
        if let Err(error) = config.validate() {
            return CommandResult::from_error(COMMAND, error);
        }
    }

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let profile = match build_profile(args) {
        Ok(profile) => profile,
        Err(error) => {
            return CommandResult::failure(COMMAND, "invalid_input", format!("{error:#}"), 4);
        }
    };
    if let Err(error) = profile.validate() {
        return CommandResult::from_error(COMMAND, error);
    }

    let options = config.recommendation_options().with_forced_relaxation(args.force_relaxation);
    let engine = RecommendationEngine::new(catalog);
    let recommendations = match engine.generate(&profile, &options) {
        Ok(recommendations) => recommendations,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    info!(
        event_name = "cli.recommend.completed",
        pet = %profile.name,
        returned = recommendations.len(),
        "recommend command finished"
    );

    let views = recommendations
        .iter()
        .enumerate()
        .map(|(index, recommendation)| RecommendationView {
            rank: index + 1,
            product_id: &recommendation.product.id,
            product_name: &recommendation.product.name,
            brand: engine
                .catalog()
                .brand(recommendation.brand_id())
                .map(|brand| brand.name.as_str())
                .unwrap_or_else(|| recommendation.brand_id()),
            recommendation,
        })
        .collect();

    let message = format!("{} recommendation(s) for {}", recommendations.len(), profile.name);
    CommandResult::success_with_data(
        COMMAND,
        message,
        RecommendPayload { pet: &profile, recommendations: views },
    )
}

/// A lone `--max` lowers the configured minimum instead of contradicting it.
fn cap_minimum(config: &mut AppConfig, max: usize) {
    let recommendation = &mut config.recommendation;
    recommendation.max_recommendations = max;
    recommendation.min_recommendations = recommendation.min_recommendations.min(max);
}

/// Catalog from the configured path, or the bundled sample.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<Catalog, ApplicationError> {
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::sample()?,
    };
    Ok(catalog)
}

fn build_profile(args: &RecommendArgs) -> anyhow::Result<PetProfile> {
    if let Some(path) = &args.profile {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read profile file `{}`", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("could not parse profile file `{}`", path.display()));
    }

    let name = args.name.clone().ok_or_else(|| anyhow!("--name is required without --profile"))?;
    let age = args.age.ok_or_else(|| anyhow!("--age is required without --profile"))?;
    let weight = args.weight.ok_or_else(|| anyhow!("--weight is required without --profile"))?;
    let weight_unit: WeightUnit = args.weight_unit.parse().context("invalid --weight-unit")?;
    let activity: ActivityLevel = args.activity.parse().context("invalid --activity")?;
    let breed = args.breed.clone().unwrap_or_else(|| "Mixed Breed".to_string());

    Ok(PetProfile::new(name, breed, age, weight, weight_unit)
        .with_activity_level(activity)
        .with_health_conditions(args.conditions.iter().cloned()))
}
