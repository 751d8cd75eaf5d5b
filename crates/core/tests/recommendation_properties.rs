use std::collections::HashSet;

use kibble_core::recommendations::{
    calculate_base_score, determine_breed_size, generate_food_recommendations,
    map_dog_age_to_age_range, score_catalog, RecommendationOptions, RelaxationLevel,
};
use kibble_core::{
    ActivityLevel, AgeRange, BreedSize, Catalog, DomainError, FoodProduct, Ingredient,
    MatchQuality, NutritionalValue, PetProfile, WeightUnit,
};

type PropertyTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

fn sample_products() -> PropertyTestResult<Vec<FoodProduct>> {
    Catalog::sample()
        .map(|catalog| catalog.products().to_vec())
        .map_err(|err| format!("sample catalog should load: {err}"))
}

fn adult_medium_food(id: &str, brand_id: &str) -> FoodProduct {
    FoodProduct {
        id: id.to_string(),
        name: format!("Food {id}"),
        brand_id: brand_id.to_string(),
        nutritional_value: NutritionalValue {
            protein: 24.0,
            fat: 14.0,
            fiber: 4.0,
            moisture: 10.0,
            carbohydrates: 42.0,
            calories_per_cup: 360.0,
            ..NutritionalValue::default()
        },
        suitable_ages: vec![AgeRange::Adult],
        suitable_breed_sizes: vec![BreedSize::Medium],
        dietary_indicators: Vec::new(),
        special_features: Vec::new(),
        special_formulations: Vec::new(),
        ingredients: Vec::new(),
    }
}

fn beagle() -> PetProfile {
    PetProfile::new("Daisy", "Beagle", 3.0, 12.0, WeightUnit::Kg)
        .with_activity_level(ActivityLevel::Moderate)
}

fn raw_options() -> RecommendationOptions {
    RecommendationOptions::new().with_explanations(false)
}

fn varied_profiles() -> Vec<PetProfile> {
    vec![
        beagle(),
        PetProfile::new("Pip", "Chihuahua", 0.4, 2.5, WeightUnit::Kg),
        PetProfile::new("Moose", "Great Dane", 1.5, 140.0, WeightUnit::Lb)
            .with_activity_level(ActivityLevel::High),
        PetProfile::new("Grandpa", "Labrador", 11.0, 31.0, WeightUnit::Kg)
            .with_activity_level(ActivityLevel::Low)
            .with_health_conditions(["arthritis", "obesity"]),
        PetProfile::new("Scout", "Border Collie", 4.0, 19.0, WeightUnit::Kg)
            .with_activity_level(ActivityLevel::VeryHigh)
            .with_health_conditions(["allergies", "skin_conditions"]),
    ]
}

#[test]
fn classifier_boundaries_belong_to_the_larger_class() -> PropertyTestResult {
    let at = |kg: f64| PetProfile::new("Test", "Mixed", 3.0, kg, WeightUnit::Kg);

    require_eq!(determine_breed_size(&at(10.0)), BreedSize::Medium);
    require_eq!(determine_breed_size(&at(25.0)), BreedSize::Large);
    require_eq!(map_dog_age_to_age_range(1.0), Ok::<AgeRange, DomainError>(AgeRange::Adult));
    require_eq!(map_dog_age_to_age_range(7.0), Ok::<AgeRange, DomainError>(AgeRange::Senior));
    Ok(())
}

#[test]
fn negative_age_is_rejected_on_every_path() -> PropertyTestResult {
    let ghost = PetProfile::new("Ghost", "Husky", -1.0, 20.0, WeightUnit::Kg);
    let product = adult_medium_food("f1", "b1");

    require_eq!(map_dog_age_to_age_range(-1.0), Err::<AgeRange, DomainError>(DomainError::negative_age()));
    require_eq!(calculate_base_score(&ghost, &product), Err::<f64, DomainError>(DomainError::negative_age()));
    require_eq!(
        generate_food_recommendations(&ghost, &[product.clone()], &raw_options()).err(),
        Some(DomainError::negative_age())
    );
    Ok(())
}

#[test]
fn pounds_classify_like_the_equivalent_kilograms() -> PropertyTestResult {
    let from_json: PetProfile = serde_json::from_str(
        r#"{"name": "Biscuit", "breed": "Pug", "age": 2, "weight": 15, "weight_unit": "lbs"}"#,
    )
    .map_err(|err| format!("profile json should parse: {err}"))?;
    let in_kg = PetProfile::new("Biscuit", "Pug", 2.0, 6.8, WeightUnit::Kg);

    require_eq!(determine_breed_size(&from_json), BreedSize::Small);
    require_eq!(determine_breed_size(&from_json), determine_breed_size(&in_kg));
    Ok(())
}

#[test]
fn each_relaxation_level_accepts_a_superset_of_the_last() -> PropertyTestResult {
    let products = sample_products()?;

    for profile in varied_profiles() {
        let mut previous: HashSet<String> = HashSet::new();
        let mut level = RelaxationLevel::STRICT;
        loop {
            let accepted: HashSet<String> = score_catalog(&profile, &products, level)
                .map_err(|err| err.to_string())?
                .into_iter()
                .map(|rec| rec.product.id)
                .collect();
            require!(
                accepted.is_superset(&previous),
                "{} lost products at level {level}",
                profile.name
            );
            previous = accepted;
            match level.next() {
                Some(next) => level = next,
                None => break,
            }
        }
    }
    Ok(())
}

#[test]
fn final_results_are_score_ordered_after_diversity() -> PropertyTestResult {
    let products = sample_products()?;

    for profile in varied_profiles() {
        for factor in [0.0, 0.8, 1.0] {
            let options = raw_options().with_diversity_factor(factor).with_max_recommendations(6);
            let results = generate_food_recommendations(&profile, &products, &options)
                .map_err(|err| err.to_string())?;
            require!(results.len() <= 6, "{} got {} results", profile.name, results.len());
            require!(
                results.windows(2).all(|pair| pair[0].score >= pair[1].score),
                "{} results out of order at diversity {factor}",
                profile.name
            );
        }
    }
    Ok(())
}

#[test]
fn full_diversity_surfaces_more_brands_in_the_top_slots() -> PropertyTestResult {
    let mut products: Vec<FoodProduct> =
        (1..=5).map(|index| adult_medium_food(&format!("a{index}"), "dominant")).collect();
    products.push(adult_medium_food("b1", "challenger"));
    products.push(adult_medium_food("b2", "challenger"));

    let distinct_brands = |factor: f64| -> PropertyTestResult<usize> {
        let options = raw_options()
            .with_min_recommendations(1)
            .with_max_recommendations(3)
            .with_diversity_factor(factor);
        let results = generate_food_recommendations(&beagle(), &products, &options)
            .map_err(|err| err.to_string())?;
        Ok(results.iter().map(|rec| rec.brand_id().to_string()).collect::<HashSet<_>>().len())
    };

    let without = distinct_brands(0.0)?;
    let with = distinct_brands(1.0)?;
    require_eq!(without, 1);
    require!(with > without, "diversity should add brands ({with} vs {without})");
    Ok(())
}

#[test]
fn relaxed_pass_winner_survives_the_cut() -> PropertyTestResult {
    let profile = beagle().with_health_conditions(["obesity", "diabetes"]);
    let strict = adult_medium_food("strict", "b1");
    let mut relaxed = adult_medium_food("relaxed", "b2");
    relaxed.suitable_ages = vec![AgeRange::Puppy];
    relaxed.suitable_breed_sizes = vec![BreedSize::Small];
    relaxed.special_formulations = vec!["Obesity".to_string(), "Diabetes".to_string()];
    let products = vec![strict, relaxed];

    for factor in [0.0, 0.8] {
        let options = raw_options()
            .with_min_recommendations(3)
            .with_max_recommendations(1)
            .with_diversity_factor(factor);
        let results = generate_food_recommendations(&profile, &products, &options)
            .map_err(|err| err.to_string())?;
        let top = results.first().ok_or("expected one recommendation")?;

        require_eq!(results.len(), 1);
        require_eq!(top.product_id(), "relaxed");
        require!(top.relaxation_level.is_relaxed());
    }
    Ok(())
}

#[test]
fn highest_score_leads_and_survives_a_single_slot() -> PropertyTestResult {
    let products = sample_products()?;

    for profile in varied_profiles() {
        for factor in [0.0, 0.8, 1.0] {
            let everything = raw_options()
                .with_max_recommendations(products.len())
                .with_diversity_factor(factor);
            let full = generate_food_recommendations(&profile, &products, &everything)
                .map_err(|err| err.to_string())?;
            let Some(leader) = full.first() else {
                continue;
            };
            let best = full.iter().map(|rec| rec.score).fold(f64::NEG_INFINITY, f64::max);
            require!(leader.score == best, "{} leader is not the best score", profile.name);

            let single = generate_food_recommendations(
                &profile,
                &products,
                &everything.clone().with_max_recommendations(1),
            )
            .map_err(|err| err.to_string())?;
            require_eq!(single.len(), 1);
            require_eq!(single[0].product_id(), leader.product_id());
        }
    }
    Ok(())
}

#[test]
fn addressing_two_conditions_beats_one_by_more_than_a_single_increment() -> PropertyTestResult {
    let profile = beagle().with_health_conditions(["obesity", "diabetes", "allergies"]);
    let mut double = adult_medium_food("double", "b1");
    double.special_formulations = vec!["Obesity".to_string(), "Diabetes".to_string()];
    let mut single = adult_medium_food("single", "b1");
    single.special_formulations = vec!["Obesity".to_string()];

    let scored = score_catalog(&profile, &[double, single], RelaxationLevel::MAX)
        .map_err(|err| err.to_string())?;
    let score_of = |id: &str| {
        scored
            .iter()
            .find(|rec| rec.product_id() == id)
            .map(|rec| rec.score)
            .ok_or_else(|| format!("{id} should be accepted"))
    };

    let gap = score_of("double")? - score_of("single")?;
    require!(gap > 30.0, "gap {gap} should exceed one formulation match");
    Ok(())
}

#[test]
fn allergens_cost_points_and_raise_a_warning() -> PropertyTestResult {
    let profile = beagle().with_health_conditions(["allergies"]);
    let clean = adult_medium_food("clean", "b1");
    let mut corny = adult_medium_food("corny", "b1");
    corny.ingredients = vec![Ingredient { name: "Corn".to_string(), potential_allergen: true }];

    let scored = score_catalog(&profile, &[clean, corny], RelaxationLevel::STRICT)
        .map_err(|err| err.to_string())?;
    let clean = scored.iter().find(|rec| rec.product_id() == "clean").ok_or("clean missing")?;
    let corny = scored.iter().find(|rec| rec.product_id() == "corny").ok_or("corny missing")?;

    require!(corny.score < clean.score);
    require!(clean.warnings.is_empty());
    require!(corny.warnings.iter().any(|warning| warning.contains("problematic")));
    Ok(())
}

#[test]
fn beagle_with_exact_match_scores_excellent() -> PropertyTestResult {
    let products = vec![adult_medium_food("exact", "b1")];

    let results = generate_food_recommendations(&beagle(), &products, &raw_options())
        .map_err(|err| err.to_string())?;
    let top = results.first().ok_or("expected one recommendation")?;

    require!(top.score >= 80.0, "score {} should be at least 80", top.score);
    require_eq!(top.match_quality, MatchQuality::Excellent);
    require!(top.reasons.iter().any(|reason| reason == "Specifically formulated for adult dogs"));
    require!(top
        .reasons
        .iter()
        .any(|reason| reason == "Specifically formulated for medium breed size"));
    Ok(())
}

#[test]
fn forced_relaxation_fills_the_minimum_for_an_extreme_profile() -> PropertyTestResult {
    let products = sample_products()?;
    require!(products.len() >= 5);
    let extreme = PetProfile::new("Titan", "Mastiff", 0.2, 80.0, WeightUnit::Kg)
        .with_activity_level(ActivityLevel::VeryHigh)
        .with_health_conditions([
            "allergies",
            "obesity",
            "joint_issues",
            "diabetes",
            "kidney_disease",
        ]);
    let options = raw_options().with_min_recommendations(5).with_forced_relaxation(true);

    let results = generate_food_recommendations(&extreme, &products, &options)
        .map_err(|err| err.to_string())?;
    require!(results.len() >= 5, "only {} recommendations", results.len());
    require!(results.iter().any(|rec| rec.reasons.iter().any(|reason| {
        let reason = reason.to_lowercase();
        reason.contains("relaxed") || reason.contains("fallback") || reason.contains("flexible")
    })));
    Ok(())
}

#[test]
fn explained_results_keep_the_disclosure_line() -> PropertyTestResult {
    let products = sample_products()?;
    let options = RecommendationOptions::new().with_forced_relaxation(true);

    let results = generate_food_recommendations(&beagle(), &products, &options)
        .map_err(|err| err.to_string())?;
    let first = results.first().ok_or("expected recommendations")?;
    require!(first.reasons.get(1).is_some_and(|line| line.contains("relaxed")));
    require!(first.explanation.as_ref().is_some_and(|explanation| explanation.relaxation_note.is_some()));
    Ok(())
}
