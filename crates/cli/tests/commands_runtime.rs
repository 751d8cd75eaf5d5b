use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use kibble_cli::commands::catalog::{self, CatalogArgs};
use kibble_cli::commands::config;
use kibble_cli::commands::recommend::{self, RecommendArgs};
use serde_json::Value;
use tempfile::TempDir;

fn beagle_args() -> RecommendArgs {
    RecommendArgs {
        name: Some("Daisy".to_string()),
        breed: Some("Beagle".to_string()),
        age: Some(3.0),
        weight: Some(12.0),
        weight_unit: "kg".to_string(),
        activity: "moderate".to_string(),
        ..RecommendArgs::default()
    }
}

#[test]
fn recommend_returns_ranked_foods_for_flag_profile() {
    with_env(&[], || {
        let result = recommend::run(&beagle_args(), None);
        assert_eq!(result.exit_code, 0, "expected successful recommendation run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["pet"]["name"], "Daisy");

        let recommendations =
            payload["data"]["recommendations"].as_array().cloned().unwrap_or_default();
        assert!(!recommendations.is_empty());
        assert!(recommendations.len() <= 10);
        assert_eq!(recommendations[0]["rank"], 1);

        let scores: Vec<f64> =
            recommendations.iter().filter_map(|rec| rec["score"].as_f64()).collect();
        assert_eq!(scores.len(), recommendations.len());
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(recommendations[0]["explanation"]["headline"].is_string());
    });
}

#[test]
fn recommend_honours_max_and_raw_reasons_from_env() {
    with_env(
        &[
            ("KIBBLE_RECOMMENDATION_MIN", "1"),
            ("KIBBLE_RECOMMENDATION_MAX", "2"),
            ("KIBBLE_RECOMMENDATION_INCLUDE_EXPLANATIONS", "false"),
        ],
        || {
            let result = recommend::run(&beagle_args(), None);
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            let recommendations =
                payload["data"]["recommendations"].as_array().cloned().unwrap_or_default();
            assert_eq!(recommendations.len(), 2);
            assert!(recommendations.iter().all(|rec| rec.get("explanation").is_none()));
        },
    );
}

#[test]
fn recommend_accepts_max_below_the_default_minimum() {
    with_env(&[], || {
        let args = RecommendArgs { max: Some(2), ..beagle_args() };
        let result = recommend::run(&args, None);
        assert_eq!(result.exit_code, 0, "a lone --max should not trip config validation");

        let payload = parse_payload(&result.output);
        let recommendations =
            payload["data"]["recommendations"].as_array().cloned().unwrap_or_default();
        assert_eq!(recommendations.len(), 2);
    });
}

#[test]
fn recommend_still_rejects_explicit_min_above_max() {
    with_env(&[], || {
        let args = RecommendArgs { min: Some(5), max: Some(2), ..beagle_args() };
        let result = recommend::run(&args, None);
        assert_eq!(result.exit_code, 2);
    });
}

#[test]
fn recommend_reads_profile_file_in_pounds() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("biscuit.json");
        fs::write(
            &path,
            r#"{"name": "Biscuit", "breed": "Pug", "age": 2, "weight": 15, "weight_unit": "lbs"}"#,
        )
        .expect("write profile");

        let args = RecommendArgs { profile: Some(path), ..RecommendArgs::default() };
        let result = recommend::run(&args, None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["pet"]["weight_unit"], "lb");
    });
}

#[test]
fn recommend_rejects_negative_age_with_input_exit_code() {
    with_env(&[], || {
        let args = RecommendArgs { age: Some(-1.0), ..beagle_args() };
        let result = recommend::run(&args, None);
        assert_eq!(result.exit_code, 4, "expected profile input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
    });
}

#[test]
fn recommend_reports_unreadable_profile_file() {
    with_env(&[], || {
        let args = RecommendArgs {
            profile: Some(PathBuf::from("/definitely/not/here/profile.json")),
            ..RecommendArgs::default()
        };
        let result = recommend::run(&args, None);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("could not read profile file"));
    });
}

#[test]
fn recommend_returns_config_failure_for_bad_env() {
    with_env(&[("KIBBLE_RECOMMENDATION_DIVERSITY_FACTOR", "lots")], || {
        let result = recommend::run(&beagle_args(), None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_returns_config_failure_for_missing_explicit_file() {
    with_env(&[], || {
        let missing = PathBuf::from("/definitely/not/here/kibble.toml");
        let result = recommend::run(&beagle_args(), Some(missing.as_path()));
        assert_eq!(result.exit_code, 2);
    });
}

#[test]
fn recommend_returns_catalog_failure_for_missing_catalog() {
    with_env(&[("KIBBLE_CATALOG_PATH", "/definitely/not/here/catalog.json")], || {
        let result = recommend::run(&beagle_args(), None);
        assert_eq!(result.exit_code, 3, "expected catalog failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog");
    });
}

#[test]
fn catalog_lists_products_for_a_brand() {
    with_env(&[], || {
        let args = CatalogArgs { brand: Some("wild trail".to_string()), ..CatalogArgs::default() };
        let result = catalog::run(&args, None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "catalog");
        let products = payload["data"].as_array().cloned().unwrap_or_default();
        assert!(!products.is_empty());
        assert!(products.iter().all(|product| product["brand"] == "Wild Trail"));
    });
}

#[test]
fn catalog_rejects_unknown_breed_size() {
    with_env(&[], || {
        let args =
            CatalogArgs { breed_size: Some("enormous".to_string()), ..CatalogArgs::default() };
        let result = catalog::run(&args, None);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("invalid breed size: enormous"));
    });
}

#[test]
fn catalog_rejects_inverted_nutrient_range() {
    with_env(&[], || {
        let args = CatalogArgs {
            nutrient: Some("protein".to_string()),
            min: Some(30.0),
            max: Some(10.0),
            ..CatalogArgs::default()
        };
        let result = catalog::run(&args, None);
        assert_eq!(result.exit_code, 3);
    });
}

#[test]
fn config_attributes_env_and_file_sources() {
    with_env(&[("KIBBLE_RECOMMENDATION_MAX", "4")], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("kibble.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").expect("write config");

        let result = config::run(Some(path.as_path()));
        assert_eq!(result.exit_code, 0);

        let output = result.output;
        assert!(output.contains(
            "- recommendation.max_recommendations = 4 (source: env (KIBBLE_RECOMMENDATION_MAX))"
        ));
        assert!(output.contains(&format!(
            "- logging.level = debug (source: file ({}))",
            path.display()
        )));
        assert!(output.contains("- recommendation.min_recommendations = 3 (source: default)"));
        assert!(output.contains("- catalog.path = <bundled sample> (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("KIBBLE_RECOMMENDATION_MIN", "9"), ("KIBBLE_RECOMMENDATION_MAX", "2")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "KIBBLE_RECOMMENDATION_MIN",
        "KIBBLE_RECOMMENDATION_MAX",
        "KIBBLE_RECOMMENDATION_DIVERSITY_FACTOR",
        "KIBBLE_RECOMMENDATION_INCLUDE_EXPLANATIONS",
        "KIBBLE_CATALOG_PATH",
        "KIBBLE_LOGGING_LEVEL",
        "KIBBLE_LOGGING_FORMAT",
        "KIBBLE_LOG_LEVEL",
        "KIBBLE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
