use std::env;
use std::fs;
use std::path::Path;

use kibble_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", error),
    };

    let config_file_path = resolve_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let recommendation = &config.recommendation;
    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<bundled sample>".to_string());

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "recommendation.min_recommendations",
            &recommendation.min_recommendations.to_string(),
            source("recommendation.min_recommendations", &["KIBBLE_RECOMMENDATION_MIN"]),
        ),
        render_line(
            "recommendation.max_recommendations",
            &recommendation.max_recommendations.to_string(),
            source("recommendation.max_recommendations", &["KIBBLE_RECOMMENDATION_MAX"]),
        ),
        render_line(
            "recommendation.diversity_factor",
            &recommendation.diversity_factor.to_string(),
            source(
                "recommendation.diversity_factor",
                &["KIBBLE_RECOMMENDATION_DIVERSITY_FACTOR"],
            ),
        ),
        render_line(
            "recommendation.include_explanations",
            &recommendation.include_explanations.to_string(),
            source(
                "recommendation.include_explanations",
                &["KIBBLE_RECOMMENDATION_INCLUDE_EXPLANATIONS"],
            ),
        ),
        render_line("catalog.path", &catalog_path, source("catalog.path", &["KIBBLE_CATALOG_PATH"])),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["KIBBLE_LOGGING_LEVEL", "KIBBLE_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            config.logging.format.as_str(),
            source("logging.format", &["KIBBLE_LOGGING_FORMAT", "KIBBLE_LOG_FORMAT"]),
        ),
    ];

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
