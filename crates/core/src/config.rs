use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendations::{
    RecommendationOptions, DEFAULT_DIVERSITY_FACTOR, DEFAULT_MAX_RECOMMENDATIONS,
    DEFAULT_MIN_RECOMMENDATIONS,
};

pub const DEFAULT_CONFIG_FILE: &str = "kibble.toml";
pub const NESTED_CONFIG_FILE: &str = "config/kibble.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub recommendation: RecommendationConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationConfig {
    pub min_recommendations: usize,
    pub max_recommendations: usize,
    pub diversity_factor: f64,
    pub include_explanations: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// `None` means the bundled sample catalog.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub min_recommendations: Option<usize>,
    pub max_recommendations: Option<usize>,
    pub diversity_factor: Option<f64>,
    pub include_explanations: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recommendation: RecommendationConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_recommendations: DEFAULT_MIN_RECOMMENDATIONS,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            diversity_factor: DEFAULT_DIVERSITY_FACTOR,
            include_explanations: true,
        }
    }
}

impl From<&RecommendationConfig> for RecommendationOptions {
    fn from(config: &RecommendationConfig) -> Self {
        RecommendationOptions::new()
            .with_min_recommendations(config.min_recommendations)
            .with_max_recommendations(config.max_recommendations)
            .with_diversity_factor(config.diversity_factor)
            .with_explanations(config.include_explanations)
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn recommendation_options(&self) -> RecommendationOptions {
        RecommendationOptions::from(&self.recommendation)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(recommendation) = patch.recommendation {
            if let Some(min) = recommendation.min_recommendations {
                self.recommendation.min_recommendations = min;
            }
            if let Some(max) = recommendation.max_recommendations {
                self.recommendation.max_recommendations = max;
            }
            if let Some(diversity_factor) = recommendation.diversity_factor {
                self.recommendation.diversity_factor = diversity_factor;
            }
            if let Some(include_explanations) = recommendation.include_explanations {
                self.recommendation.include_explanations = include_explanations;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("KIBBLE_RECOMMENDATION_MIN") {
            self.recommendation.min_recommendations =
                parse_usize("KIBBLE_RECOMMENDATION_MIN", &value)?;
        }
        if let Some(value) = read_env("KIBBLE_RECOMMENDATION_MAX") {
            self.recommendation.max_recommendations =
                parse_usize("KIBBLE_RECOMMENDATION_MAX", &value)?;
        }
        if let Some(value) = read_env("KIBBLE_RECOMMENDATION_DIVERSITY_FACTOR") {
            self.recommendation.diversity_factor =
                parse_f64("KIBBLE_RECOMMENDATION_DIVERSITY_FACTOR", &value)?;
        }
        if let Some(value) = read_env("KIBBLE_RECOMMENDATION_INCLUDE_EXPLANATIONS") {
            self.recommendation.include_explanations =
                parse_bool("KIBBLE_RECOMMENDATION_INCLUDE_EXPLANATIONS", &value)?;
        }

        if let Some(value) = read_env("KIBBLE_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        let log_level = read_env("KIBBLE_LOGGING_LEVEL").or_else(|| read_env("KIBBLE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("KIBBLE_LOGGING_FORMAT").or_else(|| read_env("KIBBLE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(min) = overrides.min_recommendations {
            self.recommendation.min_recommendations = min;
        }
        if let Some(max) = overrides.max_recommendations {
            self.recommendation.max_recommendations = max;
        }
        if let Some(diversity_factor) = overrides.diversity_factor {
            self.recommendation.diversity_factor = diversity_factor;
        }
        if let Some(include_explanations) = overrides.include_explanations {
            self.recommendation.include_explanations = include_explanations;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_recommendation(&self.recommendation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that `load` would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    if recommendation.max_recommendations == 0 {
        return Err(ConfigError::Validation(
            "recommendation.max_recommendations must be greater than zero".to_string(),
        ));
    }

    if recommendation.min_recommendations > recommendation.max_recommendations {
        return Err(ConfigError::Validation(format!(
            "recommendation.min_recommendations ({}) must not exceed max_recommendations ({})",
            recommendation.min_recommendations, recommendation.max_recommendations
        )));
    }

    let factor = recommendation.diversity_factor;
    if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
        return Err(ConfigError::Validation(
            "recommendation.diversity_factor must be in range 0.0..=1.0".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| invalid_override(key, value))
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    recommendation: Option<RecommendationPatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    min_recommendations: Option<usize>,
    max_recommendations: Option<usize>,
    diversity_factor: Option<f64>,
    include_explanations: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
