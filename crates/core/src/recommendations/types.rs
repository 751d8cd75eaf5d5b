//! Types for the Recommendation Engine

use serde::{Deserialize, Serialize};

use crate::domain::food::FoodProduct;

use super::explanation::Explanation;
use super::relaxation::{RelaxationLevel, ScoreThresholds};

/// Options for a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOptions {
    /// Relaxation keeps widening until this many products are accepted (best effort)
    pub min_recommendations: usize,
    /// Hard cap on returned recommendations
    pub max_recommendations: usize,
    /// Brand diversity strength in [0, 1]
    pub diversity_factor: f64,
    /// Replace raw reasons with a formatted explanation
    pub include_explanations: bool,
    /// Start at relaxation level 1 instead of 0
    pub force_relaxation: bool,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            min_recommendations: super::DEFAULT_MIN_RECOMMENDATIONS,
            max_recommendations: super::DEFAULT_MAX_RECOMMENDATIONS,
            diversity_factor: super::DEFAULT_DIVERSITY_FACTOR,
            include_explanations: true,
            force_relaxation: false,
        }
    }
}

impl RecommendationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_recommendations(mut self, min: usize) -> Self {
        self.min_recommendations = min;
        self
    }

    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    /// Set diversity factor, clamped to [0, 1]
    pub fn with_diversity_factor(mut self, factor: f64) -> Self {
        self.diversity_factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    pub fn with_explanations(mut self, include: bool) -> Self {
        self.include_explanations = include;
        self
    }

    pub fn with_forced_relaxation(mut self, force: bool) -> Self {
        self.force_relaxation = force;
        self
    }
}

/// How well a product fits, relative to the thresholds of the pass that accepted it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Excellent,
    Good,
    Acceptable,
}

impl MatchQuality {
    /// Classify a score; `None` means the product is rejected at these thresholds
    pub fn from_score(score: f64, thresholds: &ScoreThresholds) -> Option<Self> {
        if score >= thresholds.excellent {
            Some(Self::Excellent)
        } else if score >= thresholds.good {
            Some(Self::Good)
        } else if score >= thresholds.acceptable {
            Some(Self::Acceptable)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
        }
    }

    /// Article-prefixed phrase used in headlines
    pub fn headline_phrase(&self) -> &'static str {
        match self {
            Self::Excellent => "an excellent match",
            Self::Good => "a good match",
            Self::Acceptable => "an acceptable match",
        }
    }
}

/// Score delta and reasons produced by a single rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub score: f64,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

impl RuleOutcome {
    pub fn starting_at(score: f64) -> Self {
        Self { score, reasons: Vec::new(), warnings: Vec::new() }
    }

    pub(crate) fn adjust(&mut self, delta: f64, reason: impl Into<String>) {
        self.score += delta;
        self.reasons.push(reason.into());
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// A scored product with its reasoning
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub product: FoodProduct,
    /// Unbounded; health boosts can push it past 100
    pub score: f64,
    pub match_quality: MatchQuality,
    /// Ordered, most relevant first
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Relaxation level of the pass that produced this recommendation
    pub relaxation_level: RelaxationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

impl Recommendation {
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    pub fn brand_id(&self) -> &str {
        &self.product.brand_id
    }
}
