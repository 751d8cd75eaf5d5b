//! Scoring passes at progressively looser acceptance thresholds

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::domain::food::FoodProduct;
use crate::domain::profile::PetProfile;

use super::classify::ProfileFacts;
use super::health::apply_health_condition_rules;
use super::scoring::{
    apply_activity_level_rule, apply_age_rule, apply_breed_size_rule, base_score_with_reasons,
};
use super::types::{MatchQuality, Recommendation, RecommendationOptions, RuleOutcome};
use super::{RecommendationResult, MIN_BASE_SCORE};

/// Minimum scores for each match quality at a given relaxation level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreThresholds {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
}

const THRESHOLDS: [ScoreThresholds; 4] = [
    ScoreThresholds { excellent: 80.0, good: 60.0, acceptable: 40.0 },
    ScoreThresholds { excellent: 75.0, good: 55.0, acceptable: 35.0 },
    ScoreThresholds { excellent: 70.0, good: 50.0, acceptable: 25.0 },
    ScoreThresholds { excellent: 65.0, good: 45.0, acceptable: 20.0 },
];

const DISCLOSURES: [&str; 3] = [
    "Some criteria were relaxed to provide this recommendation.",
    "This is a fallback recommendation with relaxed matching criteria.",
    "This recommendation uses more flexible criteria to provide options.",
];

/// Words that mark a reason as a relaxation disclosure.
pub(crate) const DISCLOSURE_MARKERS: [&str; 3] = ["relaxed", "fallback", "flexible"];

pub(crate) fn is_disclosure(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    DISCLOSURE_MARKERS.iter().any(|marker| reason.contains(marker))
}

/// How far acceptance thresholds have been loosened, 0 (strict) through 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelaxationLevel(u8);

impl RelaxationLevel {
    pub const STRICT: Self = Self(0);
    pub const MAX: Self = Self(3);

    /// Levels above the maximum are clamped.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn next(&self) -> Option<Self> {
        (*self < Self::MAX).then(|| Self(self.0 + 1))
    }

    pub fn is_relaxed(&self) -> bool {
        self.0 > 0
    }

    pub fn thresholds(&self) -> ScoreThresholds {
        THRESHOLDS[usize::from(self.0)]
    }

    /// Products with a weak base score are only considered from level 2 on.
    pub fn admits_weak_base(&self) -> bool {
        self.0 >= 2
    }

    /// Reason appended to every recommendation produced at this level.
    pub fn disclosure(&self) -> Option<&'static str> {
        self.0.checked_sub(1).map(|index| DISCLOSURES[usize::from(index)])
    }
}

impl fmt::Display for RelaxationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run every rule over one product. Returns `None` when the base fit is too weak
/// for this level.
fn score_product(
    facts: &ProfileFacts<'_>,
    product: &FoodProduct,
    level: RelaxationLevel,
) -> Option<RuleOutcome> {
    let mut outcome = base_score_with_reasons(facts, product);
    if outcome.score < MIN_BASE_SCORE && !level.admits_weak_base() {
        return None;
    }

    let rules: [fn(&ProfileFacts<'_>, &FoodProduct, f64) -> RuleOutcome; 4] = [
        apply_age_rule,
        apply_breed_size_rule,
        apply_activity_level_rule,
        apply_health_condition_rules,
    ];
    for rule in rules {
        let step = rule(facts, product, outcome.score);
        outcome.score = step.score;
        outcome.reasons.extend(step.reasons);
        outcome.warnings.extend(step.warnings);
    }

    Some(outcome)
}

fn score_with_facts(
    facts: &ProfileFacts<'_>,
    products: &[FoodProduct],
    level: RelaxationLevel,
) -> Vec<Recommendation> {
    let thresholds = level.thresholds();
    let mut accepted: Vec<Recommendation> = products
        .iter()
        .filter_map(|product| {
            let mut outcome = score_product(facts, product, level)?;
            let match_quality = MatchQuality::from_score(outcome.score, &thresholds)?;
            if let Some(disclosure) = level.disclosure() {
                outcome.reasons.push(disclosure.to_string());
            }
            Some(Recommendation {
                product: product.clone(),
                score: outcome.score,
                match_quality,
                reasons: outcome.reasons,
                warnings: outcome.warnings,
                relaxation_level: level,
                explanation: None,
            })
        })
        .collect();

    accepted.sort_by(|left, right| right.score.total_cmp(&left.score));
    accepted
}

/// Score every product in one pass at the given relaxation level.
///
/// Rejected products are dropped; the rest come back sorted by score, highest first.
pub fn score_catalog(
    profile: &PetProfile,
    products: &[FoodProduct],
    level: RelaxationLevel,
) -> RecommendationResult<Vec<Recommendation>> {
    let facts = ProfileFacts::derive(profile)?;
    Ok(score_with_facts(&facts, products, level))
}

/// Widen thresholds one level at a time until `min_recommendations` products are
/// accepted or the loosest level has run. Earlier passes win on duplicate ids.
/// The merged list comes back sorted by score, highest first; ties keep pass order.
pub(crate) fn collect_with_relaxation(
    facts: &ProfileFacts<'_>,
    products: &[FoodProduct],
    options: &RecommendationOptions,
) -> Vec<Recommendation> {
    let mut level =
        if options.force_relaxation { RelaxationLevel::new(1) } else { RelaxationLevel::STRICT };
    let mut collected = score_with_facts(facts, products, level);
    debug!(
        event_name = "recommend.relaxation.pass",
        level = level.value(),
        accepted = collected.len(),
        "scored catalog"
    );

    while collected.len() < options.min_recommendations {
        let Some(next) = level.next() else {
            break;
        };
        level = next;

        let mut seen: HashSet<String> =
            collected.iter().map(|recommendation| recommendation.product.id.clone()).collect();
        let before = collected.len();
        for recommendation in score_with_facts(facts, products, level) {
            if seen.insert(recommendation.product.id.clone()) {
                collected.push(recommendation);
            }
        }
        debug!(
            event_name = "recommend.relaxation.pass",
            level = level.value(),
            added = collected.len() - before,
            accepted = collected.len(),
            "relaxed acceptance thresholds"
        );
    }

    collected.sort_by(|left, right| right.score.total_cmp(&left.score));

    if options.force_relaxation {
        let disclosed = collected
            .iter()
            .any(|recommendation| recommendation.reasons.iter().any(|reason| is_disclosure(reason)));
        if !disclosed {
            if let (Some(first), Some(disclosure)) =
                (collected.first_mut(), RelaxationLevel::MAX.disclosure())
            {
                first.reasons.push(disclosure.to_string());
            }
        }
    }

    collected
}
