//! User-facing explanation rendering

use serde::Serialize;

use crate::domain::profile::PetProfile;

use super::classify::recognised_conditions;
use super::health::HealthCondition;
use super::relaxation::is_disclosure;
use super::types::Recommendation;

const MAX_BENEFITS: usize = 5;
const MAX_CONSIDERATIONS: usize = 3;
const MAX_HEALTH_BENEFITS: usize = 3;
const BULLET: &str = "\u{2022} ";

/// Structured form of the rendered explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxation_note: Option<String>,
    pub benefits: Vec<String>,
    pub considerations: Vec<String>,
    pub nutritional_highlights: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub health_benefits: Vec<String>,
}

impl Explanation {
    /// Build from raw rule reasons.
    pub fn compose(
        recommendation: &Recommendation,
        pet_name: &str,
        conditions: &[HealthCondition],
    ) -> Self {
        let headline = format!(
            "This food is {} for {pet_name}.",
            recommendation.match_quality.headline_phrase()
        );
        let relaxation_note =
            recommendation.reasons.iter().find(|reason| is_disclosure(reason)).cloned();

        let (negatives, positives): (Vec<&String>, Vec<&String>) = recommendation
            .reasons
            .iter()
            .filter(|reason| !is_disclosure(reason))
            .partition(|reason| is_negative(reason));

        let benefits = positives.iter().take(MAX_BENEFITS).map(|reason| reason.to_string()).collect();
        let considerations = negatives
            .iter()
            .take(MAX_CONSIDERATIONS)
            .map(|reason| reason.replace("Penalized for ", ""))
            .collect();

        let nutrition = &recommendation.product.nutritional_value;
        let nutritional_highlights = vec![
            format!("{}% protein, {}% fat, {}% fiber", nutrition.protein, nutrition.fat, nutrition.fiber),
            format!("{} calories per cup", nutrition.calories_per_cup),
        ];

        let health_benefits = if conditions.is_empty() {
            Vec::new()
        } else {
            recommendation
                .reasons
                .iter()
                .filter(|reason| conditions.iter().any(|condition| condition.mentioned_in(reason)))
                .take(MAX_HEALTH_BENEFITS)
                .cloned()
                .collect()
        };

        Self {
            headline,
            relaxation_note,
            benefits,
            considerations,
            nutritional_highlights,
            health_benefits,
        }
    }

    /// Flatten into display lines, in the order they are shown to the user.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![self.headline.clone()];
        if let Some(note) = &self.relaxation_note {
            lines.push(note.clone());
        }

        push_section(&mut lines, "Top benefits:", &self.benefits);
        push_section(&mut lines, "Considerations:", &self.considerations);
        push_section(&mut lines, "Nutritional highlights:", &self.nutritional_highlights);
        push_section(&mut lines, "Health condition benefits:", &self.health_benefits);
        lines
    }
}

fn is_negative(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    reason.contains("penalized") || reason.contains("not ")
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(title.to_string());
    lines.extend(items.iter().map(|item| format!("{BULLET}{item}")));
}

/// Replace each recommendation's raw reasons with its rendered explanation.
pub fn add_detailed_explanations(recommendations: &mut [Recommendation], profile: &PetProfile) {
    let conditions = recognised_conditions(profile);

    for recommendation in recommendations.iter_mut() {
        let explanation = Explanation::compose(recommendation, &profile.name, &conditions);
        recommendation.reasons = explanation.to_lines();
        recommendation.explanation = Some(explanation);
    }
}
