//! Brand diversity re-ranking

use std::collections::HashMap;

use super::types::Recommendation;
use super::BRAND_REPEAT_PENALTY;

/// Greedily re-rank so one brand does not crowd the top slots.
///
/// Input is expected sorted by score, highest first. The top product always keeps
/// first place; each following slot goes to the candidate with the best adjusted
/// score, `score - picks_of_same_brand * diversity_factor * 10`. Ties keep input order.
/// Raw scores are left untouched.
pub fn apply_brand_diversity(
    recommendations: Vec<Recommendation>,
    diversity_factor: f64,
) -> Vec<Recommendation> {
    if recommendations.len() <= 1 || diversity_factor <= 0.0 {
        return recommendations;
    }

    let penalty = diversity_factor * BRAND_REPEAT_PENALTY;
    let mut remaining = recommendations;
    let mut picks_per_brand: HashMap<String, usize> = HashMap::new();
    let mut selected = Vec::with_capacity(remaining.len());

    let first = remaining.remove(0);
    picks_per_brand.insert(first.product.brand_id.clone(), 1);
    selected.push(first);

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_adjusted = f64::NEG_INFINITY;
        for (index, candidate) in remaining.iter().enumerate() {
            let picks = picks_per_brand.get(&candidate.product.brand_id).copied().unwrap_or(0);
            let adjusted = candidate.score - picks as f64 * penalty;
            if adjusted > best_adjusted {
                best_adjusted = adjusted;
                best_index = index;
            }
        }

        let chosen = remaining.remove(best_index);
        *picks_per_brand.entry(chosen.product.brand_id.clone()).or_insert(0) += 1;
        selected.push(chosen);
    }

    selected
}
