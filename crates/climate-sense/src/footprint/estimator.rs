use serde::{Deserialize, Serialize};

use super::category::{category_score, display_label};
use super::inputs::{OrderedMap, UserInputs};
use super::level::FootprintLevel;

/// One positively scored category, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub category: String,
    pub value: String,
    pub score: i32,
    pub percentage: f64,
}

/// Outcome of scoring a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    /// Sum of category scores, never below 1.
    pub total_score: i32,
    pub category_scores: OrderedMap<i32>,
    pub category_percentages: OrderedMap<f64>,
    pub breakdown: Vec<BreakdownEntry>,
    pub raw_inputs: UserInputs,
}

impl FootprintResult {
    pub fn level(&self) -> FootprintLevel {
        FootprintLevel::from_score(f64::from(self.total_score))
    }
}

/// Score a set of answers against the static weight table.
///
/// Never fails: unknown categories or values contribute zero, and a total at or
/// below zero is clamped to 1 so percentages stay defined.
pub fn compute_footprint(inputs: &UserInputs) -> FootprintResult {
    let category_scores: OrderedMap<i32> = inputs
        .iter()
        .map(|(key, value)| (key, category_score(key, value)))
        .collect();

    let raw_total: i32 = category_scores.values().sum();
    let total_score = if raw_total <= 0 { 1 } else { raw_total };
    let total = f64::from(total_score);

    let category_percentages: OrderedMap<f64> = category_scores
        .iter()
        .map(|(key, score)| (key, f64::from(*score) / total * 100.0))
        .collect();

    let mut breakdown: Vec<BreakdownEntry> = category_scores
        .iter()
        .filter(|(_, score)| **score > 0)
        .map(|(key, score)| BreakdownEntry {
            category: display_label(key).to_string(),
            value: inputs.get(key).cloned().unwrap_or_default(),
            score: *score,
            percentage: category_percentages.get(key).copied().unwrap_or_default(),
        })
        .collect();
    // stable: equal scores keep submission order
    breakdown.sort_by(|left, right| right.score.cmp(&left.score));

    FootprintResult {
        total_score,
        category_scores,
        category_percentages,
        breakdown,
        raw_inputs: inputs.clone(),
    }
}
