//! Frequency statistics and concentration risk for categorical fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sanitize::{Measure, Sanitize};

/// Share of the non-missing total below which a category is rare.
const RARE_FRACTION: f64 = 0.01;

/// Maximum rare categories reported per field.
pub const MAX_RARE_CATEGORIES: usize = 50;

/// One entry of the ranked top-N list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of the non-missing total, in percent, rounded to 2 decimals.
    pub percent: Measure,
}

/// Statistics for a categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    /// Number of distinct non-missing values.
    pub unique_count: usize,
    /// Most frequent values, most frequent first.
    pub top_n: Vec<CategoryCount>,
    /// Herfindahl-Hirschman index over all distinct values.
    pub concentration_risk: Measure,
    /// Values below 1% of the non-missing total, in frequency order.
    pub rare_categories: Vec<String>,
}

impl CategoricalStats {
    /// Statistics for a field without values.
    pub fn empty() -> Self {
        Self {
            unique_count: 0,
            top_n: Vec::new(),
            concentration_risk: Some(0.0),
            rare_categories: Vec::new(),
        }
    }

    /// Most frequent entry, if any.
    pub fn top_entity(&self) -> Option<&CategoryCount> {
        self.top_n.first()
    }
}

impl Sanitize for CategoricalStats {
    fn sanitize(&mut self) {
        self.concentration_risk.sanitize();
        for entry in &mut self.top_n {
            entry.percent.sanitize();
        }
    }
}

/// Computes [`CategoricalStats`] for one field.
#[derive(Debug, Clone)]
pub struct CategoricalAnalyzer {
    top_n: usize,
}

impl CategoricalAnalyzer {
    /// Create an analyzer reporting the top 10 values.
    pub fn new() -> Self {
        Self::with_top_n(10)
    }

    /// Create an analyzer reporting the top `top_n` values.
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Analyze the labels of the field's non-missing values.
    pub fn analyze<S: AsRef<str>>(&self, labels: &[S]) -> CategoricalStats {
        if labels.is_empty() {
            return CategoricalStats::empty();
        }

        let ranked = value_counts(labels);
        let total = labels.len() as f64;

        let top_n = ranked
            .iter()
            .take(self.top_n)
            .map(|&(value, count)| CategoryCount {
                value: value.to_string(),
                count,
                percent: Some(round_to(count as f64 / total * 100.0, 2)),
            })
            .collect();

        let concentration_risk = ranked
            .iter()
            .map(|&(_, count)| {
                let p = count as f64 / total;
                p * p
            })
            .sum::<f64>();

        let rare_threshold = total * RARE_FRACTION;
        let rare_categories = ranked
            .iter()
            .filter(|&&(_, count)| (count as f64) < rare_threshold)
            .take(MAX_RARE_CATEGORIES)
            .map(|&(value, _)| value.to_string())
            .collect();

        CategoricalStats {
            unique_count: ranked.len(),
            top_n,
            concentration_risk: Some(concentration_risk),
            rare_categories,
        }
    }
}

impl Default for CategoricalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Count occurrences and rank by descending count; ties keep first-seen order.
fn value_counts<S: AsRef<str>>(labels: &[S]) -> Vec<(&str, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label.as_ref()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Round to `decimals` places, ties to even.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concentration_of_ninety_ten_split() {
        let mut labels = vec!["A"; 9];
        labels.push("B");
        let stats = CategoricalAnalyzer::new().analyze(&labels);

        assert_eq!(stats.unique_count, 2);
        assert!((stats.concentration_risk.unwrap() - 0.82).abs() < 1e-12);
        assert_eq!(stats.top_n[0].value, "A");
        assert_eq!(stats.top_n[0].count, 9);
        assert_eq!(stats.top_n[0].percent, Some(90.0));
        assert_eq!(stats.top_n[1].percent, Some(10.0));
    }

    #[test]
    fn test_empty_sentinel() {
        let labels: Vec<String> = Vec::new();
        let stats = CategoricalAnalyzer::new().analyze(&labels);
        assert_eq!(stats, CategoricalStats::empty());
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "unique_count": 0,
                "top_n": [],
                "concentration_risk": 0.0,
                "rare_categories": []
            })
        );
    }

    #[test]
    fn test_hhi_covers_values_beyond_top_n() {
        let labels = ["a", "b", "c", "d"];
        let stats = CategoricalAnalyzer::with_top_n(1).analyze(&labels);

        assert_eq!(stats.top_n.len(), 1);
        assert!((stats.concentration_risk.unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let labels = ["x", "y", "y", "x", "z"];
        let stats = CategoricalAnalyzer::new().analyze(&labels);
        let order: Vec<&str> = stats.top_n.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_rare_categories() {
        let mut labels: Vec<String> = vec!["common".to_string(); 300];
        labels.extend((0..60).map(|i| format!("rare_{i}")));
        let stats = CategoricalAnalyzer::new().analyze(&labels);

        // 360 values: 1% is 3.6, so every singleton is rare, capped at 50
        assert_eq!(stats.rare_categories.len(), MAX_RARE_CATEGORIES);
        assert_eq!(stats.rare_categories[0], "rare_0");
        assert!(!stats.rare_categories.contains(&"common".to_string()));
    }

    #[test]
    fn test_percent_rounding() {
        let labels = ["a", "a", "b"];
        let stats = CategoricalAnalyzer::new().analyze(&labels);
        assert_eq!(stats.top_n[0].percent, Some(66.67));
        assert_eq!(stats.top_n[1].percent, Some(33.33));
    }

    #[test]
    fn test_percent_ties_round_to_even() {
        let mut labels = vec!["a"; 31];
        labels.push("b");
        let stats = CategoricalAnalyzer::new().analyze(&labels);

        // 1 of 32 is exactly 3.125
        assert_eq!(stats.top_n[1].percent, Some(3.12));
        assert_eq!(stats.top_n[0].percent, Some(96.88));
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
    }
}
