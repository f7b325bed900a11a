//! Recommendation prioritizer: flattens every dimension's findings into one
//! ranked list

use crate::{Dimension, DimensionReport, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of items exposed as top recommendations
pub const TOP_RECOMMENDATIONS: usize = 10;
/// Number of high-priority items exposed as quick wins
pub const QUICK_WINS: usize = 5;

/// A recommendation together with the dimension that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedRecommendation {
    pub dimension: Dimension,
    pub text: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub total_issues: usize,
    pub total_recommendations: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub top_recommendations: Vec<PrioritizedRecommendation>,
    pub quick_wins: Vec<PrioritizedRecommendation>,
}

impl RecommendationSummary {
    /// Build the summary from the per-dimension reports.
    ///
    /// Items are ordered by dimension, then by position within the
    /// dimension, then stably sorted by priority.
    pub fn build(dimensions: &BTreeMap<Dimension, DimensionReport>) -> Self {
        let total_issues = dimensions.values().map(|r| r.issues.len()).sum();

        let mut ranked: Vec<PrioritizedRecommendation> = dimensions
            .iter()
            .flat_map(|(dimension, report)| {
                report
                    .recommendations
                    .iter()
                    .map(move |rec| PrioritizedRecommendation {
                        dimension: *dimension,
                        text: rec.text.clone(),
                        priority: rec.priority,
                    })
            })
            .collect();
        // sort_by_key is stable
        ranked.sort_by_key(|rec| rec.priority);

        let count = |p: Priority| ranked.iter().filter(|r| r.priority == p).count();
        let high_priority = count(Priority::High);
        let medium_priority = count(Priority::Medium);
        let low_priority = count(Priority::Low);

        let quick_wins = ranked
            .iter()
            .filter(|r| r.priority == Priority::High)
            .take(QUICK_WINS)
            .cloned()
            .collect();
        let total_recommendations = ranked.len();
        ranked.truncate(TOP_RECOMMENDATIONS);

        Self {
            total_issues,
            total_recommendations,
            high_priority,
            medium_priority,
            low_priority,
            top_recommendations: ranked,
            quick_wins,
        }
    }
}
