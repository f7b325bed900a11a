//! Improvement potential: how far each dimension is from its maximum

use crate::{round1, Dimension, DimensionReport, MAX_DIMENSION_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of largest gaps reported
pub const TOP_AREAS: usize = 3;

/// Share of the gap assumed to be recoverable by fixing the recommendations
pub const RECOVERY_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub dimension: Dimension,
    pub current_score: u8,
    pub potential_gain: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovementPotential {
    /// Sum of the current dimension scores
    pub total_current: u32,
    /// Sum of the per-dimension gaps to the maximum
    pub total_improvement: u32,
    pub module_count: usize,
    pub improvement_percentage: f64,
    pub top_areas: Vec<ImprovementArea>,
    /// Optimistic projection; a sum over all dimensions, not capped
    pub estimated_score_after_fixes: f64,
}

impl ImprovementPotential {
    pub fn calculate(dimensions: &BTreeMap<Dimension, DimensionReport>) -> Self {
        let module_count = dimensions.len();
        let total_current: u32 = dimensions.values().map(|r| u32::from(r.score)).sum();
        let total_improvement: u32 = dimensions.values().map(|r| u32::from(r.gap())).sum();

        let improvement_percentage = if module_count == 0 {
            0.0
        } else {
            let max_total = f64::from(MAX_DIMENSION_SCORE) * module_count as f64;
            f64::from(total_improvement) / max_total * 100.0
        };

        let mut areas: Vec<ImprovementArea> = dimensions
            .iter()
            .map(|(dimension, report)| ImprovementArea {
                dimension: *dimension,
                current_score: report.score,
                potential_gain: report.gap(),
            })
            .collect();
        // Stable: equal gaps keep dimension order
        areas.sort_by(|a, b| b.potential_gain.cmp(&a.potential_gain));
        areas.truncate(TOP_AREAS);

        let estimated_score_after_fixes =
            round1(f64::from(total_current) + RECOVERY_FACTOR * f64::from(total_improvement));

        Self {
            total_current,
            total_improvement,
            module_count,
            improvement_percentage,
            top_areas: areas,
            estimated_score_after_fixes,
        }
    }
}
