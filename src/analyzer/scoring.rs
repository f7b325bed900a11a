//! Weighted aggregation of dimension scores and the grading curve

use crate::{round1, Dimension, DimensionReport, Grade};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default weight per dimension
pub const DEFAULT_WEIGHTS: [(Dimension, f64); 16] = [
    (Dimension::Title, 1.2),
    (Dimension::MetaDescription, 1.1),
    (Dimension::Headings, 1.0),
    (Dimension::Images, 0.8),
    (Dimension::Links, 0.9),
    (Dimension::StructuredData, 0.7),
    (Dimension::Performance, 1.3),
    (Dimension::MobileFriendly, 1.1),
    (Dimension::SeoFundamentals, 0.9),
    (Dimension::ContentQuality, 1.0),
    (Dimension::TechnicalSeo, 0.9),
    (Dimension::Social, 0.8),
    (Dimension::Accessibility, 0.7),
    (Dimension::CoreWebVitals, 1.2),
    (Dimension::LocalSeo, 0.9),
    (Dimension::Ecommerce, 0.8),
];

/// Weight per dimension. A dimension without an entry, or with weight 0,
/// does not take part in the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    weights: BTreeMap<Dimension, f64>,
}

impl WeightTable {
    /// Table with no weights at all
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn weight(&self, dimension: Dimension) -> Option<f64> {
        self.weights.get(&dimension).copied()
    }

    pub fn set(&mut self, dimension: Dimension, weight: f64) {
        self.weights.insert(dimension, weight);
    }

    pub fn with(mut self, dimension: Dimension, weight: f64) -> Self {
        self.set(dimension, weight);
        self
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.into_iter().collect(),
        }
    }
}

/// One line of the weighted breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub dimension: Dimension,
    pub score: u8,
    /// None when the dimension is not weighted
    pub weight: Option<f64>,
    pub weighted_score: f64,
}

/// Calculator for the overall page score
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Weighted mean of the dimension scores, rounded to one decimal.
    ///
    /// Only dimensions with a positive weight count; when nothing counts the
    /// total is 0.
    pub fn total(dimensions: &BTreeMap<Dimension, DimensionReport>, weights: &WeightTable) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (dimension, report) in dimensions {
            match weights.weight(*dimension) {
                Some(w) if w > 0.0 => {
                    weighted_sum += f64::from(report.score) * w;
                    weight_sum += w;
                }
                _ => {}
            }
        }
        if weight_sum > 0.0 {
            round1(weighted_sum / weight_sum)
        } else {
            0.0
        }
    }

    pub fn grade(total: f64) -> Grade {
        Grade::from_score(total)
    }

    /// Per-dimension contribution, in dimension order
    pub fn breakdown(
        dimensions: &BTreeMap<Dimension, DimensionReport>,
        weights: &WeightTable,
    ) -> Vec<BreakdownEntry> {
        dimensions
            .iter()
            .map(|(dimension, report)| {
                let weight = weights.weight(*dimension).filter(|w| *w > 0.0);
                BreakdownEntry {
                    dimension: *dimension,
                    score: report.score,
                    weight,
                    weighted_score: weight.map_or(0.0, |w| f64::from(report.score) * w),
                }
            })
            .collect()
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::APlus | Grade::A => "Excellent - the page follows on-page SEO best practices",
            Grade::AMinus | Grade::BPlus => "Good - solid foundations with a few gaps",
            Grade::B | Grade::BMinus => "Fair - several dimensions need attention",
            Grade::CPlus | Grade::C => "Weak - significant on-page problems",
            Grade::D => "Poor - most dimensions need work",
            Grade::F => "Failing - the page needs major improvements",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reports(scores: &[(Dimension, i32)]) -> BTreeMap<Dimension, DimensionReport> {
        scores
            .iter()
            .map(|(d, s)| (*d, DimensionReport::from_parts(*s, vec![], vec![])))
            .collect()
    }

    #[test]
    fn test_default_weights_cover_all_dimensions() {
        let table = WeightTable::default();
        for d in Dimension::ALL {
            assert!(table.weight(d).is_some_and(|w| w > 0.0), "{} unweighted", d);
        }
        assert_eq!(table.weight(Dimension::Performance), Some(1.3));
    }

    #[test]
    fn test_total_is_weighted_mean() {
        let dims = reports(&[(Dimension::Title, 10), (Dimension::Performance, 5)]);
        // (10*1.2 + 5*1.3) / 2.5 = 7.4
        assert_eq!(ScoreCalculator::total(&dims, &WeightTable::default()), 7.4);
    }

    #[test]
    fn test_all_perfect_scores_total_ten() {
        let dims = reports(&Dimension::ALL.map(|d| (d, 10)));
        let total = ScoreCalculator::total(&dims, &WeightTable::default());
        assert_eq!(total, 10.0);
        assert_eq!(ScoreCalculator::grade(total), Grade::APlus);
    }

    #[test]
    fn test_zero_weight_is_excluded_from_denominator() {
        let dims = reports(&[(Dimension::Title, 10), (Dimension::Images, 0)]);
        let weights = WeightTable::default().with(Dimension::Images, 0.0);
        assert_eq!(ScoreCalculator::total(&dims, &weights), 10.0);
    }

    #[test]
    fn test_missing_weight_is_excluded() {
        let dims = reports(&[(Dimension::Title, 4), (Dimension::Headings, 8)]);
        let weights = WeightTable::empty().with(Dimension::Headings, 1.0);
        assert_eq!(ScoreCalculator::total(&dims, &weights), 8.0);
    }

    #[test]
    fn test_no_weights_total_zero() {
        let dims = reports(&[(Dimension::Title, 9)]);
        assert_eq!(ScoreCalculator::total(&dims, &WeightTable::empty()), 0.0);
        assert_eq!(ScoreCalculator::total(&BTreeMap::new(), &WeightTable::default()), 0.0);
    }

    #[test]
    fn test_breakdown_marks_unweighted() {
        let dims = reports(&[(Dimension::Title, 5), (Dimension::Social, 7)]);
        let weights = WeightTable::default().with(Dimension::Social, 0.0);
        let rows = ScoreCalculator::breakdown(&dims, &weights);
        assert_eq!(rows[0].weight, Some(1.2));
        assert_eq!(rows[0].weighted_score, 6.0);
        assert_eq!(rows[1].weight, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn total_stays_within_bounds(scores in proptest::collection::vec(0i32..=10, 16)) {
            let pairs: Vec<(Dimension, i32)> =
                Dimension::ALL.iter().copied().zip(scores.iter().copied()).collect();
            let total = ScoreCalculator::total(&reports(&pairs), &WeightTable::default());
            prop_assert!((0.0..=10.0).contains(&total));
        }

        #[test]
        fn grade_is_monotonic(a in 0.0f64..=10.0, b in 0.0f64..=10.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // Better grades sort first in declaration order
            prop_assert!(grade_rank(Grade::from_score(hi)) <= grade_rank(Grade::from_score(lo)));
        }
    }

    fn grade_rank(grade: Grade) -> u8 {
        match grade {
            Grade::APlus => 0,
            Grade::A => 1,
            Grade::AMinus => 2,
            Grade::BPlus => 3,
            Grade::B => 4,
            Grade::BMinus => 5,
            Grade::CPlus => 6,
            Grade::C => 7,
            Grade::D => 8,
            Grade::F => 9,
        }
    }
}
