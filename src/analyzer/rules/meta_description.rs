//! Meta description presence, length and call to action

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};

const MIN_LENGTH: usize = 120;
const MAX_LENGTH: usize = 160;

/// Phrases that count as a call to action (English and Hungarian)
const CTA_PHRASES: &[&str] = &[
    "click",
    "visit",
    "learn more",
    "read more",
    "discover",
    "find out",
    "get started",
    "kattints",
    "látogass",
    "tudj meg többet",
    "olvass tovább",
    "fedezd fel",
];

pub struct MetaDescriptionRule;

impl MetaDescriptionRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetaDescriptionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for MetaDescriptionRule {
    fn dimension(&self) -> Dimension {
        Dimension::MetaDescription
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let Some(description) = page.document.meta_content("description") else {
            return DimensionReport::from_parts(
                0,
                vec!["No meta description".to_string()],
                vec![Recommendation::high("Add a meta description to the page")],
            )
            .with_metric("length", 0usize);
        };

        let length = description.chars().count();
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if length == 0 {
            issues.push("Empty meta description".to_string());
            recommendations.push(Recommendation::high(
                "Write descriptive text in the meta description",
            ));
            score = 0;
        } else if length < MIN_LENGTH {
            issues.push(format!(
                "Meta description too short ({} characters < {})",
                length, MIN_LENGTH
            ));
            recommendations.push(Recommendation::high(format!(
                "Expand the meta description to {}-{} characters",
                MIN_LENGTH, MAX_LENGTH
            )));
            score -= 3;
        } else if length > MAX_LENGTH {
            issues.push(format!(
                "Meta description too long ({} characters > {})",
                length, MAX_LENGTH
            ));
            recommendations.push(Recommendation::high(format!(
                "Shorten the meta description to under {} characters",
                MAX_LENGTH
            )));
            score -= 2;
        }

        let lowered = description.to_lowercase();
        let has_cta = CTA_PHRASES.iter().any(|phrase| lowered.contains(phrase));
        if !has_cta && length > 50 {
            recommendations.push(Recommendation::high(
                "Add a call to action to the meta description",
            ));
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("description", description.as_str())
            .with_metric("length", length)
            .with_metric("has_cta", has_cta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn with_description(text: &str) -> DimensionReport {
        let html = format!(r#"<head><meta name="description" content="{}"></head>"#, text);
        MetaDescriptionRule::new().analyze(&page(&html))
    }

    #[test]
    fn missing_description_scores_zero() {
        let report = MetaDescriptionRule::new().analyze(&page("<head></head>"));
        assert_eq!(report.score, 0);
        assert_eq!(report.issues, vec!["No meta description".to_string()]);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn empty_description_scores_zero() {
        let report = with_description("");
        assert_eq!(report.score, 0);
        assert_eq!(report.issues, vec!["Empty meta description".to_string()]);
    }

    #[test]
    fn short_description_loses_three() {
        let report = with_description("A short description of the page.");
        assert_eq!(report.score, 7);
    }

    #[test]
    fn long_description_loses_two() {
        let report = with_description(&"word ".repeat(40));
        assert_eq!(report.score, 8);
    }

    #[test]
    fn ideal_description_with_cta() {
        let text = "Handmade leather boots built for long hikes, rough trails and rainy days. \
                    Every pair is stitched by hand in our workshop. Learn more today.";
        let report = with_description(text);
        assert_eq!(report.score, 10);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.metric("has_cta").and_then(|m| m.as_flag()), Some(true));
    }

    #[test]
    fn missing_cta_recommends_only() {
        let text = "Handmade leather boots built for long hikes, rough trails and rainy days. \
                    Every pair is stitched by hand in our small family workshop.";
        let report = with_description(text);
        assert_eq!(report.score, 10);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let html = r#"<meta name="DESCRIPTION" content="x">"#;
        let report = MetaDescriptionRule::new().analyze(&page(html));
        assert_eq!(report.score, 7);
    }
}
