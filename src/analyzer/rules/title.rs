//! Title tag length, repetition and branding

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};
use std::collections::HashSet;

const MIN_LENGTH: usize = 30;
const MAX_LENGTH: usize = 60;

pub struct TitleRule;

impl TitleRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TitleRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for TitleRule {
    fn dimension(&self) -> Dimension {
        Dimension::Title
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let Some(title) = page.document.title_text() else {
            return DimensionReport::from_parts(
                0,
                vec!["No title tag".to_string()],
                vec![Recommendation::high("Add a descriptive title tag to the page")],
            )
            .with_metric("title", "")
            .with_metric("length", 0usize);
        };

        let length = title.chars().count();
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if length == 0 {
            issues.push("Empty title tag".to_string());
            recommendations.push(Recommendation::high("Add a descriptive title to the page"));
            score = 0;
        } else if length < MIN_LENGTH {
            issues.push(format!("Title too short ({} characters < {})", length, MIN_LENGTH));
            recommendations.push(Recommendation::high(format!(
                "Expand the title to {}-{} characters",
                MIN_LENGTH, MAX_LENGTH
            )));
            score -= 4;
        } else if length > MAX_LENGTH {
            issues.push(format!("Title too long ({} characters > {})", length, MAX_LENGTH));
            recommendations.push(Recommendation::high(format!(
                "Shorten the title to under {} characters",
                MAX_LENGTH
            )));
            score -= 2;
        }

        let lowered = title.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let unique: HashSet<&str> = words.iter().copied().collect();
        if unique.len() != words.len() {
            issues.push("Repeated words in title".to_string());
            score -= 1;
        }

        let brand = page.domain.replace("www.", "");
        if !lowered.contains(&brand) {
            recommendations.push(Recommendation::high(
                "Consider adding the brand name to the title",
            ));
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("title", title.as_str())
            .with_metric("length", length)
            .with_metric("word_count", words.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn analyze(html: &str) -> DimensionReport {
        TitleRule::new().analyze(&page(html))
    }

    #[test]
    fn missing_title_scores_zero() {
        let report = analyze("<html><head></head><body></body></html>");
        assert_eq!(report.score, 0);
        assert_eq!(report.issues, vec!["No title tag".to_string()]);
    }

    #[test]
    fn empty_title_scores_zero() {
        let report = analyze("<title>   </title>");
        assert_eq!(report.score, 0);
        assert!(report.issues.iter().any(|i| i == "Empty title tag"));
    }

    #[test]
    fn short_title_loses_four() {
        let report = analyze("<title>Short page</title>");
        assert_eq!(report.score, 6);
        assert!(report.issues[0].contains("10 characters"));
    }

    #[test]
    fn long_title_loses_two() {
        let title = "Example: a comprehensive guide to writing very long page titles today";
        let report = analyze(&format!("<title>{}</title>", title));
        assert_eq!(report.score, 8);
    }

    #[test]
    fn duplicate_words_lose_one() {
        let report = analyze("<title>Shoes shoes and more at example.com store</title>");
        assert_eq!(report.score, 9);
        assert!(report.issues.iter().any(|i| i.contains("Repeated")));
    }

    #[test]
    fn ideal_title_with_brand_is_perfect() {
        let report = analyze("<title>Handmade leather boots for hiking | example.com</title>");
        assert_eq!(report.score, 10);
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn missing_brand_only_recommends() {
        let report = analyze("<title>Handmade leather boots for hiking and trails</title>");
        assert_eq!(report.score, 10);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].text.contains("brand"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 30 two-byte characters
        let title = "é".repeat(30);
        let report = analyze(&format!("<title>{}</title>", title));
        assert_eq!(report.metric("length").and_then(|m| m.as_count()), Some(30));
    }
}
