//! Internal/external link balance and anchor text quality

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::parser::document::element_text;
use crate::{Dimension, DimensionReport, Recommendation};

/// Anchor texts that tell the reader nothing about the target
const GENERIC_ANCHOR_TEXTS: &[&str] = &[
    "click here",
    "here",
    "read more",
    "more",
    "link",
    "this page",
    "kattints ide",
    "tovább",
    "itt",
    "oldalra",
];

pub struct LinksRule;

impl LinksRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinksRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for LinksRule {
    fn dimension(&self) -> Dimension {
        Dimension::Links
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let stats = page.link_stats();
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if stats.internal < 3 {
            issues.push("Few internal links (< 3)".to_string());
            recommendations.push(Recommendation::medium(
                "Add more internal links for better navigation",
            ));
            score -= 3;
        } else if stats.internal > 100 {
            issues.push("Too many internal links (> 100)".to_string());
            recommendations.push(Recommendation::medium("Reduce the number of internal links"));
            score -= 1;
        }

        if stats.external > 50 {
            issues.push(format!("Too many external links ({})", stats.external));
            recommendations.push(Recommendation::medium("Reduce the number of external links"));
            score -= 1;
        }

        let generic = page
            .document
            .select("a[href]")
            .iter()
            .filter(|a| {
                let text = element_text(a).trim().to_lowercase();
                GENERIC_ANCHOR_TEXTS.contains(&text.as_str())
            })
            .count();
        if generic > 0 {
            issues.push(format!("{} generic link texts", generic));
            recommendations.push(Recommendation::medium("Use descriptive link texts"));
            score -= 1;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("total_links", stats.total)
            .with_metric("internal_links", stats.internal)
            .with_metric("external_links", stats.external)
            .with_metric("nofollow_links", stats.nofollow)
            .with_metric("generic_links", generic)
    }
}
