//! Social sharing metadata: Open Graph properties and Twitter card

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Priority, Recommendation};

const OPEN_GRAPH_PROPERTIES: &[&str] = &["og:title", "og:description", "og:image", "og:url", "og:type"];

pub struct SocialRule;

impl SocialRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SocialRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for SocialRule {
    fn dimension(&self) -> Dimension {
        Dimension::Social
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let missing: Vec<String> = OPEN_GRAPH_PROPERTIES
            .iter()
            .filter(|property| {
                doc.meta_property(property)
                    .map_or(true, |content| content.is_empty())
            })
            .map(|property| property.to_string())
            .collect();
        for property in &missing {
            issues.push(format!("Missing Open Graph property: {}", property));
            score -= 1;
        }
        if !missing.is_empty() {
            // a missing share title or image shows up on every share
            let priority = if missing.iter().any(|p| p == "og:title") {
                Priority::High
            } else if missing.iter().any(|p| p == "og:image") {
                Priority::Medium
            } else {
                Priority::Low
            };
            recommendations.push(Recommendation::new(
                format!("Add the missing Open Graph tags: {}", missing.join(", ")),
                priority,
            ));
        }

        // Twitter documents name=, many sites use property=
        let twitter_card = doc
            .meta_content("twitter:card")
            .or_else(|| doc.meta_property("twitter:card"))
            .filter(|card| !card.is_empty());
        if twitter_card.is_none() {
            issues.push("No Twitter card".to_string());
            recommendations.push(Recommendation::low(
                "Add a twitter:card tag for richer shares",
            ));
            score -= 2;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric(
                "og_properties",
                OPEN_GRAPH_PROPERTIES.len() - missing.len(),
            )
            .with_metric("missing_og", missing)
            .with_metric("twitter_card", twitter_card.unwrap_or_default())
    }
}
