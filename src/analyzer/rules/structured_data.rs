//! Embedded structured data: JSON-LD, microdata, Open Graph and Twitter cards

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};

pub struct StructuredDataRule;

impl StructuredDataRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StructuredDataRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for StructuredDataRule {
    fn dimension(&self) -> Dimension {
        Dimension::StructuredData
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let blocks = doc.json_ld_blocks();
        let mut valid = 0usize;
        for block in &blocks {
            match block {
                Ok(_) => valid += 1,
                Err(e) => {
                    tracing::debug!(error = %e, "invalid JSON-LD block");
                    issues.push("Invalid JSON-LD structure".to_string());
                    score -= 3;
                }
            }
        }

        let microdata = doc.count("[itemscope]");
        let og_tags = doc.count(r#"meta[property^="og:"]"#);
        let twitter_tags = doc.count(r#"meta[name^="twitter:"]"#);

        let mut formats = Vec::new();
        if !blocks.is_empty() {
            formats.push("JSON-LD".to_string());
        }
        if microdata > 0 {
            formats.push("Microdata".to_string());
        }
        if og_tags > 0 {
            formats.push("Open Graph".to_string());
        }
        if twitter_tags > 0 {
            formats.push("Twitter Cards".to_string());
        }

        if formats.is_empty() {
            issues.push("No structured data".to_string());
            recommendations.push(Recommendation::medium(
                "Implement JSON-LD structured data (schema.org)",
            ));
            score -= 5;
        } else if valid == 0 && og_tags == 0 {
            recommendations.push(Recommendation::low(
                "Add Open Graph tags for social media sharing",
            ));
        }

        let schema_types: Vec<String> = doc.schema_types().into_iter().collect();

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("formats", formats)
            .with_metric("valid_json_ld", valid)
            .with_metric("invalid_json_ld", blocks.len() - valid)
            .with_metric("schema_types", schema_types)
            .with_metric("microdata", microdata)
            .with_metric("og_tags", og_tags)
            .with_metric("twitter_tags", twitter_tags)
    }
}
