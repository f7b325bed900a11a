//! Mobile friendliness: viewport, responsive images and media queries

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::parser::document::element_text;
use crate::{Dimension, DimensionReport, Recommendation};

const MOBILE_APP_META: &[&str] = &["apple-mobile-web-app-capable", "mobile-web-app-capable"];

pub struct MobileFriendlyRule;

impl MobileFriendlyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MobileFriendlyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for MobileFriendlyRule {
    fn dimension(&self) -> Dimension {
        Dimension::MobileFriendly
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let viewport = doc.meta_content("viewport");
        match &viewport {
            None => {
                issues.push("No viewport meta tag".to_string());
                recommendations.push(Recommendation::high(
                    "Add a viewport meta tag for mobile devices",
                ));
                score -= 5;
            }
            Some(content) if !content.contains("width=device-width") => {
                issues.push("Viewport is not responsive".to_string());
                recommendations.push(Recommendation::high(
                    "Use width=device-width in the mobile viewport",
                ));
                score -= 2;
            }
            Some(_) => {}
        }

        let total_images = doc.count("img");
        let responsive_images = doc.count("img[srcset]");
        if total_images > 5 && responsive_images == 0 {
            issues.push("No responsive images".to_string());
            recommendations.push(Recommendation::medium(
                "Use the srcset attribute on images",
            ));
            score -= 2;
        }

        let has_media_queries = doc
            .select("style")
            .iter()
            .any(|style| element_text(style).contains("@media"));
        if !has_media_queries {
            recommendations.push(Recommendation::low(
                "Use media queries for a responsive layout",
            ));
        }

        let mobile_optimized = MOBILE_APP_META
            .iter()
            .any(|name| doc.meta_content(name).is_some());

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("has_viewport", viewport.is_some())
            .with_metric("responsive_images", responsive_images)
            .with_metric("total_images", total_images)
            .with_metric("has_media_queries", has_media_queries)
            .with_metric("mobile_optimized", mobile_optimized)
    }
}
