//! SEO fundamentals: robots.txt, sitemap, canonical, hreflang and favicon.
//!
//! Unlike the other rules this one is additive: every passed check adds two
//! points, capped at the dimension maximum.

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation, MAX_DIMENSION_SCORE};

const POINTS_PER_CHECK: i32 = 2;

const FAVICON_SELECTORS: &[&str] = &[
    r#"link[rel="icon"]"#,
    r#"link[rel="shortcut icon"]"#,
    r#"link[rel="apple-touch-icon"]"#,
];

pub struct SeoFundamentalsRule;

impl SeoFundamentalsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeoFundamentalsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for SeoFundamentalsRule {
    fn dimension(&self) -> Dimension {
        Dimension::SeoFundamentals
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let robots = page.probes.robots.exists;
        if !robots {
            issues.push("robots.txt not found".to_string());
            recommendations.push(Recommendation::low("Add a robots.txt file"));
        }

        let sitemap = page.probes.sitemap.exists;
        if !sitemap {
            issues.push("No XML sitemap found".to_string());
            recommendations.push(Recommendation::low("Publish an XML sitemap"));
        }

        let canonical_url = doc
            .first(r#"link[rel~="canonical"]"#)
            .map(|el| el.value().attr("href").unwrap_or_default().to_string());
        if canonical_url.is_none() {
            issues.push("No canonical link".to_string());
            recommendations.push(Recommendation::medium(
                "Add a canonical link to avoid duplicate content",
            ));
        }

        let hreflang_count = doc.count("link[hreflang]");
        if hreflang_count == 0 {
            recommendations.push(Recommendation::low(
                "Add hreflang alternates if the site has several language versions",
            ));
        }

        let favicon = FAVICON_SELECTORS.iter().any(|sel| doc.exists(sel));
        if !favicon {
            issues.push("No favicon".to_string());
            recommendations.push(Recommendation::low("Add a favicon"));
        }

        let checks = [
            robots,
            sitemap,
            canonical_url.is_some(),
            hreflang_count > 0,
            favicon,
        ];
        let passed = checks.iter().filter(|passed| **passed).count();
        let score = (passed as i32 * POINTS_PER_CHECK).min(i32::from(MAX_DIMENSION_SCORE));

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("robots_txt", robots)
            .with_metric("robots_txt_url", page.probes.robots.url.as_str())
            .with_metric("sitemap", sitemap)
            .with_metric("sitemap_url", page.probes.sitemap.url.as_str())
            .with_metric("canonical", canonical_url.is_some())
            .with_metric("canonical_url", canonical_url.unwrap_or_default())
            .with_metric("hreflang_count", hreflang_count)
            .with_metric("favicon", favicon)
            .with_metric("total_passed", passed)
    }
}
