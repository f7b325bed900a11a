//! Core Web Vitals estimates from static markup.
//!
//! No rendering happens, so LCP is approximated from the page weight and
//! layout shift risk from images without reserved dimensions.

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::parser::document::element_text;
use crate::{round1, round2, Dimension, DimensionReport, Recommendation};

const LCP_BASE_SECS: f64 = 0.5;
const LCP_POOR_SECS: f64 = 4.0;
const LCP_NEEDS_WORK_SECS: f64 = 2.5;
const MAX_INLINE_JS_KB: f64 = 100.0;
const MAX_EXTERNAL_SCRIPTS: usize = 10;
const MAX_UNSIZED_IMAGES: usize = 3;

pub struct CoreWebVitalsRule;

impl CoreWebVitalsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoreWebVitalsRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimated Largest Contentful Paint in seconds
pub fn estimated_lcp(page_size_kb: f64) -> f64 {
    LCP_BASE_SECS + page_size_kb / 1000.0
}

fn is_javascript_type(script_type: Option<&str>) -> bool {
    match script_type.map(|t| t.trim().to_ascii_lowercase()) {
        None => true,
        Some(t) => t.is_empty() || t.contains("javascript") || t == "module",
    }
}

impl DimensionRule for CoreWebVitalsRule {
    fn dimension(&self) -> Dimension {
        Dimension::CoreWebVitals
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let lcp = estimated_lcp(page.response.page_size_kb());
        if lcp > LCP_POOR_SECS {
            issues.push(format!("Estimated LCP is poor ({:.2}s > {:.1}s)", lcp, LCP_POOR_SECS));
            recommendations.push(Recommendation::medium(
                "Reduce page weight to improve Largest Contentful Paint performance",
            ));
            score -= 4;
        } else if lcp > LCP_NEEDS_WORK_SECS {
            issues.push(format!(
                "Estimated LCP needs improvement ({:.2}s > {:.1}s)",
                lcp, LCP_NEEDS_WORK_SECS
            ));
            recommendations.push(Recommendation::medium(
                "Reduce page weight to improve Largest Contentful Paint performance",
            ));
            score -= 2;
        }

        let scripts = doc.select("script");
        let external_scripts = scripts
            .iter()
            .filter(|s| s.value().attr("src").is_some())
            .count();
        let inline_js_bytes: usize = scripts
            .iter()
            .filter(|s| s.value().attr("src").is_none() && is_javascript_type(s.value().attr("type")))
            .map(|s| element_text(s).len())
            .sum();
        let inline_js_kb = inline_js_bytes as f64 / 1024.0;
        if inline_js_kb > MAX_INLINE_JS_KB || external_scripts > MAX_EXTERNAL_SCRIPTS {
            issues.push(format!(
                "Heavy JavaScript ({:.1} KB inline, {} external scripts)",
                inline_js_kb, external_scripts
            ));
            recommendations.push(Recommendation::medium(
                "Reduce and defer JavaScript to improve interaction performance",
            ));
            score -= 3;
        }

        let unsized_images = doc
            .select("img")
            .iter()
            .filter(|img| {
                let el = img.value();
                el.attr("width").is_none() || el.attr("height").is_none()
            })
            .count();
        if unsized_images > MAX_UNSIZED_IMAGES {
            issues.push(format!("{} images without width and height", unsized_images));
            recommendations.push(Recommendation::medium(
                "Set width and height on images to prevent layout shifts",
            ));
            score -= 2;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("estimated_lcp", round2(lcp))
            .with_metric("inline_js_kb", round1(inline_js_kb))
            .with_metric("external_scripts", external_scripts)
            .with_metric("images_without_dimensions", unsized_images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn analyze(html: &str) -> DimensionReport {
        CoreWebVitalsRule::new().analyze(&page(html))
    }

    #[test]
    fn lcp_estimate() {
        assert_eq!(estimated_lcp(0.0), 0.5);
        assert_eq!(estimated_lcp(2000.0), 2.5);
    }

    #[test]
    fn light_page_is_perfect() {
        let report = analyze(r#"<img src="a.png" width="10" height="10"><script>var x = 1;</script>"#);
        assert_eq!(report.score, 10);
    }

    #[test]
    fn heavy_page_lcp_bands() {
        // ~2100 KB -> 2.6s
        let medium = format!("<p>{}</p>", "a".repeat(2100 * 1024));
        assert_eq!(analyze(&medium).score, 8);
        // ~3600 KB -> 4.1s
        let heavy = format!("<p>{}</p>", "a".repeat(3600 * 1024));
        assert_eq!(analyze(&heavy).score, 6);
    }

    #[test]
    fn many_external_scripts() {
        let scripts = r#"<script src="x.js"></script>"#.repeat(11);
        let report = analyze(&scripts);
        assert_eq!(report.score, 7);
    }

    #[test]
    fn large_inline_script_but_not_json_ld() {
        let body = "x".repeat(101 * 1024);
        let report = analyze(&format!(r#"<script type="application/ld+json">{}</script>"#, body));
        assert_eq!(report.score, 10);
        let report = analyze(&format!("<script>{}</script>", body));
        assert_eq!(report.score, 7);
    }

    #[test]
    fn unsized_images() {
        let imgs = r#"<img src="a.png" width="10">"#.repeat(4);
        assert_eq!(analyze(&imgs).score, 8);
        let imgs = r#"<img src="a.png">"#.repeat(3);
        assert_eq!(analyze(&imgs).score, 10);
    }
}
