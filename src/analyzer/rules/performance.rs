//! Page weight, response time, compression and response headers

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{round1, round2, Dimension, DimensionReport, Recommendation};

const SECURITY_HEADERS: &[&str] = &[
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
];

pub struct PerformanceRule;

impl PerformanceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PerformanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for PerformanceRule {
    fn dimension(&self) -> Dimension {
        Dimension::Performance
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let response = &page.response;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let size_kb = response.page_size_kb();
        if size_kb > 2000.0 {
            issues.push(format!("Very large page size: {:.1} KB", size_kb));
            recommendations.push(Recommendation::medium(
                "Optimize images and compress files to cut page weight",
            ));
            score -= 4;
        } else if size_kb > 1000.0 {
            issues.push(format!("Large page size: {:.1} KB", size_kb));
            recommendations.push(Recommendation::medium(
                "Reduce the page size to improve performance",
            ));
            score -= 2;
        }

        let load_time = response.elapsed.as_secs_f64();
        if load_time > 5.0 {
            issues.push(format!("Very slow response time: {:.2}s", load_time));
            recommendations.push(Recommendation::medium(
                "Optimize server response time for better performance",
            ));
            score -= 4;
        } else if load_time > 3.0 {
            issues.push(format!("Slow response time: {:.2}s", load_time));
            recommendations.push(Recommendation::medium(
                "Improve page loading speed and overall performance",
            ));
            score -= 3;
        } else if load_time > 1.0 {
            issues.push(format!("Moderate response time: {:.2}s", load_time));
            score -= 1;
        }

        let encoding = response.header("content-encoding").unwrap_or_default();
        if !encoding.contains("gzip") && !encoding.contains("br") {
            issues.push("No compression applied".to_string());
            recommendations.push(Recommendation::medium(
                "Enable GZIP or Brotli compression for better performance",
            ));
            score -= 1;
        }

        let has_cache_control = response
            .header("cache-control")
            .is_some_and(|v| !v.trim().is_empty());
        if !has_cache_control {
            recommendations.push(Recommendation::medium(
                "Add Cache-Control headers for better performance",
            ));
        }

        let security_headers = SECURITY_HEADERS
            .iter()
            .filter(|name| response.header(name).is_some())
            .count();
        if security_headers < 2 {
            recommendations.push(Recommendation::low(
                "Add security headers (X-Frame-Options, X-Content-Type-Options, X-XSS-Protection)",
            ));
        }

        let compression = if encoding.is_empty() { "none" } else { encoding };

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("page_size_kb", round1(size_kb))
            .with_metric("load_time_seconds", round2(load_time))
            .with_metric("compression", compression)
            .with_metric("has_cache_control", has_cache_control)
            .with_metric("security_headers", security_headers)
    }
}
