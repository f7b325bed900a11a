//! Image alt text, lazy loading and oversized file names

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};

/// File name fragments that usually mark an unscaled original
const LARGE_IMAGE_HINTS: &[&str] = &["large", "big", "full", "original"];

pub struct ImagesRule;

impl ImagesRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImagesRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for ImagesRule {
    fn dimension(&self) -> Dimension {
        Dimension::Images
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let images = page.document.select("img");
        let total = images.len();
        let mut missing_alt = 0usize;
        let mut empty_alt = 0usize;
        let mut lazy = 0usize;
        let mut large = 0usize;

        for img in &images {
            let el = img.value();
            match el.attr("alt") {
                None => missing_alt += 1,
                Some(alt) if alt.trim().is_empty() => empty_alt += 1,
                Some(_) => {}
            }
            if el
                .attr("loading")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("lazy"))
            {
                lazy += 1;
            }
            let src = el.attr("src").unwrap_or_default().to_lowercase();
            if LARGE_IMAGE_HINTS.iter().any(|hint| src.contains(hint)) {
                large += 1;
            }
        }

        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if total > 0 {
            let without_alt = missing_alt + empty_alt;
            let ratio = without_alt as f64 / total as f64;
            if ratio > 0.5 {
                issues.push(format!(
                    "{}/{} images have a missing or empty alt attribute",
                    without_alt, total
                ));
                recommendations.push(Recommendation::medium(
                    "Add descriptive alt text to every image",
                ));
                score -= 5;
            } else if ratio > 0.2 {
                issues.push(format!(
                    "{}/{} images have a missing or empty alt attribute",
                    without_alt, total
                ));
                recommendations.push(Recommendation::medium("Fix the missing image alt attributes"));
                score -= 3;
            }

            if total > 5 && lazy == 0 {
                recommendations.push(Recommendation::medium("Use lazy loading for images"));
            }

            if large > 0 {
                issues.push(format!("{} potentially oversized images", large));
                recommendations.push(Recommendation::medium("Optimize image file sizes"));
            }
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("total_images", total)
            .with_metric("missing_alt", missing_alt)
            .with_metric("empty_alt", empty_alt)
            .with_metric("lazy_loading", lazy)
            .with_metric("large_images", large)
    }
}
