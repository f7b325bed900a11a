//! E-commerce readiness: product markup and breadcrumbs on pages that sell

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};
use regex::Regex;
use std::sync::OnceLock;

/// Commerce vocabulary (English and Hungarian), matched as whole words
const COMMERCE_KEYWORDS: &[&str] = &[
    "price",
    "add to cart",
    "cart",
    "checkout",
    "buy",
    "shipping",
    "in stock",
    "out of stock",
    "sale",
    "discount",
    "ár",
    "kosárba",
    "kosár",
    "pénztár",
    "vásárlás",
    "szállítás",
    "raktáron",
    "akció",
];

const PRODUCT_THRESHOLD: usize = 4;
const BREADCRUMB_THRESHOLD: usize = 6;
const PRODUCT_TYPES: &[&str] = &["Product", "Offer", "AggregateOffer", "ProductGroup"];

fn keyword_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        COMMERCE_KEYWORDS
            .iter()
            .map(|kw| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw)))
                    .expect("valid regex");
                (*kw, re)
            })
            .collect()
    })
}

/// Distinct commerce keywords present in the text
pub fn commerce_keywords(text: &str) -> Vec<&'static str> {
    keyword_patterns()
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(kw, _)| *kw)
        .collect()
}

fn has_breadcrumb_markup(page: &PageContext) -> bool {
    page.document
        .select("[class], [id], [aria-label]")
        .iter()
        .any(|el| {
            ["class", "id", "aria-label"].iter().any(|attr| {
                el.value()
                    .attr(attr)
                    .is_some_and(|v| v.to_ascii_lowercase().contains("breadcrumb"))
            })
        })
}

pub struct EcommerceRule;

impl EcommerceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EcommerceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for EcommerceRule {
    fn dimension(&self) -> Dimension {
        Dimension::Ecommerce
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let keywords = commerce_keywords(&doc.visible_text());
        let hits = keywords.len();
        let types = doc.schema_types();

        let has_product_schema = PRODUCT_TYPES.iter().any(|t| types.contains(*t));
        if hits >= PRODUCT_THRESHOLD && !has_product_schema {
            issues.push(format!(
                "Commerce content ({} keywords) without Product or Offer structured data",
                hits
            ));
            recommendations.push(Recommendation::medium(
                "Add Product and Offer schema markup to product pages",
            ));
            score -= 3;
        }

        let has_breadcrumb = types.contains("BreadcrumbList") || has_breadcrumb_markup(page);
        if hits >= BREADCRUMB_THRESHOLD && !has_breadcrumb {
            issues.push("No breadcrumb navigation".to_string());
            recommendations.push(Recommendation::low(
                "Add breadcrumb navigation with BreadcrumbList markup",
            ));
            score -= 2;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("commerce_keywords", hits)
            .with_metric("product_schema", has_product_schema)
            .with_metric("breadcrumb", has_breadcrumb)
    }
}
