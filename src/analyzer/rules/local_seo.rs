//! Local SEO signals: a reachable phone number and business structured data

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};
use regex::Regex;
use std::sync::OnceLock;

const MIN_PHONE_DIGITS: usize = 9;
const MAX_PHONE_DIGITS: usize = 15;

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?\(?\d[\d\s().\-/]{6,}\d").expect("valid regex"))
}

/// Whether the text contains something shaped like a phone number
pub fn contains_phone_number(text: &str) -> bool {
    phone_regex().find_iter(text).any(|m| {
        let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
        (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
    })
}

/// Organization, LocalBusiness or one of its *Business subtypes
fn is_business_type(schema_type: &str) -> bool {
    schema_type == "Organization"
        || schema_type.contains("LocalBusiness")
        || schema_type.ends_with("Business")
}

pub struct LocalSeoRule;

impl LocalSeoRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalSeoRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for LocalSeoRule {
    fn dimension(&self) -> Dimension {
        Dimension::LocalSeo
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let has_phone =
            doc.exists(r#"a[href^="tel:"]"#) || contains_phone_number(&doc.visible_text());
        if !has_phone {
            issues.push("No phone number found".to_string());
            recommendations.push(Recommendation::low(
                "Show a clickable phone number on the page",
            ));
            score -= 2;
        }

        let business_types: Vec<String> = doc
            .schema_types()
            .into_iter()
            .filter(|t| is_business_type(t))
            .collect();
        if business_types.is_empty() {
            issues.push("No LocalBusiness or Organization structured data".to_string());
            recommendations.push(Recommendation::medium(
                "Add LocalBusiness or Organization schema markup",
            ));
            score -= 3;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("has_phone", has_phone)
            .with_metric("business_types", business_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    #[test]
    fn phone_number_shapes() {
        assert!(contains_phone_number("Call us: +36 1 234 5678"));
        assert!(contains_phone_number("(555) 123-4567 ext"));
        assert!(contains_phone_number("+44 20 7946 0958"));
        assert!(!contains_phone_number("Founded in 1998, 25 shops"));
        assert!(!contains_phone_number("Order 12345"));
    }

    #[test]
    fn local_business_page_is_perfect() {
        let html = r#"<script type="application/ld+json">{"@type":"Restaurant","@context":"https://schema.org"}</script>
            <script type="application/ld+json">{"@type":"LocalBusiness"}</script>
            <p>Reservations: +36 30 123 4567</p>"#;
        let report = LocalSeoRule::new().analyze(&page(html));
        assert_eq!(report.score, 10);
    }

    #[test]
    fn tel_link_counts_as_phone() {
        let html = r#"<a href="tel:+3612345678">Call</a>
            <script type="application/ld+json">{"@type":"Organization"}</script>"#;
        let report = LocalSeoRule::new().analyze(&page(html));
        assert_eq!(report.score, 10);
    }

    #[test]
    fn nothing_local_loses_five() {
        let report = LocalSeoRule::new().analyze(&page("<p>Hello</p>"));
        assert_eq!(report.score, 5);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn business_subtypes_are_recognized() {
        assert!(is_business_type("HomeAndConstructionBusiness"));
        assert!(is_business_type("Organization"));
        assert!(!is_business_type("WebSite"));
    }
}
