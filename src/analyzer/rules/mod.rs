//! Dimension rules: one scorer per quality aspect of the page

pub mod accessibility;
pub mod content_quality;
pub mod core_web_vitals;
pub mod ecommerce;
pub mod fundamentals;
pub mod headings;
pub mod images;
pub mod links;
pub mod local_seo;
pub mod meta_description;
pub mod mobile;
pub mod performance;
pub mod social;
pub mod structured_data;
pub mod technical_seo;
pub mod title;

pub use accessibility::AccessibilityRule;
pub use content_quality::ContentQualityRule;
pub use core_web_vitals::CoreWebVitalsRule;
pub use ecommerce::EcommerceRule;
pub use fundamentals::SeoFundamentalsRule;
pub use headings::HeadingsRule;
pub use images::ImagesRule;
pub use links::LinksRule;
pub use local_seo::LocalSeoRule;
pub use meta_description::MetaDescriptionRule;
pub use mobile::MobileFriendlyRule;
pub use performance::PerformanceRule;
pub use social::SocialRule;
pub use structured_data::StructuredDataRule;
pub use technical_seo::TechnicalSeoRule;
pub use title::TitleRule;

use super::context::PageContext;
use crate::{Dimension, DimensionReport};

/// Trait for dimension rules
pub trait DimensionRule: Send + Sync {
    /// Dimension this rule scores
    fn dimension(&self) -> Dimension;

    /// Score a loaded page. Missing elements lower the score, they never fail.
    fn analyze(&self, page: &PageContext) -> DimensionReport;
}

/// Every rule, in dimension order
pub fn default_rules() -> Vec<Box<dyn DimensionRule>> {
    vec![
        Box::new(TitleRule::new()),
        Box::new(MetaDescriptionRule::new()),
        Box::new(HeadingsRule::new()),
        Box::new(ImagesRule::new()),
        Box::new(LinksRule::new()),
        Box::new(StructuredDataRule::new()),
        Box::new(PerformanceRule::new()),
        Box::new(MobileFriendlyRule::new()),
        Box::new(SeoFundamentalsRule::new()),
        Box::new(ContentQualityRule::new()),
        Box::new(TechnicalSeoRule::new()),
        Box::new(SocialRule::new()),
        Box::new(AccessibilityRule::new()),
        Box::new(CoreWebVitalsRule::new()),
        Box::new(LocalSeoRule::new()),
        Box::new(EcommerceRule::new()),
    ]
}

#[cfg(test)]
pub(crate) fn page(html: &str) -> PageContext {
    page_at("https://example.com/", html)
}

#[cfg(test)]
pub(crate) fn page_at(url: &str, html: &str) -> PageContext {
    PageContext::from_html(url::Url::parse(url).unwrap(), html)
}
