//! Pagelens: on-page SEO quality analyzer
//!
//! This library fetches a single HTML page, scores it across sixteen
//! independent dimensions and combines the results into a weighted total,
//! a letter grade, a prioritized recommendation list and an estimate of how
//! much the page could improve.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod reporter;
pub mod store;

pub use analyzer::improvement::{ImprovementArea, ImprovementPotential};
pub use analyzer::recommendations::{PrioritizedRecommendation, RecommendationSummary};
pub use error::{AnalysisError, ExportError, FetchError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest score any single dimension can reach
pub const MAX_DIMENSION_SCORE: u8 = 10;

/// Issue reported by every dimension when the page never loaded
pub const PAGE_NOT_LOADED: &str = "Page could not be loaded";

/// A scored quality aspect of the page.
///
/// Declaration order is execution order, and therefore the order in which
/// issues and recommendations are flattened into the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Title,
    MetaDescription,
    Headings,
    Images,
    Links,
    StructuredData,
    Performance,
    MobileFriendly,
    SeoFundamentals,
    ContentQuality,
    TechnicalSeo,
    Social,
    Accessibility,
    CoreWebVitals,
    LocalSeo,
    Ecommerce,
}

impl Dimension {
    pub const ALL: [Dimension; 16] = [
        Dimension::Title,
        Dimension::MetaDescription,
        Dimension::Headings,
        Dimension::Images,
        Dimension::Links,
        Dimension::StructuredData,
        Dimension::Performance,
        Dimension::MobileFriendly,
        Dimension::SeoFundamentals,
        Dimension::ContentQuality,
        Dimension::TechnicalSeo,
        Dimension::Social,
        Dimension::Accessibility,
        Dimension::CoreWebVitals,
        Dimension::LocalSeo,
        Dimension::Ecommerce,
    ];

    /// Key used in JSON output and config files
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Title => "title",
            Dimension::MetaDescription => "meta_description",
            Dimension::Headings => "headings",
            Dimension::Images => "images",
            Dimension::Links => "links",
            Dimension::StructuredData => "structured_data",
            Dimension::Performance => "performance",
            Dimension::MobileFriendly => "mobile_friendly",
            Dimension::SeoFundamentals => "seo_fundamentals",
            Dimension::ContentQuality => "content_quality",
            Dimension::TechnicalSeo => "technical_seo",
            Dimension::Social => "social",
            Dimension::Accessibility => "accessibility",
            Dimension::CoreWebVitals => "core_web_vitals",
            Dimension::LocalSeo => "local_seo",
            Dimension::Ecommerce => "ecommerce",
        }
    }

    /// Human-readable name for console output
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Title => "Title",
            Dimension::MetaDescription => "Meta Description",
            Dimension::Headings => "Headings",
            Dimension::Images => "Images",
            Dimension::Links => "Links",
            Dimension::StructuredData => "Structured Data",
            Dimension::Performance => "Performance",
            Dimension::MobileFriendly => "Mobile Friendliness",
            Dimension::SeoFundamentals => "SEO Fundamentals",
            Dimension::ContentQuality => "Content Quality",
            Dimension::TechnicalSeo => "Technical SEO",
            Dimension::Social => "Social",
            Dimension::Accessibility => "Accessibility",
            Dimension::CoreWebVitals => "Core Web Vitals",
            Dimension::LocalSeo => "Local SEO",
            Dimension::Ecommerce => "E-commerce",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Priority attached to a recommendation where it is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// An actionable suggestion produced by a dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub priority: Priority,
}

impl Recommendation {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
        }
    }

    pub fn high(text: impl Into<String>) -> Self {
        Self::new(text, Priority::High)
    }

    pub fn medium(text: impl Into<String>) -> Self {
        Self::new(text, Priority::Medium)
    }

    pub fn low(text: impl Into<String>) -> Self {
        Self::new(text, Priority::Low)
    }
}

/// A named fact recorded by a dimension (counts, flags, measured values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Flag(bool),
    Count(u64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Metric {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Metric::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Metric::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Flag(b) => write!(f, "{}", b),
            Metric::Count(n) => write!(f, "{}", n),
            Metric::Number(n) => write!(f, "{}", n),
            Metric::Text(s) => write!(f, "{}", s),
            Metric::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<bool> for Metric {
    fn from(value: bool) -> Self {
        Metric::Flag(value)
    }
}

impl From<usize> for Metric {
    fn from(value: usize) -> Self {
        Metric::Count(value as u64)
    }
}

impl From<u64> for Metric {
    fn from(value: u64) -> Self {
        Metric::Count(value)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Number(value)
    }
}

impl From<String> for Metric {
    fn from(value: String) -> Self {
        Metric::Text(value)
    }
}

impl From<&str> for Metric {
    fn from(value: &str) -> Self {
        Metric::Text(value.to_string())
    }
}

impl From<Vec<String>> for Metric {
    fn from(value: Vec<String>) -> Self {
        Metric::List(value)
    }
}

/// Result of scoring one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    /// Score in 0..=10
    pub score: u8,
    /// Problems found, in detection order
    pub issues: Vec<String>,
    /// Suggested fixes, in detection order
    pub recommendations: Vec<Recommendation>,
    /// Named facts gathered while scoring
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Metric>,
}

impl DimensionReport {
    /// Build a report from a raw (possibly out-of-range) score.
    pub fn from_parts(
        score: i32,
        issues: Vec<String>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            score: score.clamp(0, MAX_DIMENSION_SCORE as i32) as u8,
            issues,
            recommendations,
            metrics: BTreeMap::new(),
        }
    }

    /// Zero-score report used for every dimension when the page never loaded
    pub fn not_loaded() -> Self {
        Self::from_parts(0, vec![PAGE_NOT_LOADED.to_string()], Vec::new())
    }

    pub fn with_metric(mut self, name: &str, value: impl Into<Metric>) -> Self {
        self.metrics.insert(name.to_string(), value.into());
        self
    }

    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.get(name)
    }

    /// Points missing to the dimension maximum
    pub fn gap(&self) -> u8 {
        MAX_DIMENSION_SCORE.saturating_sub(self.score)
    }
}

/// Letter grade for the weighted total (0.0-10.0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    /// Bands are inclusive on their lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.5 {
            Grade::APlus
        } else if score >= 8.5 {
            Grade::A
        } else if score >= 7.5 {
            Grade::AMinus
        } else if score >= 6.5 {
            Grade::BPlus
        } else if score >= 5.5 {
            Grade::B
        } else if score >= 4.5 {
            Grade::BMinus
        } else if score >= 3.5 {
            Grade::CPlus
        } else if score >= 2.5 {
            Grade::C
        } else if score >= 1.5 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", s)
    }
}

/// The composite result of one successful analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Normalized URL that was analyzed
    pub url: String,
    /// Network location (host plus explicit port)
    pub domain: String,
    /// Local timestamp of the run (RFC 3339)
    pub analyzed_at: String,
    /// One report per dimension, keyed by dimension
    #[serde(flatten)]
    pub dimensions: BTreeMap<Dimension, DimensionReport>,
    /// Weighted mean of dimension scores, one decimal
    pub total_score: f64,
    pub grade: Grade,
    /// Wall-clock seconds for the whole run
    pub analysis_time: f64,
    pub recommendation_summary: RecommendationSummary,
    pub improvement_potential: ImprovementPotential,
}

impl AnalysisReport {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionReport> {
        self.dimensions.get(&dimension)
    }

    /// Total issue count across all dimensions
    pub fn issue_count(&self) -> usize {
        self.dimensions.values().map(|r| r.issues.len()).sum()
    }
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Public API: analyze one URL with the given config.
///
/// * `url` - page address; `https://` is assumed when no scheme is given
/// * `config` - optional loaded configuration; defaults apply when None
pub fn analyze_url(
    url: &str,
    config: Option<&config::Config>,
) -> anyhow::Result<AnalysisReport> {
    let default_config = config::Config::default();
    let config = config.unwrap_or(&default_config);
    let engine = analyzer::AnalysisEngine::from_config(config)?;
    Ok(engine.analyze(url)?)
}
