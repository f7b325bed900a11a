//! Analysis engine - orchestrates fetch, probes and all dimension rules

use crate::config::Config;
use crate::error::AnalysisError;
use crate::fetch::{normalize_url, run_probes, Fetcher, HttpFetcher, ProbeResults};
use crate::{
    round1, round2, AnalysisReport, Dimension, DimensionReport, ImprovementPotential,
    RecommendationSummary,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::time::Instant;

use super::context::{PageContext, PageState};
use super::rules::{default_rules, DimensionRule};
use super::scoring::{ScoreCalculator, WeightTable};

/// Main analysis engine that orchestrates all rules
pub struct AnalysisEngine {
    fetcher: Box<dyn Fetcher + Send + Sync>,
    weights: WeightTable,
    /// Whether to probe robots.txt and sitemaps after the page fetch
    probes_enabled: bool,
    rules: Vec<Box<dyn DimensionRule>>,
}

impl AnalysisEngine {
    /// Create an engine over the given fetcher with default weights and all rules
    pub fn new(fetcher: Box<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            weights: WeightTable::default(),
            probes_enabled: true,
            rules: default_rules(),
        }
    }

    /// HTTP-backed engine configured from a loaded config
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch_settings())
            .context("Failed to build HTTP client")?;
        let weights = config.weight_table()?;
        let engine = Self::new(Box::new(fetcher)).with_weights(weights);
        Ok(if config.probes_enabled() {
            engine
        } else {
            engine.without_probes()
        })
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    /// Skip robots.txt and sitemap probes; both are reported as absent
    pub fn without_probes(mut self) -> Self {
        self.probes_enabled = false;
        self
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Analyze one URL: fetch, probe, run every rule, aggregate.
    ///
    /// A fetch failure fails the whole run; no rule is invoked.
    pub fn analyze(&self, input: &str) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        let url = normalize_url(input)?;
        tracing::debug!(url = %url, "analysis started");

        let response = self.fetcher.fetch(&url).map_err(|e| {
            tracing::debug!(url = %url, error = %e, "fetch failed");
            AnalysisError::Fetch(e)
        })?;
        tracing::debug!(
            url = %url,
            status = response.status,
            bytes = response.content_length,
            "page fetched"
        );

        let probes = if self.probes_enabled {
            run_probes(self.fetcher.as_ref(), &url)
        } else {
            ProbeResults::default()
        };

        let state = PageState::loaded(PageContext::new(url, response, probes));
        Ok(self.report(&state, started))
    }

    /// Analyze markup that is already in memory. No network access; headers
    /// and probes are empty and the load time is zero.
    pub fn analyze_source(&self, input: &str, html: &str) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        let url = normalize_url(input)?;
        let state = PageState::loaded(PageContext::from_html(url, html));
        Ok(self.report(&state, started))
    }

    /// Run every rule against the page. An unloaded page yields the
    /// not-loaded report for every dimension.
    pub fn evaluate(&self, state: &PageState) -> BTreeMap<Dimension, DimensionReport> {
        let Some(page) = state.context() else {
            return Dimension::ALL
                .into_iter()
                .map(|d| (d, DimensionReport::not_loaded()))
                .collect();
        };

        self.rules
            .iter()
            .map(|rule| {
                let report = rule.analyze(page);
                tracing::debug!(
                    dimension = %rule.dimension(),
                    score = report.score,
                    issues = report.issues.len(),
                    "dimension scored"
                );
                (rule.dimension(), report)
            })
            .collect()
    }

    fn report(&self, state: &PageState, started: Instant) -> AnalysisReport {
        let dimensions = self.evaluate(state);
        let total_score = ScoreCalculator::total(&dimensions, &self.weights);
        let grade = ScoreCalculator::grade(total_score);
        let recommendation_summary = RecommendationSummary::build(&dimensions);
        let improvement_potential = ImprovementPotential::calculate(&dimensions);

        let (url, domain) = match state.context() {
            Some(page) => (page.url.to_string(), page.domain.clone()),
            None => (String::new(), String::new()),
        };
        let analysis_time = round2(started.elapsed().as_secs_f64());
        tracing::debug!(url = %url, total_score, grade = %grade, analysis_time, "analysis finished");

        AnalysisReport {
            url,
            domain,
            analyzed_at: chrono::Local::now().to_rfc3339(),
            dimensions,
            total_score,
            grade,
            analysis_time,
            recommendation_summary,
            improvement_potential,
        }
    }

    /// Analyze several URLs sequentially
    pub fn analyze_many(&self, urls: &[&str]) -> Vec<Result<AnalysisReport, AnalysisError>> {
        urls.iter().map(|u| self.analyze(u)).collect()
    }

    /// Analyze several URLs in parallel using rayon. Results keep input order.
    pub fn analyze_parallel(&self, urls: &[String]) -> Vec<Result<AnalysisReport, AnalysisError>> {
        use rayon::prelude::*;

        urls.par_iter().map(|u| self.analyze(u)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AnalysisReport]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total: f64 = results.iter().map(|r| r.total_score).sum();
        let total_issues: usize = results.iter().map(|r| r.issue_count()).sum();
        let total_recommendations: usize = results
            .iter()
            .map(|r| r.recommendation_summary.total_recommendations)
            .sum();

        AggregateStats {
            pages_analyzed: results.len(),
            average_score: round1(total / results.len() as f64),
            total_issues,
            total_recommendations,
        }
    }
}

/// Aggregate statistics from multiple page analyses
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct AggregateStats {
    pub pages_analyzed: usize,
    /// Mean of the total scores, one decimal
    pub average_score: f64,
    pub total_issues: usize,
    pub total_recommendations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetch::RawResponse;
    use crate::{Grade, PAGE_NOT_LOADED};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    const GOOD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head>
<title>Handmade Oak Furniture for Your Home | Example</title>
<meta name="description" content="Discover handmade oak tables, chairs and shelves built to last for generations. Browse the catalogue and contact us today for a free quote.">
<meta name="viewport" content="width=device-width, initial-scale=1">
</head><body><h1>Oak furniture</h1><h2>Tables</h2><h2>Chairs</h2></body></html>"#;

    /// Serves one body for every URL and counts calls
    struct StubFetcher {
        body: Option<&'static str>,
        fetches: Arc<AtomicUsize>,
        probes: Arc<AtomicUsize>,
    }

    impl StubFetcher {
        fn serving(body: &'static str) -> Self {
            Self {
                body: Some(body),
                fetches: Arc::new(AtomicUsize::new(0)),
                probes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn timing_out() -> Self {
            Self {
                body: None,
                ..Self::serving("")
            }
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<RawResponse, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(RawResponse::synthetic(url.clone(), body)
                    .with_header("content-encoding", "gzip")
                    .with_elapsed(Duration::from_millis(300))),
                None => Err(FetchError::Timeout(20)),
            }
        }

        fn probe(&self, _url: &Url) -> Option<u16> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Some(200)
        }
    }

    #[test]
    fn test_analyze_produces_every_dimension() {
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let report = engine.analyze("example.com").unwrap();

        assert_eq!(report.url, "https://example.com/");
        assert_eq!(report.domain, "example.com");
        assert_eq!(report.dimensions.len(), Dimension::ALL.len());
        for (dimension, dim_report) in &report.dimensions {
            assert!(dim_report.score <= 10, "{} out of range", dimension);
        }
        assert!((0.0..=10.0).contains(&report.total_score));
        assert_eq!(report.grade, Grade::from_score(report.total_score));
    }

    #[test]
    fn test_probes_reach_fundamentals() {
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let report = engine.analyze("https://example.com/").unwrap();
        let fundamentals = report.dimension(Dimension::SeoFundamentals).unwrap();
        // robots + sitemap found, nothing else present
        assert_eq!(fundamentals.score, 4);
    }

    #[test]
    fn test_without_probes_skips_probe_requests() {
        let stub = StubFetcher::serving(GOOD_PAGE);
        let probes = Arc::clone(&stub.probes);
        let engine = AnalysisEngine::new(Box::new(stub)).without_probes();
        let report = engine.analyze("https://example.com/").unwrap();

        assert_eq!(probes.load(Ordering::SeqCst), 0);
        assert_eq!(report.dimension(Dimension::SeoFundamentals).unwrap().score, 0);
    }

    #[test]
    fn test_fetch_failure_is_run_level_error() {
        let stub = StubFetcher::timing_out();
        let probes = Arc::clone(&stub.probes);
        let engine = AnalysisEngine::new(Box::new(stub));
        let err = engine.analyze("https://slow.example.com").unwrap_err();

        assert!(matches!(err, AnalysisError::Fetch(FetchError::Timeout(20))));
        assert!(err.to_string().contains("Timed out"));
        assert_eq!(probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_url_never_fetches() {
        let stub = StubFetcher::serving(GOOD_PAGE);
        let fetches = Arc::clone(&stub.fetches);
        let engine = AnalysisEngine::new(Box::new(stub));

        let err = engine.analyze("not a url").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl(_)));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unloaded_state_reports_not_loaded() {
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let dims = engine.evaluate(&PageState::Unloaded);
        assert_eq!(dims.len(), 16);
        assert!(dims
            .values()
            .all(|r| r.score == 0 && r.issues == vec![PAGE_NOT_LOADED.to_string()]));
    }

    #[test]
    fn test_repeat_analysis_is_deterministic() {
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let first = engine.analyze("https://example.com/").unwrap();
        let second = engine.analyze("https://example.com/").unwrap();

        assert_eq!(first.dimensions, second.dimensions);
        assert_eq!(first.total_score, second.total_score);
        assert_eq!(first.recommendation_summary, second.recommendation_summary);
        assert_eq!(first.improvement_potential, second.improvement_potential);
    }

    #[test]
    fn test_zero_weight_dimension_is_excluded() {
        let all_but_title = Dimension::ALL
            .into_iter()
            .filter(|d| *d != Dimension::Title)
            .fold(WeightTable::default(), |t, d| t.with(d, 0.0));
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)))
            .with_weights(all_but_title);
        let report = engine.analyze("https://example.com/").unwrap();

        let title = report.dimension(Dimension::Title).unwrap().score;
        assert_eq!(report.total_score, f64::from(title));
    }

    #[test]
    fn test_analyze_source_needs_no_fetch() {
        let stub = StubFetcher::timing_out();
        let fetches = Arc::clone(&stub.fetches);
        let engine = AnalysisEngine::new(Box::new(stub));
        let report = engine
            .analyze_source("https://example.com/", GOOD_PAGE)
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(report.dimension(Dimension::Title).unwrap().score, 10);
    }

    #[test]
    fn test_analyze_many_and_parallel_keep_order() {
        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let sequential = engine.analyze_many(&["a.example.com", "bad url", "b.example.com"]);
        assert_eq!(sequential.len(), 3);
        assert!(sequential[1].is_err());

        let urls = vec!["a.example.com".to_string(), "b.example.com".to_string()];
        let parallel = engine.analyze_parallel(&urls);
        let domains: Vec<String> = parallel
            .into_iter()
            .map(|r| r.unwrap().domain)
            .collect();
        assert_eq!(domains, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_aggregate_stats() {
        assert_eq!(AnalysisEngine::aggregate_stats(&[]), AggregateStats::default());

        let engine = AnalysisEngine::new(Box::new(StubFetcher::serving(GOOD_PAGE)));
        let r1 = engine.analyze("https://example.com/").unwrap();
        let mut r2 = r1.clone();
        r2.total_score = 3.0;

        let stats = AnalysisEngine::aggregate_stats(&[r1.clone(), r2]);
        assert_eq!(stats.pages_analyzed, 2);
        assert_eq!(stats.average_score, round1((r1.total_score + 3.0) / 2.0));
        assert_eq!(stats.total_issues, r1.issue_count() * 2);
    }
}
