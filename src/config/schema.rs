//! Config schema and deserialization

use crate::analyzer::scoring::WeightTable;
use crate::fetch::FetchSettings;
use crate::Dimension;
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP client settings. Unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchConfig {
    /// Timeout for the page request in seconds. Default: 20
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Timeout for robots.txt and sitemap probes in seconds. Default: 5
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub accept_language: Option<String>,

    /// Verify TLS certificates. Default: false
    #[serde(default)]
    pub verify_tls: Option<bool>,

    /// Maximum redirects to follow. Default: 10
    #[serde(default)]
    pub max_redirects: Option<usize>,
}

impl FetchConfig {
    fn merge_from(&mut self, base: FetchConfig) {
        self.timeout_secs = self.timeout_secs.or(base.timeout_secs);
        self.probe_timeout_secs = self.probe_timeout_secs.or(base.probe_timeout_secs);
        self.user_agent = self.user_agent.take().or(base.user_agent);
        self.accept_language = self.accept_language.take().or(base.accept_language);
        self.verify_tls = self.verify_tls.or(base.verify_tls);
        self.max_redirects = self.max_redirects.or(base.max_redirects);
    }
}

/// Root config structure for .pagelensrc.json
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum total score (exit 1 if below). Default: none
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Per-dimension weight overrides, keyed by dimension key. 0 disables a dimension.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,

    /// Probe robots.txt and sitemaps. Default: true
    #[serde(default)]
    pub probes: Option<bool>,

    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>, no_probes: bool) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if no_probes {
            self.probes = Some(false);
        }
        self
    }

    pub fn probes_enabled(&self) -> bool {
        self.probes.unwrap_or(true)
    }

    /// Default weights with this config's overrides applied
    pub fn weight_table(&self) -> Result<WeightTable> {
        let mut table = WeightTable::default();
        for (key, weight) in &self.weights {
            let Some(dimension) = Dimension::from_key(key) else {
                anyhow::bail!("Unknown dimension in weights: {}", key);
            };
            if !weight.is_finite() || *weight < 0.0 {
                anyhow::bail!("Invalid weight for {}: {}", key, weight);
            }
            table.set(dimension, *weight);
        }
        Ok(table)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        let fetch = &self.fetch;
        FetchSettings {
            timeout: fetch
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            probe_timeout: fetch
                .probe_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_timeout),
            user_agent: fetch.user_agent.clone().unwrap_or(defaults.user_agent),
            accept_language: fetch
                .accept_language
                .clone()
                .unwrap_or(defaults.accept_language),
            verify_tls: fetch.verify_tls.unwrap_or(defaults.verify_tls),
            max_redirects: fetch.max_redirects.unwrap_or(defaults.max_redirects),
        }
    }

    /// Merge a base config into this one. This config's values win.
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.probes.is_none() {
            self.probes = base.probes;
        }
        for (key, weight) in base.weights {
            self.weights.entry(key).or_insert(weight);
        }
        self.fetch.merge_from(base.fetch);
    }
}
