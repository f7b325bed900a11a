//! Fetching: the primary page request and the auxiliary probes

pub mod client;
pub mod decode;

pub use client::HttpFetcher;

use crate::{AnalysisError, FetchError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,hu;q=0.8";

/// Sitemap locations tried in order; the first 200 wins
pub const SITEMAP_CANDIDATES: [&str; 2] = ["sitemap.xml", "sitemap_index.xml"];

/// Raw outcome of the primary fetch
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// URL after redirects
    pub final_url: Url,
    pub status: u16,
    /// Header names are lowercased
    pub headers: BTreeMap<String, String>,
    /// Decoded document text
    pub body: String,
    /// Size of the decompressed body in bytes
    pub content_length: usize,
    /// Time until the response headers arrived
    pub elapsed: Duration,
}

impl RawResponse {
    /// A response for markup that did not come from the network (no headers, zero latency).
    pub fn synthetic(url: Url, body: &str) -> Self {
        Self {
            final_url: url,
            status: 200,
            headers: BTreeMap::new(),
            body: body.to_string(),
            content_length: body.len(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn page_size_kb(&self) -> f64 {
        self.content_length as f64 / 1024.0
    }
}

/// Result of one auxiliary probe. Any failure counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub exists: bool,
    pub url: String,
    pub status_code: u16,
}

impl ProbeOutcome {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn found(url: &Url, status_code: u16) -> Self {
        Self {
            exists: status_code == 200,
            url: url.to_string(),
            status_code,
        }
    }
}

/// robots.txt and sitemap probe results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeResults {
    pub robots: ProbeOutcome,
    pub sitemap: ProbeOutcome,
}

/// Source of page bytes. Implemented over HTTP by [`HttpFetcher`]; tests supply stubs.
pub trait Fetcher {
    /// Fetch the main document. Called at most once per run.
    fn fetch(&self, url: &Url) -> Result<RawResponse, FetchError>;

    /// Status code of a lightweight GET, or None on any failure.
    fn probe(&self, url: &Url) -> Option<u16>;
}

/// Probe robots.txt and the sitemap candidates under the page origin.
pub fn run_probes(fetcher: &dyn Fetcher, page_url: &Url) -> ProbeResults {
    let robots = match page_url.join("/robots.txt") {
        Ok(robots_url) => match fetcher.probe(&robots_url) {
            Some(code) => ProbeOutcome::found(&robots_url, code),
            None => ProbeOutcome::absent(),
        },
        Err(_) => ProbeOutcome::absent(),
    };

    let mut sitemap = ProbeOutcome::absent();
    for candidate in SITEMAP_CANDIDATES {
        let Ok(sitemap_url) = page_url.join(&format!("/{}", candidate)) else {
            continue;
        };
        if fetcher.probe(&sitemap_url) == Some(200) {
            sitemap = ProbeOutcome::found(&sitemap_url, 200);
            break;
        }
    }

    tracing::debug!(robots = robots.exists, sitemap = sitemap.exists, "probes finished");
    ProbeResults { robots, sitemap }
}

/// Normalize user input into an absolute http(s) URL.
///
/// `https://` is prepended when no scheme is given; anything that still does
/// not parse as a URL with a plausible host is rejected before any request.
pub fn normalize_url(input: &str) -> Result<Url, AnalysisError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidUrl("URL is required".to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url =
        Url::parse(&candidate).map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    match url.host() {
        Some(url::Host::Domain(domain)) => {
            let valid_labels = domain.split('.').all(|label| {
                !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || !c.is_ascii())
            });
            if !valid_labels || (!domain.contains('.') && domain != "localhost") {
                return Err(AnalysisError::InvalidUrl(trimmed.to_string()));
            }
        }
        Some(_) => {}
        None => return Err(AnalysisError::InvalidUrl(trimmed.to_string())),
    }

    Ok(url)
}

/// Network location of a URL: host, plus the port when one is given explicitly.
pub fn network_location(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}

/// Settings for [`HttpFetcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub probe_timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub verify_tls: bool,
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            verify_tls: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}
