//! Blocking HTTP fetcher built on reqwest

use super::decode::{decode_body, decompress};
use super::{FetchSettings, Fetcher, RawResponse};
use crate::FetchError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT};
use std::collections::BTreeMap;
use std::time::Instant;
use url::Url;

/// Fetches pages with browser-like headers.
///
/// Two clients are kept: one for the main document and a short-timeout one
/// for robots.txt and sitemap probes.
pub struct HttpFetcher {
    client: Client,
    probe_client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = build_client(settings, settings.timeout)?;
        let probe_client = build_client(settings, settings.probe_timeout)?;
        Ok(Self {
            client,
            probe_client,
            timeout_secs: settings.timeout.as_secs(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            FetchError::Connection
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

fn build_client(settings: &FetchSettings, timeout: std::time::Duration) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    // Decompression happens in fetch::decode so the Content-Encoding header stays visible
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    if let Ok(value) = HeaderValue::from_str(&settings.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&settings.user_agent) {
        headers.insert(USER_AGENT, value);
    }

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
        .danger_accept_invalid_certs(!settings.verify_tls)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<RawResponse, FetchError> {
        tracing::debug!(%url, "fetching page");
        let start = Instant::now();
        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| self.classify(e))?;
        let elapsed = start.elapsed();

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let final_url = response.url().clone();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        let raw = response.bytes().map_err(|e| self.classify(e))?;
        let bytes = decompress(&raw, headers.get("content-encoding").map(String::as_str))?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        let body = decode_body(&bytes, headers.get("content-type").map(String::as_str));

        tracing::debug!(
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "page fetched"
        );

        Ok(RawResponse {
            final_url,
            status: status.as_u16(),
            headers,
            content_length: bytes.len(),
            body,
            elapsed,
        })
    }

    fn probe(&self, url: &Url) -> Option<u16> {
        match self.probe_client.get(url.as_str()).send() {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                tracing::debug!(%url, error = %e, "probe failed");
                None
            }
        }
    }
}
