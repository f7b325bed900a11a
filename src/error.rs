//! Error types for fetching, analysis and export

use thiserror::Error;

/// Why the primary page fetch failed. Each variant maps to a distinct message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Timed out - the site took longer than {0}s to respond")]
    Timeout(u64),

    #[error("Connection error - could not reach the site")]
    Connection,

    #[error("HTTP error: {code} - {reason}")]
    Status { code: u16, reason: String },

    #[error("Empty response from the server")]
    EmptyBody,

    #[error("Could not decode the response body: {0}")]
    Decode(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Could not build the HTTP client: {0}")]
    Client(String),
}

/// Run-level failure: the whole analysis produced no reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Could not load the page: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("No analysis data available to export")]
    NoData,

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
