//! What the rules see: the analysis target and its fetch outcome

use crate::fetch::{network_location, ProbeResults, RawResponse};
use crate::parser::{classify_links, LinkStats, PageDocument};
use url::Url;

/// A successfully fetched page, read-only for the rules
pub struct PageContext {
    /// Normalized URL that was requested
    pub url: Url,
    /// Host plus explicit port, lowercased
    pub domain: String,
    pub document: PageDocument,
    pub response: RawResponse,
    pub probes: ProbeResults,
}

impl PageContext {
    pub fn new(url: Url, response: RawResponse, probes: ProbeResults) -> Self {
        let domain = network_location(&url);
        let document = PageDocument::parse(&response.body);
        Self {
            url,
            domain,
            document,
            response,
            probes,
        }
    }

    /// Context for markup that was not fetched: no headers, no probes, zero latency.
    pub fn from_html(url: Url, html: &str) -> Self {
        let response = RawResponse::synthetic(url.clone(), html);
        Self::new(url, response, ProbeResults::default())
    }

    pub fn link_stats(&self) -> LinkStats {
        classify_links(&self.document, &self.domain)
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }
}

/// Outcome of the fetch phase. Rules only ever run against a loaded page.
pub enum PageState {
    Loaded(Box<PageContext>),
    Unloaded,
}

impl PageState {
    pub fn loaded(context: PageContext) -> Self {
        PageState::Loaded(Box::new(context))
    }

    pub fn context(&self) -> Option<&PageContext> {
        match self {
            PageState::Loaded(ctx) => Some(ctx),
            PageState::Unloaded => None,
        }
    }
}
