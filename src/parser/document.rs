//! Queryable HTML document and the extraction helpers shared by the rules

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeSet;

/// Elements whose text never renders
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Parsed HTML page
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// All elements matching a CSS selector, in document order.
    ///
    /// An unparsable selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::debug!(selector = css, error = %e, "invalid selector");
                Vec::new()
            }
        }
    }

    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        self.select(css).into_iter().next()
    }

    pub fn count(&self, css: &str) -> usize {
        self.select(css).len()
    }

    pub fn exists(&self, css: &str) -> bool {
        self.first(css).is_some()
    }

    /// Trimmed text of the first `<title>`, or None when there is no title tag
    pub fn title_text(&self) -> Option<String> {
        self.first("title").map(|el| element_text(&el).trim().to_string())
    }

    /// Content of the first `<meta name=...>` whose name matches case-insensitively.
    ///
    /// A tag without a content attribute yields an empty string.
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.select("meta[name]")
            .into_iter()
            .find(|el| {
                el.value()
                    .attr("name")
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
            })
            .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
    }

    /// Content of the first `<meta property=...>` with the exact property name
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.select("meta[property]")
            .into_iter()
            .find(|el| el.value().attr("property") == Some(property))
            .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
    }

    /// Every heading element as (level, trimmed text), in document order
    pub fn headings(&self) -> Vec<(u8, String)> {
        self.select("h1, h2, h3, h4, h5, h6")
            .into_iter()
            .filter_map(|el| {
                let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
                Some((level, element_text(&el).trim().to_string()))
            })
            .collect()
    }

    /// Text a reader would see: everything outside script, style, noscript,
    /// template and head, with a space between text nodes.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for node in self.html.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TEXT_PARENTS.contains(&el.name()))
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
        out
    }

    /// Parsed JSON-LD blocks; blank blocks are skipped, malformed ones kept as errors.
    pub fn json_ld_blocks(&self) -> Vec<Result<Value, serde_json::Error>> {
        self.select(r#"script[type="application/ld+json"]"#)
            .into_iter()
            .filter_map(|el| {
                let raw = element_text(&el);
                let raw = raw.trim();
                if raw.is_empty() {
                    None
                } else {
                    Some(serde_json::from_str(raw))
                }
            })
            .collect()
    }

    /// `@type` values declared by the valid JSON-LD blocks, sorted
    pub fn schema_types(&self) -> BTreeSet<String> {
        let mut types = BTreeSet::new();
        for value in self.json_ld_blocks().into_iter().flatten() {
            collect_types(&value, &mut types);
        }
        types
    }
}

fn collect_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => {
                    types.insert(t.clone());
                }
                Some(Value::Array(ts)) => {
                    types.extend(ts.iter().filter_map(Value::as_str).map(str::to_string));
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

/// Concatenated text of an element and its descendants
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// Whether an element's rel attribute contains the given token
pub fn has_rel(el: &ElementRef<'_>, token: &str) -> bool {
    el.value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
}

/// Counts of anchors by destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Anchors carrying an href
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    /// External anchors marked rel=nofollow
    pub nofollow: usize,
}

/// Sort a page's anchors into internal and external.
///
/// Fragment, mailto: and tel: links are ignored. Absolute links are internal
/// when they mention the domain; relative links are internal unless they
/// are javascript: pseudo-links.
pub fn classify_links(doc: &PageDocument, domain: &str) -> LinkStats {
    let mut stats = LinkStats::default();
    for anchor in doc.select("a[href]") {
        stats.total += 1;
        let href = anchor.value().attr("href").unwrap_or_default();

        if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("tel:") {
            continue;
        }

        if href.starts_with("http") {
            if !domain.is_empty() && href.contains(domain) {
                stats.internal += 1;
            } else {
                stats.external += 1;
                if has_rel(&anchor, "nofollow") {
                    stats.nofollow += 1;
                }
            }
        } else if !href.starts_with("javascript:") {
            stats.internal += 1;
        }
    }
    stats
}
