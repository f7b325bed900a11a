//! Technical SEO: transport security, URL shape, internal linking and
//! render-blocking resources

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};

const MAX_URL_LENGTH: usize = 100;
const URL_UNFRIENDLY_CHARS: &[char] = &['_', '%', '&', '='];
const MAX_BLOCKING_RESOURCES: usize = 3;

pub struct TechnicalSeoRule;

impl TechnicalSeoRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TechnicalSeoRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Stylesheet links plus external scripts anywhere in the document
fn render_blocking_resources(page: &PageContext) -> usize {
    let doc = &page.document;
    doc.count(r#"link[rel~="stylesheet"]"#) + doc.count("script[src]")
}

impl DimensionRule for TechnicalSeoRule {
    fn dimension(&self) -> Dimension {
        Dimension::TechnicalSeo
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let https = page.is_https();
        if !https {
            issues.push("Page is not served over HTTPS".to_string());
            recommendations.push(Recommendation::high("Serve the page over HTTPS"));
            score -= 3;
        }

        let url = page.url.as_str();
        let url_length = url.chars().count();
        if url_length > MAX_URL_LENGTH {
            issues.push(format!(
                "URL too long ({} characters > {})",
                url_length, MAX_URL_LENGTH
            ));
            recommendations.push(Recommendation::low(format!(
                "Keep URLs under {} characters",
                MAX_URL_LENGTH
            )));
            score -= 1;
        }

        if url.contains(URL_UNFRIENDLY_CHARS) {
            issues.push("URL contains underscores, encoded characters or parameters".to_string());
            recommendations.push(Recommendation::low(
                "Use short, hyphenated URLs without query parameters",
            ));
            score -= 1;
        }

        let internal = page.link_stats().internal;
        if internal < 3 {
            issues.push(format!("Only {} internal links", internal));
            recommendations.push(Recommendation::medium(
                "Link to at least three other pages of the site",
            ));
            score -= 2;
        }

        let blocking = render_blocking_resources(page);
        if blocking > MAX_BLOCKING_RESOURCES {
            issues.push(format!("{} render-blocking resources", blocking));
            recommendations.push(Recommendation::medium(
                "Load scripts with async or defer and combine stylesheets to speed up performance",
            ));
            score -= 2;
        }

        let redirected = page.response.final_url != page.url;

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("https", https)
            .with_metric("url_length", url_length)
            .with_metric("internal_links", internal)
            .with_metric("render_blocking_resources", blocking)
            .with_metric("final_url", page.response.final_url.as_str())
            .with_metric("redirected", redirected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::{page, page_at};
    use crate::fetch::{ProbeResults, RawResponse};

    const LINKS: &str = r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#;

    #[test]
    fn clean_https_page_is_perfect() {
        let report = TechnicalSeoRule::new().analyze(&page(LINKS));
        assert_eq!(report.score, 10);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn plain_http_loses_three() {
        let report = TechnicalSeoRule::new().analyze(&page_at("http://example.com/", LINKS));
        assert_eq!(report.score, 7);
        assert_eq!(report.recommendations[0].priority, crate::Priority::High);
    }

    #[test]
    fn long_url_with_parameters() {
        let url = format!("https://example.com/{}?id=1", "segment/".repeat(12));
        let report = TechnicalSeoRule::new().analyze(&page_at(&url, LINKS));
        // -1 length, -1 characters
        assert_eq!(report.score, 8);
    }

    #[test]
    fn underscore_in_path_loses_one() {
        let report =
            TechnicalSeoRule::new().analyze(&page_at("https://example.com/my_page", LINKS));
        assert_eq!(report.score, 9);
    }

    #[test]
    fn few_internal_links_lose_two() {
        let report = TechnicalSeoRule::new().analyze(&page("<p>no links</p>"));
        assert_eq!(report.score, 8);
    }

    #[test]
    fn render_blocking_resources_counted_anywhere() {
        let head = r#"<head>
            <link rel="stylesheet" href="a.css">
            <script src="a.js" defer></script>
            <script src="b.js" async></script>
        </head>"#;
        let body = r#"<link rel="stylesheet" href="late.css">
            <script src="c.js"></script>
            <script type="module" src="d.js"></script>
            <script>inline()</script>"#;
        let report = TechnicalSeoRule::new()
            .analyze(&page(&format!("{}<body>{}{}</body>", head, LINKS, body)));
        assert_eq!(
            report.metric("render_blocking_resources").and_then(|m| m.as_count()),
            Some(6)
        );
        assert_eq!(report.score, 8);
    }

    #[test]
    fn body_level_tags_trip_the_limit() {
        let body = r#"<link rel="stylesheet" href="x.css">
            <script src="1.js"></script><script src="2.js"></script>
            <script src="3.js"></script><script src="4.js"></script>"#;
        let report =
            TechnicalSeoRule::new().analyze(&page(&format!("<body>{}{}</body>", LINKS, body)));
        assert_eq!(
            report.metric("render_blocking_resources").and_then(|m| m.as_count()),
            Some(5)
        );
        assert!(report.issues.iter().any(|i| i.contains("render-blocking")));
        assert_eq!(report.score, 8);
    }

    #[test]
    fn three_resources_are_tolerated() {
        let body = r#"<link rel="stylesheet" href="x.css"><script src="1.js"></script><script src="2.js"></script>"#;
        let report =
            TechnicalSeoRule::new().analyze(&page(&format!("<body>{}{}</body>", LINKS, body)));
        assert_eq!(report.score, 10);
    }

    #[test]
    fn final_url_reported() {
        let report = TechnicalSeoRule::new().analyze(&page(LINKS));
        assert_eq!(
            report.metric("final_url").map(|m| m.to_string()),
            Some("https://example.com/".to_string())
        );
        assert_eq!(report.metric("redirected").and_then(|m| m.as_flag()), Some(false));

        let requested = url::Url::parse("http://example.com/").unwrap();
        let landed = url::Url::parse("https://www.example.com/").unwrap();
        let response = RawResponse::synthetic(landed, LINKS);
        let context = PageContext::new(requested, response, ProbeResults::default());
        let report = TechnicalSeoRule::new().analyze(&context);
        assert_eq!(
            report.metric("final_url").map(|m| m.to_string()),
            Some("https://www.example.com/".to_string())
        );
        assert_eq!(report.metric("redirected").and_then(|m| m.as_flag()), Some(true));
    }
}
