//! Accessibility basics: document language, heading order and form labels

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};
use scraper::ElementRef;
use std::collections::HashSet;

/// Input types that need no visible label
const UNLABELED_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];
const MAX_LABEL_PENALTY: usize = 3;

pub struct AccessibilityRule;

impl AccessibilityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccessibilityRule {
    fn default() -> Self {
        Self::new()
    }
}

fn is_labeled(control: &ElementRef<'_>, label_targets: &HashSet<String>) -> bool {
    let el = control.value();
    let has_attr = |name: &str| el.attr(name).is_some_and(|v| !v.trim().is_empty());
    if has_attr("aria-label") || has_attr("aria-labelledby") || has_attr("title") {
        return true;
    }
    if el.id().is_some_and(|id| label_targets.contains(id)) {
        return true;
    }
    control.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|parent| parent.name() == "label")
    })
}

/// First pair of consecutive headings that skips a level, e.g. (1, 3)
fn first_level_skip(levels: &[u8]) -> Option<(u8, u8)> {
    levels
        .windows(2)
        .find(|pair| pair[1] > pair[0] + 1)
        .map(|pair| (pair[0], pair[1]))
}

impl DimensionRule for AccessibilityRule {
    fn dimension(&self) -> Dimension {
        Dimension::Accessibility
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let lang = doc
            .first("html")
            .and_then(|html| html.value().attr("lang"))
            .map(|lang| lang.trim().to_string())
            .unwrap_or_default();
        if lang.is_empty() {
            issues.push("Missing lang attribute on the <html> element".to_string());
            recommendations.push(Recommendation::low(
                "Declare the page language with <html lang=\"...\">",
            ));
            score -= 2;
        }

        let levels: Vec<u8> = doc.headings().into_iter().map(|(level, _)| level).collect();
        let skip = first_level_skip(&levels);
        if let Some((from, to)) = skip {
            issues.push(format!("Heading level skipped (H{} to H{})", from, to));
            recommendations.push(Recommendation::low(
                "Keep heading levels sequential for screen readers",
            ));
            score -= 1;
        }

        let label_targets: HashSet<String> = doc
            .select("label[for]")
            .iter()
            .filter_map(|label| label.value().attr("for"))
            .map(|target| target.trim().to_string())
            .collect();
        let unlabeled = doc
            .select("input, select, textarea")
            .iter()
            .filter(|control| {
                let el = control.value();
                let exempt = el.name() == "input"
                    && el.attr("type").is_some_and(|t| {
                        UNLABELED_INPUT_TYPES.contains(&t.trim().to_ascii_lowercase().as_str())
                    });
                !exempt && !is_labeled(control, &label_targets)
            })
            .count();
        if unlabeled > 0 {
            issues.push(format!("{} form controls without a label", unlabeled));
            recommendations.push(Recommendation::low(
                "Associate every form control with a label",
            ));
            score -= unlabeled.min(MAX_LABEL_PENALTY) as i32;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("lang", lang)
            .with_metric("heading_skip", skip.is_some())
            .with_metric("unlabeled_controls", unlabeled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn analyze(html: &str) -> DimensionReport {
        AccessibilityRule::new().analyze(&page(html))
    }

    #[test]
    fn accessible_page_is_perfect() {
        let report = analyze(
            r#"<html lang="en"><body><h1>A</h1><h2>B</h2><h3>C</h3><h2>D</h2>
               <label for="email">Email</label><input id="email" type="email">
               <label>Name <input type="text"></label>
               <input type="search" aria-label="Search">
               <input type="hidden" name="csrf"><input type="submit">
               </body></html>"#,
        );
        assert_eq!(report.score, 10);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn missing_lang_loses_two() {
        let report = analyze("<html><body><p>x</p></body></html>");
        assert_eq!(report.score, 8);
    }

    #[test]
    fn only_first_heading_skip_counts() {
        let report = analyze(r#"<html lang="en"><h1>A</h1><h3>B</h3><h1>C</h1><h4>D</h4></html>"#);
        assert_eq!(report.score, 9);
        assert_eq!(report.issues, vec!["Heading level skipped (H1 to H3)".to_string()]);
    }

    #[test]
    fn unlabeled_controls_cap_at_three() {
        let controls = r#"<input type="text"><select></select><textarea></textarea><input><input type="email">"#;
        let report = analyze(&format!(r#"<html lang="hu"><body>{}</body></html>"#, controls));
        assert_eq!(report.score, 7);
        assert_eq!(report.metric("unlabeled_controls").and_then(|m| m.as_count()), Some(5));
    }

    #[test]
    fn first_level_skip_helper() {
        assert_eq!(first_level_skip(&[1, 2, 3, 2, 4]), Some((2, 4)));
        assert_eq!(first_level_skip(&[2, 1, 2]), None);
        assert_eq!(first_level_skip(&[]), None);
    }
}
