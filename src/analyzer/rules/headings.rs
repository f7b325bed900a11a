//! Heading structure: H1 usage, heading count and hierarchy

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::{Dimension, DimensionReport, Recommendation};

pub struct HeadingsRule;

impl HeadingsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadingsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRule for HeadingsRule {
    fn dimension(&self) -> Dimension {
        Dimension::Headings
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        // Non-empty heading texts per level, index 0 = H1
        let mut levels: [Vec<String>; 6] = Default::default();
        for (level, text) in page.document.headings() {
            if !text.is_empty() && (1..=6).contains(&level) {
                levels[usize::from(level - 1)].push(text);
            }
        }

        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();
        let h1 = &levels[0];

        if h1.is_empty() {
            issues.push("No H1 tag".to_string());
            recommendations.push(Recommendation::high("Add an H1 heading to the page"));
            score -= 4;
        } else if h1.len() > 1 {
            issues.push(format!("Multiple H1 tags found ({})", h1.len()));
            recommendations.push(Recommendation::high("Use only one H1 per page"));
            score -= 2;
        }

        if h1.first().is_some_and(|text| text.chars().count() > 70) {
            issues.push("H1 too long (> 70 characters)".to_string());
            recommendations.push(Recommendation::high("Shorten the H1 to under 70 characters"));
            score -= 1;
        }

        let total: usize = levels.iter().map(Vec::len).sum();
        if total < 3 {
            issues.push("Few heading tags (< 3)".to_string());
            recommendations.push(Recommendation::low(
                "Use more headings to structure the content",
            ));
            score -= 2;
        } else if total > 20 {
            issues.push("Too many heading tags (> 20)".to_string());
            recommendations.push(Recommendation::low("Reduce the number of headings"));
            score -= 1;
        }

        if !levels[2].is_empty() && levels[1].is_empty() {
            issues.push("H3 used without H2 - broken hierarchy".to_string());
            score -= 1;
        }

        let mut report = DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("total_count", total);
        for (i, texts) in levels.iter().enumerate() {
            report = report.with_metric(&format!("h{}", i + 1), texts.len());
        }
        report.with_metric("h1_text", h1.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn analyze(html: &str) -> DimensionReport {
        HeadingsRule::new().analyze(&page(html))
    }

    #[test]
    fn well_structured_page_is_perfect() {
        let report = analyze("<h1>Boots</h1><h2>Leather</h2><h2>Care</h2><h3>Oiling</h3>");
        assert_eq!(report.score, 10);
        assert!(report.issues.is_empty());
        assert_eq!(report.metric("total_count").and_then(|m| m.as_count()), Some(4));
    }

    #[test]
    fn missing_h1_and_few_headings() {
        let report = analyze("<h2>Only one</h2>");
        // -4 no H1, -2 fewer than three headings
        assert_eq!(report.score, 4);
    }

    #[test]
    fn multiple_h1() {
        let report = analyze("<h1>A</h1><h1>B</h1><h2>C</h2>");
        assert_eq!(report.score, 8);
        assert!(report.issues[0].contains("(2)"));
    }

    #[test]
    fn long_h1() {
        let long = "x".repeat(71);
        let report = analyze(&format!("<h1>{}</h1><h2>a</h2><h2>b</h2>", long));
        assert_eq!(report.score, 9);
    }

    #[test]
    fn h3_without_h2() {
        let report = analyze("<h1>A</h1><h3>B</h3><h3>C</h3>");
        assert_eq!(report.score, 9);
        assert!(report.issues.iter().any(|i| i.contains("H3 used without H2")));
    }

    #[test]
    fn too_many_headings() {
        let body: String = (0..21).map(|i| format!("<h2>Section {}</h2>", i)).collect();
        let report = analyze(&format!("<h1>Title</h1>{}", body));
        assert_eq!(report.score, 9);
    }

    #[test]
    fn empty_headings_are_ignored() {
        let report = analyze("<h1>  </h1><h2></h2><h2>Real</h2>");
        // no non-empty H1 (-4), one heading counted (-2)
        assert_eq!(report.score, 4);
    }

    #[test]
    fn penalties_accumulate() {
        let long = "y".repeat(80);
        let report = analyze(&format!("<h1>{}</h1><h1>b</h1>", long));
        // -2 multiple, -1 long, -2 few
        assert_eq!(report.score, 5);
    }
}
