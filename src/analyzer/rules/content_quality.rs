//! Content depth: word count, paragraphs and sentence length

use super::DimensionRule;
use crate::analyzer::context::PageContext;
use crate::parser::document::element_text;
use crate::{round1, Dimension, DimensionReport, Recommendation};

const MIN_WORDS: usize = 300;
const THIN_WORDS: usize = 150;
const MIN_PARAGRAPHS: usize = 3;
const MAX_AVG_SENTENCE_WORDS: f64 = 25.0;

pub struct ContentQualityRule;

impl ContentQualityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContentQualityRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Average words per sentence, splitting on terminal punctuation
fn average_sentence_length(text: &str) -> f64 {
    let lengths: Vec<usize> = text
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(|sentence| sentence.split_whitespace().count())
        .filter(|&words| words > 0)
        .collect();
    if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    }
}

impl DimensionRule for ContentQualityRule {
    fn dimension(&self) -> Dimension {
        Dimension::ContentQuality
    }

    fn analyze(&self, page: &PageContext) -> DimensionReport {
        let doc = &page.document;
        let text = doc.visible_text();
        let word_count = text.split_whitespace().count();

        let mut score: i32 = 10;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if word_count < THIN_WORDS {
            issues.push(format!(
                "Very thin content ({} words < {})",
                word_count, THIN_WORDS
            ));
            recommendations.push(Recommendation::low(format!(
                "Expand the page content to at least {} words",
                MIN_WORDS
            )));
            score -= 8;
        } else if word_count < MIN_WORDS {
            issues.push(format!("Thin content ({} words < {})", word_count, MIN_WORDS));
            recommendations.push(Recommendation::low(format!(
                "Expand the page content to at least {} words",
                MIN_WORDS
            )));
            score -= 3;
        }

        let paragraphs = doc
            .select("p")
            .iter()
            .filter(|p| !element_text(p).trim().is_empty())
            .count();
        if paragraphs < MIN_PARAGRAPHS {
            issues.push(format!(
                "Few paragraphs ({} < {})",
                paragraphs, MIN_PARAGRAPHS
            ));
            recommendations.push(Recommendation::low(
                "Break the content into more paragraphs",
            ));
            score -= 2;
        }

        let avg_sentence = average_sentence_length(&text);
        if avg_sentence > MAX_AVG_SENTENCE_WORDS {
            issues.push(format!(
                "Long sentences (average {:.1} words)",
                avg_sentence
            ));
            recommendations.push(Recommendation::low(
                "Use shorter sentences to improve readability",
            ));
            score -= 1;
        }

        DimensionReport::from_parts(score, issues, recommendations)
            .with_metric("word_count", word_count)
            .with_metric("paragraph_count", paragraphs)
            .with_metric("avg_sentence_length", round1(avg_sentence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::page;

    fn paragraphs(count: usize, words_per_sentence: usize, sentences: usize) -> String {
        let sentence = format!("{}.", vec!["word"; words_per_sentence].join(" "));
        let para = vec![sentence; sentences].join(" ");
        (0..count).map(|_| format!("<p>{}</p>", para)).collect()
    }

    fn analyze(html: &str) -> DimensionReport {
        ContentQualityRule::new().analyze(&page(html))
    }

    #[test]
    fn average_sentence_length_ignores_empty_fragments() {
        assert_eq!(average_sentence_length("One two. Three four five six!  ?"), 3.0);
        assert_eq!(average_sentence_length(""), 0.0);
    }

    #[test]
    fn substantial_content_is_perfect() {
        // 4 paragraphs x 8 sentences x 10 words = 320 words
        let report = analyze(&paragraphs(4, 10, 8));
        assert_eq!(report.score, 10);
        assert_eq!(report.metric("word_count").and_then(|m| m.as_count()), Some(320));
    }

    #[test]
    fn thin_content_loses_three() {
        // 3 x 4 x 20 = 240 words
        let report = analyze(&paragraphs(3, 20, 4));
        assert_eq!(report.score, 7);
    }

    #[test]
    fn very_thin_content_loses_eight() {
        let report = analyze(&paragraphs(3, 10, 1));
        assert_eq!(report.score, 2);
    }

    #[test]
    fn empty_page_floors_at_zero() {
        let report = analyze("");
        // -8 words, -2 paragraphs
        assert_eq!(report.score, 0);
    }

    #[test]
    fn long_sentences_lose_one() {
        // 3 x 4 x 30 = 360 words
        let report = analyze(&paragraphs(3, 30, 4));
        assert_eq!(report.score, 9);
        assert!(report.issues[0].contains("30.0"));
    }

    #[test]
    fn scripts_do_not_count_as_content() {
        let script = format!("<script>{}</script>", "var a = 1; ".repeat(200));
        let report = analyze(&format!("{}{}", script, paragraphs(4, 10, 8)));
        assert_eq!(report.metric("word_count").and_then(|m| m.as_count()), Some(320));
    }
}
