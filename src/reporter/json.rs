//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::AnalysisReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, report: &AnalysisReport) -> String {
        self.render(report, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, reports: &[AnalysisReport]) -> String {
        self.render(reports, "[]")
    }

    /// Report with summary. Failed URLs are listed with their error message.
    pub fn report_with_summary(
        &self,
        reports: &[AnalysisReport],
        failures: &[(String, String)],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonOutput {
            results: reports,
            failures: failures
                .iter()
                .map(|(url, error)| JsonFailure { url, error })
                .collect(),
            summary: stats,
        };
        self.render(&output, "{}")
    }

    /// The error object for a failed run
    pub fn report_error(&self, message: &str) -> String {
        self.render(&JsonError { error: message }, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: &'a [AnalysisReport],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<JsonFailure<'a>>,
    summary: &'a AggregateStats,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    url: &'a str,
    error: &'a str,
}

#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a str,
}
