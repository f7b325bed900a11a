//! CSV export: one row per analysis run, fixed column order

use crate::error::ExportError;
use crate::{AnalysisReport, Dimension};
use std::io::Write;
use std::str::FromStr;

const BOM: &str = "\u{feff}";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Column header and where its value comes from
enum Column {
    Url,
    Domain,
    AnalyzedAt,
    TotalScore,
    Grade,
    Score(Dimension),
    Metric(Dimension, &'static str),
    AnalysisTime,
}

const COLUMNS: [(&str, Column); 32] = [
    ("URL", Column::Url),
    ("Domain", Column::Domain),
    ("Analyzed At", Column::AnalyzedAt),
    ("Total Score", Column::TotalScore),
    ("Grade", Column::Grade),
    ("Title Score", Column::Score(Dimension::Title)),
    ("Title Length", Column::Metric(Dimension::Title, "length")),
    ("Title Text", Column::Metric(Dimension::Title, "title")),
    ("Meta Desc Score", Column::Score(Dimension::MetaDescription)),
    ("Meta Desc Length", Column::Metric(Dimension::MetaDescription, "length")),
    ("Headings Score", Column::Score(Dimension::Headings)),
    ("H1 Count", Column::Metric(Dimension::Headings, "h1")),
    ("Total Headings", Column::Metric(Dimension::Headings, "total_count")),
    ("Images Score", Column::Score(Dimension::Images)),
    ("Total Images", Column::Metric(Dimension::Images, "total_images")),
    ("Missing Alt", Column::Metric(Dimension::Images, "missing_alt")),
    ("Links Score", Column::Score(Dimension::Links)),
    ("Internal Links", Column::Metric(Dimension::Links, "internal_links")),
    ("External Links", Column::Metric(Dimension::Links, "external_links")),
    ("Structured Data Score", Column::Score(Dimension::StructuredData)),
    ("Valid JSON-LD", Column::Metric(Dimension::StructuredData, "valid_json_ld")),
    ("Schema Types", Column::Metric(Dimension::StructuredData, "schema_types")),
    ("Performance Score", Column::Score(Dimension::Performance)),
    ("Page Size (KB)", Column::Metric(Dimension::Performance, "page_size_kb")),
    ("Load Time (s)", Column::Metric(Dimension::Performance, "load_time_seconds")),
    ("Mobile Score", Column::Score(Dimension::MobileFriendly)),
    ("Has Viewport", Column::Metric(Dimension::MobileFriendly, "has_viewport")),
    ("Responsive Images", Column::Metric(Dimension::MobileFriendly, "responsive_images")),
    ("SEO Fundamentals Score", Column::Score(Dimension::SeoFundamentals)),
    ("Robots.txt", Column::Metric(Dimension::SeoFundamentals, "robots_txt")),
    ("Sitemap", Column::Metric(Dimension::SeoFundamentals, "sitemap")),
    ("Analysis Time (s)", Column::AnalysisTime),
];

impl Column {
    fn value(&self, report: &AnalysisReport) -> String {
        match self {
            Column::Url => report.url.clone(),
            Column::Domain => report.domain.clone(),
            Column::AnalyzedAt => report.analyzed_at.clone(),
            Column::TotalScore => report.total_score.to_string(),
            Column::Grade => report.grade.to_string(),
            Column::Score(d) => report
                .dimension(*d)
                .map(|r| r.score.to_string())
                .unwrap_or_else(|| "0".to_string()),
            Column::Metric(d, name) => report
                .dimension(*d)
                .and_then(|r| r.metric(name))
                .map(ToString::to_string)
                .unwrap_or_default(),
            Column::AnalysisTime => report.analysis_time.to_string(),
        }
    }
}

/// Header names in export order
pub fn headers() -> Vec<&'static str> {
    COLUMNS.iter().map(|(name, _)| *name).collect()
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    write!(w, "\r\n")
}

/// Writes analysis reports as CSV
pub struct CsvExporter {
    /// Prefix the output with a UTF-8 byte order mark
    bom: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { bom: true }
    }

    pub fn without_bom(mut self) -> Self {
        self.bom = false;
        self
    }

    /// Write a header line and one row per report
    pub fn export<W: Write>(&self, mut w: W, reports: &[AnalysisReport]) -> Result<(), ExportError> {
        if reports.is_empty() {
            return Err(ExportError::NoData);
        }
        if self.bom {
            write!(w, "{}", BOM)?;
        }
        write_row(&mut w, &headers())?;
        for report in reports {
            let row: Vec<String> = COLUMNS.iter().map(|(_, col)| col.value(report)).collect();
            write_row(&mut w, &row)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn export_string(&self, reports: &[AnalysisReport]) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.export(&mut buf, reports)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisEngine;
    use crate::error::FetchError;
    use crate::fetch::{Fetcher, RawResponse};
    use url::Url;

    struct Offline;

    impl Fetcher for Offline {
        fn fetch(&self, _url: &Url) -> Result<RawResponse, FetchError> {
            Err(FetchError::Connection)
        }

        fn probe(&self, _url: &Url) -> Option<u16> {
            None
        }
    }

    fn sample() -> AnalysisReport {
        AnalysisEngine::new(Box::new(Offline))
            .analyze_source(
                "https://shop.example.com/",
                r#"<html><head><title>Chairs, "Tables" and more</title></head>
                <body><h1>Chairs</h1><img src="a.jpg"></body></html>"#,
            )
            .unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "pdf"));
    }

    #[test]
    fn test_header_order() {
        let h = headers();
        assert_eq!(h.len(), 32);
        assert_eq!(h[0], "URL");
        assert_eq!(h[4], "Grade");
        assert_eq!(h[31], "Analysis Time (s)");
    }

    #[test]
    fn test_export_starts_with_bom_and_quotes_fields() {
        let out = CsvExporter::new().export_string(&[sample()]).unwrap();
        assert!(out.starts_with(BOM));

        let lines: Vec<&str> = out.trim_start_matches(BOM).split("\r\n").collect();
        assert!(lines[0].starts_with("URL,Domain,Analyzed At,Total Score,Grade"));
        assert!(lines[1].starts_with("https://shop.example.com/,shop.example.com,"));
        assert!(lines[1].contains(r#""Chairs, ""Tables"" and more""#));
    }

    #[test]
    fn test_one_row_per_report() {
        let out = CsvExporter::new()
            .without_bom()
            .export_string(&[sample(), sample()])
            .unwrap();
        assert!(!out.starts_with(BOM));
        assert_eq!(out.trim_end().split("\r\n").count(), 3);
    }

    #[test]
    fn test_no_data_is_error() {
        let err = CsvExporter::new().export_string(&[]).unwrap_err();
        assert!(matches!(err, ExportError::NoData));
    }
}
