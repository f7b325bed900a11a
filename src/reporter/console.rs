//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::{ScoreCalculator, WeightTable};
use crate::{AnalysisReport, Grade, Priority, MAX_DIMENSION_SCORE};
use colored::Colorize;

/// Issues shown per dimension unless verbose
const ISSUES_PER_DIMENSION: usize = 2;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, report: &AnalysisReport, weights: &WeightTable) {
        self.print_header(report);
        self.print_score(report);
        self.print_breakdown(report, weights);

        if report.issue_count() > 0 {
            self.print_issues(report);
        }

        self.print_recommendations(report);
        self.print_improvement(report);
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(
        &self,
        reports: &[AnalysisReport],
        weights: &WeightTable,
        stats: &AggregateStats,
    ) {
        for report in reports {
            self.report(report, weights);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, report: &AnalysisReport) {
        println!(
            "{}: {:.1} ({})",
            report.url,
            report.total_score,
            self.colorize_grade(report.grade)
        );
    }

    /// Report a failed run
    pub fn report_failure(&self, url: &str, message: &str) {
        println!("{} {}: {}", "✗".red(), url, message);
    }

    fn print_header(&self, report: &AnalysisReport) {
        println!();
        println!("{}", format!("📊 SEO Analysis: {}", report.url).bold());
        println!(
            "   Domain: {} | Analyzed: {} | Took: {:.2}s",
            report.domain, report.analyzed_at, report.analysis_time
        );
        println!();
    }

    fn print_score(&self, report: &AnalysisReport) {
        let grade_str = self.colorize_grade(report.grade);
        let score_bar = self.create_score_bar(report.total_score);

        println!("   Score: {} {}", score_bar, grade_str.bold());
        println!(
            "   {}",
            ScoreCalculator::grade_description(report.grade).dimmed()
        );
        println!();
    }

    fn print_breakdown(&self, report: &AnalysisReport, weights: &WeightTable) {
        println!("   {}", "Score Breakdown:".bold());

        for entry in ScoreCalculator::breakdown(&report.dimensions, weights) {
            let bar = self.create_mini_bar(entry.score);
            let score_str = format!("{:>2}/{}", entry.score, MAX_DIMENSION_SCORE);
            let colored_score = if entry.score >= 8 {
                score_str.green()
            } else if entry.score >= 5 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            let weight = match entry.weight {
                Some(w) => format!("weight {:.1}", w),
                None => "not weighted".to_string(),
            };
            println!(
                "   {} {} {:<20} {}",
                bar,
                colored_score,
                entry.dimension.label(),
                weight.dimmed()
            );
        }
        println!();
    }

    fn print_issues(&self, report: &AnalysisReport) {
        println!("   {}", "Issues Found:".bold());

        let mut hidden = 0;
        for (dimension, dim_report) in &report.dimensions {
            let shown = if self.verbose {
                dim_report.issues.len()
            } else {
                ISSUES_PER_DIMENSION.min(dim_report.issues.len())
            };
            for issue in &dim_report.issues[..shown] {
                println!(
                    "   {} [{}] {}",
                    "⚠".yellow(),
                    dimension.key().dimmed(),
                    issue
                );
            }
            hidden += dim_report.issues.len() - shown;

            if self.verbose && !dim_report.metrics.is_empty() {
                let facts: Vec<String> = dim_report
                    .metrics
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                println!("       {} {}", "↳".dimmed(), facts.join(" ").dimmed());
            }
        }

        if hidden > 0 {
            println!(
                "   {} {} more issues (use --verbose to show)",
                "ℹ".blue(),
                hidden
            );
        }
        println!();
    }

    fn print_recommendations(&self, report: &AnalysisReport) {
        let summary = &report.recommendation_summary;
        if summary.top_recommendations.is_empty() {
            return;
        }

        println!(
            "   {} ({} high, {} medium, {} low)",
            "Recommendations:".bold(),
            summary.high_priority,
            summary.medium_priority,
            summary.low_priority
        );
        for rec in &summary.top_recommendations {
            let tag = format!("{:<6}", rec.priority.to_string());
            let tag = match rec.priority {
                Priority::High => tag.red(),
                Priority::Medium => tag.yellow(),
                Priority::Low => tag.blue(),
            };
            println!("   {} {} {}", "→".cyan(), tag, rec.text);
        }

        if !summary.quick_wins.is_empty() {
            println!();
            println!("   {}", "Quick Wins:".bold());
            for rec in &summary.quick_wins {
                println!(
                    "   {} {} {}",
                    "★".yellow(),
                    rec.text,
                    format!("({})", rec.dimension.label()).dimmed()
                );
            }
        }
        println!();
    }

    fn print_improvement(&self, report: &AnalysisReport) {
        let potential = &report.improvement_potential;
        if potential.total_improvement == 0 {
            return;
        }

        println!("   {}", "Improvement Potential:".bold());
        println!(
            "   {} of {} points missing ({:.1}%)",
            potential.total_improvement,
            potential.module_count * usize::from(MAX_DIMENSION_SCORE),
            potential.improvement_percentage
        );
        for area in &potential.top_areas {
            println!(
                "   {} {:<20} {}/{} (+{})",
                "↑".green(),
                area.dimension.label(),
                area.current_score,
                MAX_DIMENSION_SCORE,
                area.potential_gain
            );
        }
        println!(
            "   Estimated points after fixes: {:.1}",
            potential.estimated_score_after_fixes
        );
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Pages analyzed:  {}",
            stats.pages_analyzed.to_string().bold()
        );
        let average_grade = Grade::from_score(stats.average_score);
        println!(
            "   Average score:   {:.1} ({})",
            stats.average_score,
            self.colorize_grade(average_grade)
        );
        println!("   Total issues:    {}", stats.total_issues);
        println!("   Recommendations: {}", stats.total_recommendations);
        println!();
    }

    fn colorize_grade(&self, grade: Grade) -> colored::ColoredString {
        let s = grade.to_string();
        match grade {
            Grade::APlus | Grade::A | Grade::AMinus => s.green().bold(),
            Grade::BPlus | Grade::B | Grade::BMinus => s.green(),
            Grade::CPlus | Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, total: f64) -> String {
        let filled = ((total.clamp(0.0, 10.0) * 2.0).floor() as usize).min(20);
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>4.1}/10",
            "█".repeat(filled),
            "░".repeat(empty),
            total
        );

        if self.use_colors {
            if total >= 8.0 {
                bar.green().to_string()
            } else if total >= 6.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = usize::from(score.min(MAX_DIMENSION_SCORE));
        let empty = usize::from(MAX_DIMENSION_SCORE) - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
