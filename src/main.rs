//! Pagelens: on-page SEO analyzer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pagelens::analyzer::AnalysisEngine;
use pagelens::config::{default_config_json, load_config, Config, CONFIG_FILENAME};
use pagelens::reporter::{ConsoleReporter, CsvExporter, ExportFormat, JsonReporter};
use pagelens::store::ResultStore;
use pagelens::AnalysisReport;
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Pagelens: score a web page across sixteen on-page SEO dimensions
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Page URL(s) to analyze; https:// is assumed when no scheme is given
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (one line per URL)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (all issues, metrics, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Minimum total score 0-10 (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Path to config file (default: search .pagelensrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip robots.txt and sitemap probes
    #[arg(long)]
    no_probes: bool,

    /// Export results (supported: csv)
    #[arg(long, value_name = "FORMAT")]
    export: Option<String>,

    /// Write the export to this file instead of stdout
    #[arg(long, short, value_name = "PATH", requires = "export")]
    output: Option<PathBuf>,

    /// Number of parallel threads when analyzing several URLs (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .pagelensrc.json with sensible defaults
    Init {
        /// Minimum total score threshold (e.g. 7.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "pagelens=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(Commands::Init { threshold, dir }) = &args.command {
        return run_init(*threshold, dir.as_deref());
    }

    // Reject bad export formats before any network traffic
    let export = args
        .export
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.no_probes);

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AnalysisEngine::from_config(&config)?;
    let outcomes = if args.urls.len() > 1 {
        engine.analyze_parallel(&args.urls)
    } else {
        args.urls.iter().map(|u| engine.analyze(u)).collect()
    };

    let store = ResultStore::new();
    let mut failures: Vec<(String, String)> = Vec::new();
    for (url, outcome) in args.urls.iter().zip(outcomes) {
        match outcome {
            Ok(report) => {
                store.insert(url, report);
            }
            Err(e) => failures.push((url.clone(), e.to_string())),
        }
    }
    let reports: Vec<AnalysisReport> = store
        .latest_all()
        .iter()
        .map(|r| (**r).clone())
        .collect();

    // CSV on stdout replaces the normal report
    let export_to_stdout = export.is_some() && args.output.is_none();
    if !export_to_stdout {
        print_reports(&args, &engine, &reports, &failures);
    }

    if let Some(ExportFormat::Csv) = export {
        if !reports.is_empty() {
            write_export(&reports, args.output.as_deref())?;
        }
    }

    if !failures.is_empty() {
        return Ok(ExitCode::from(2));
    }

    Ok(threshold_exit_code(&config, &reports, args.json || args.quiet))
}

fn print_reports(
    args: &Args,
    engine: &AnalysisEngine,
    reports: &[AnalysisReport],
    failures: &[(String, String)],
) {
    if args.json {
        let reporter = JsonReporter::new().pretty();
        match (reports, failures) {
            ([report], []) => println!("{}", reporter.report(report)),
            ([], [(_, error)]) => println!("{}", reporter.report_error(error)),
            _ => {
                let stats = AnalysisEngine::aggregate_stats(reports);
                println!("{}", reporter.report_with_summary(reports, failures, &stats));
            }
        }
        return;
    }

    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }

    if args.quiet {
        for report in reports {
            reporter.report_quiet(report);
        }
    } else if reports.len() == 1 {
        reporter.report(&reports[0], engine.weights());
    } else if !reports.is_empty() {
        let stats = AnalysisEngine::aggregate_stats(reports);
        reporter.report_many(reports, engine.weights(), &stats);
    }

    for (url, error) in failures {
        if args.quiet {
            reporter.report_failure(url, error);
        } else {
            eprintln!("{}: {}: {}", "Error".red().bold(), url, error);
        }
    }
}

fn write_export(reports: &[AnalysisReport], output: Option<&Path>) -> Result<()> {
    let exporter = CsvExporter::new();
    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            exporter.export(BufWriter::new(file), reports)?;
            eprintln!("{}: exported to {}", "Done".green().bold(), path.display());
        }
        None => exporter.export(io::stdout().lock(), reports)?,
    }
    Ok(())
}

fn threshold_exit_code(config: &Config, reports: &[AnalysisReport], silent: bool) -> ExitCode {
    let Some(threshold) = config.threshold else {
        return ExitCode::SUCCESS;
    };

    let below: Vec<&AnalysisReport> = reports
        .iter()
        .filter(|r| r.total_score < threshold)
        .collect();
    if below.is_empty() {
        return ExitCode::SUCCESS;
    }

    if !silent {
        for report in below {
            eprintln!(
                "{}: {} scored {:.1}, below threshold {:.1}",
                "Failed".red().bold(),
                report.url,
                report.total_score,
                threshold
            );
        }
    }
    ExitCode::from(1)
}

fn run_init(threshold: Option<f64>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold = threshold.unwrap_or(7.0);
    if !(0.0..=10.0).contains(&threshold) {
        anyhow::bail!("Threshold must be between 0 and 10, got {}", threshold);
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&config_path, default_config_json(threshold))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created {} (threshold {:.1})",
        "Done".green().bold(),
        config_path.display(),
        threshold
    );
    Ok(ExitCode::SUCCESS)
}
