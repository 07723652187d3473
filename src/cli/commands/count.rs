use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output;
use crate::config::KwfreqConfig;
use crate::pipeline::{self, PipelineReport};
use crate::sources;

#[derive(Args)]
pub struct CountArgs {
    /// Directory containing the text files to count over
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// File holding the whitespace-separated keyword list
    #[arg(short, long, value_name = "FILE")]
    pub keywords: PathBuf,

    /// Total worker thread budget, producers + consumers (0 = auto)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Number of producer threads reading lines
    #[arg(short, long)]
    pub producers: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show pipeline statistics after counting
    #[arg(long)]
    pub stats: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

pub fn execute(args: CountArgs, quiet: bool, config_path: Option<&str>) -> Result<()> {
    let mut config = KwfreqConfig::load(config_path)?;

    // Apply CLI overrides
    if let Some(threads) = args.threads {
        config.workers.budget = threads;
    }
    if let Some(producers) = args.producers {
        config.workers.producers = producers;
    }
    let plan = config.worker_plan()?;

    let keywords = sources::load_keywords(&args.keywords)?;
    let line_sources = sources::discover_sources(&args.dir)
        .with_context(|| format!("cannot enumerate `{}`", args.dir.display()))?;
    let source_count = line_sources.len();

    if !quiet && matches!(args.format, OutputFormat::Text) {
        output::info(&format!(
            "Counting {} keywords across {} files ({} producers, {} consumers)...",
            keywords.len(),
            source_count,
            plan.producers,
            plan.consumers
        ));
    }

    let report = pipeline::run(plan, line_sources, keywords, config.limits.max_keywords)?;

    match args.format {
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Csv => print_csv_report(&report),
        OutputFormat::Text => print_text_report(&report, source_count, args.stats, quiet),
    }

    Ok(())
}

fn print_text_report(report: &PipelineReport, source_count: usize, show_stats: bool, quiet: bool) {
    for entry in &report.counts {
        println!(
            "  {:<24} {}",
            console::style(&entry.keyword).cyan(),
            console::style(entry.count).bold()
        );
    }
    if !quiet {
        output::success(&format!(
            "Processed {} lines from {} files in {}ms",
            report.stats.lines_dequeued, source_count, report.stats.duration_ms
        ));
    }

    if show_stats {
        println!();
        println!("{}", console::style("Pipeline statistics").green().bold());
        println!("  Sources read: {}", report.stats.sources_read);
        println!("  Lines enqueued: {}", report.stats.lines_enqueued);
        println!("  Lines dequeued: {}", report.stats.lines_dequeued);
        println!("  Tokens matched: {}", report.stats.tokens_matched);
        println!("  Duration: {}ms", report.stats.duration_ms);
    }
}

fn print_json_report(report: &PipelineReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_csv_report(report: &PipelineReport) {
    println!("keyword,count");
    for entry in &report.counts {
        println!("{},{}", entry.keyword, entry.count);
    }
}
