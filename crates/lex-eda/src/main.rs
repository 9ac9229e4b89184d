//! CLI entry point for the profiling and preprocessing engine.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_eda::{
    ControlOptions, CorrelationOutcome, DataProfiler, Exporter, MissingStrategy, Pipeline,
    PipelineConfig, PipelineOutcome, ReportGenerator, TableProfile, TableStore,
};
use std::path::Path;
use tracing::{debug, info};

/// CLI-compatible missing-value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Leave missing values as they are
    DoNothing,
    /// Fill numeric columns with their mean
    Mean,
    /// Fill numeric columns with their median
    Median,
    /// Drop every row with a missing value
    Drop,
}

impl From<CliMissingStrategy> for MissingStrategy {
    fn from(cli: CliMissingStrategy) -> Self {
        match cli {
            CliMissingStrategy::DoNothing => MissingStrategy::DoNothing,
            CliMissingStrategy::Mean => MissingStrategy::FillMean,
            CliMissingStrategy::Median => MissingStrategy::FillMedian,
            CliMissingStrategy::Drop => MissingStrategy::DropRows,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Exploratory data analysis and preprocessing for CSV tables",
    long_about = "Profiles a CSV table, applies the requested cleaning and transformation \
                  steps in a fixed order (missing values, duplicates, dates, encoding, scaling) \
                  and exports the result.\n\n\
                  EXAMPLES:\n  \
                  # Profile only\n  \
                  lex-eda -i data.csv\n\n  \
                  # Fill with medians, drop duplicates, encode and scale\n  \
                  lex-eda -i data.csv --missing median --drop-duplicates \\\n    \
                  --encode city --scale age,income -o results/\n\n  \
                  # Machine-readable output\n  \
                  lex-eda -i data.csv --json | jq .after.missing"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for processed_data.csv
    ///
    /// Nothing is written if not specified
    #[arg(short, long)]
    output: Option<String>,

    /// Strategy for missing values
    #[arg(long, value_enum, default_value = "do-nothing")]
    missing: CliMissingStrategy,

    /// Remove duplicate rows
    #[arg(long)]
    drop_duplicates: bool,

    /// Do not convert the `Date` column to datetimes
    #[arg(long)]
    no_date_coercion: bool,

    /// Categorical column to label-encode
    #[arg(long)]
    encode: Option<String>,

    /// Numeric columns to standardize (comma separated)
    #[arg(long, value_delimiter = ',')]
    scale: Vec<String>,

    /// Numeric column to show a histogram for
    #[arg(long)]
    histogram: Option<String>,

    /// JSON pipeline configuration
    ///
    /// When given, the pipeline flags above are ignored
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading table from: {}", args.input);
    let bytes = std::fs::read(&args.input).with_context(|| format!("Reading {}", args.input))?;
    let mut store = TableStore::load(&bytes)?;

    let config = build_config(&args)?;
    debug!("Pipeline configuration: {:?}", config);

    let before = ReportGenerator::profile(store.current_snapshot(), &config)?;

    let pipeline = Pipeline::from_config(&config)?;
    let outcome = pipeline.run(&mut store)?;

    let after = ReportGenerator::profile(store.current_snapshot(), &config)?;

    let histogram = match &args.histogram {
        Some(column) => Some(DataProfiler::histogram(
            store.current_snapshot(),
            column,
            config.histogram_bins,
        )?),
        None => None,
    };

    let exported = match &args.output {
        Some(dir) => Some(Exporter::write_to(store.current_snapshot(), Path::new(dir))?),
        None => None,
    };

    if args.json {
        let report = serde_json::json!({
            "before": before,
            "outcome": outcome,
            "after": after,
            "controls": ControlOptions::from_table(store.current_snapshot()),
            "histogram": histogram,
            "export": exported.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_profile("BEFORE PREPROCESSING", &before);
    print_outcome(&outcome);
    print_profile("AFTER PREPROCESSING", &after);

    if let Some(histogram) = histogram {
        println!("HISTOGRAM: {}", histogram.column);
        println!("{}", "-".repeat(40));
        let widest = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        for bin in &histogram.bins {
            let bar = "#".repeat(bin.count * 40 / widest);
            println!("  [{:>10.3}, {:>10.3}] {:>6} {}", bin.start, bin.end, bin.count, bar);
        }
        println!();
    }

    if let Some(path) = exported {
        println!("Exported: {}", path.display());
    }

    Ok(())
}

/// Build the pipeline configuration from a JSON file or the CLI flags.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    if let Some(path) = &args.config {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Reading config {}", path))?;
        let config: PipelineConfig =
            serde_json::from_str(&text).with_context(|| format!("Parsing config {}", path))?;
        config.validate()?;
        return Ok(config);
    }

    let mut builder = PipelineConfig::builder()
        .missing_strategy(args.missing.into())
        .remove_duplicates(args.drop_duplicates)
        .coerce_dates(!args.no_date_coercion)
        .scale_columns(args.scale.iter().cloned());

    if let Some(column) = &args.encode {
        builder = builder.encode_column(column);
    }

    Ok(builder.build()?)
}

/// Print a profile as a human-readable summary.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_profile(title: &str, profile: &TableProfile) {
    println!("\n{}", "=".repeat(80));
    println!("{} (table version {})", title, profile.table_version);
    println!("{}\n", "=".repeat(80));

    println!("OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  Rows: {}", profile.shape.0);
    println!("  Columns: {}", profile.shape.1);
    println!("  Duplicate rows: {}", profile.duplicate_rows);
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!("{:<20} {:<12} {:<10}", "Column", "Kind", "Missing");
    println!("{}", "-".repeat(44));
    for class in &profile.classifications {
        println!(
            "{:<20} {:<12} {:<10}",
            truncate_str(&class.name, 19),
            format!("{:?}", class.kind).to_lowercase(),
            profile.missing.get(&class.name).unwrap_or(0)
        );
    }
    println!();

    if !profile.statistics.columns.is_empty() {
        println!("DESCRIPTIVE STATISTICS");
        println!("{}", "-".repeat(40));
        println!(
            "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
            "Column", "Count", "Mean", "Std", "Min", "Median", "Max", "Skew", "Outliers"
        );
        for stats in &profile.statistics.columns {
            let shape = profile.distribution.get(&stats.column);
            println!(
                "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
                truncate_str(&stats.column, 19),
                stats.count,
                fmt_stat(stats.mean),
                fmt_stat(stats.std),
                fmt_stat(stats.min),
                fmt_stat(stats.median),
                fmt_stat(stats.max),
                fmt_stat(shape.and_then(|s| s.skewness)),
                profile
                    .outliers
                    .count(&stats.column)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        println!();
    }

    for top in &profile.top_categories {
        println!("TOP VALUES: {}", top.column);
        for entry in &top.values {
            println!("  {:<30} {}", truncate_str(&entry.value, 29), entry.count);
        }
    }
    if !profile.top_categories.is_empty() {
        println!();
    }

    println!("CORRELATION");
    println!("{}", "-".repeat(40));
    match &profile.correlation {
        CorrelationOutcome::Unavailable => {
            println!("  Not enough numeric columns for correlation analysis");
        }
        CorrelationOutcome::Matrix(matrix) => {
            print!("{:<12}", "");
            for column in &matrix.columns {
                print!(" {:>10}", truncate_str(column, 10));
            }
            println!();
            for (column, row) in matrix.columns.iter().zip(&matrix.values) {
                print!("{:<12}", truncate_str(column, 11));
                for value in row {
                    print!(" {:>10}", fmt_stat(*value));
                }
                println!();
            }
        }
    }
    println!();
}

fn print_outcome(outcome: &PipelineOutcome) {
    println!("\n{}", "=".repeat(80));
    println!("PREPROCESSING STEPS");
    println!("{}", "=".repeat(80));

    if outcome.steps.is_empty() {
        println!("  No steps requested");
    }
    for (idx, step) in outcome.steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
    println!("  Duration: {}ms", outcome.duration_ms);
}

fn fmt_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
