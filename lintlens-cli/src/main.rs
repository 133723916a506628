#![deny(missing_docs)]
//! LintLens command-line interface.
//!
//! Fetches analysis results from the backend and prints correlation,
//! statistics, trend, heatmap and run reports.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lintlens_core::report::{CorrelationReport, render_heatmap_markdown};
use lintlens_core::{
    ApiConfig, Category, CategoryStatistics, DEFAULT_API_URL, HeatmapGrid, HttpResultsSource,
    IssueDescription, RawSourceView, ResultId, ResultsSource, RunHistory, StoredView,
    TrendReport, correlation_report, describe, heatmap_snapshot, issue_statistics,
    raw_source_view, render_correlation_markdown, render_description_markdown, render_json,
    render_raw_markdown, render_runs_markdown, render_statistics_markdown,
    render_stored_markdown, render_trend_markdown, run_history, snapshot_grid, stored_view,
    trend_for_path,
};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const HEATMAP_TITLE: &str = "LintLens Heatmap";

#[derive(Parser)]
#[command(name = "lintlens", version, about = "LintLens CLI")]
struct Cli {
    /// Base URL of the analysis backend.
    #[arg(long, env = "LINTLENS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Lines flagged by more than one category, with the co-occurrence matrix.
    Correlation {
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Issue key frequencies per category.
    Stats {
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Latest per-category counts for every file.
    Heatmap {
        /// Only include files whose path contains this text.
        #[arg(long)]
        path: Option<String>,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Per-category counts of one file over time.
    Trend {
        /// Exact file path.
        #[arg(long)]
        path: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Combined and individual runs of matching files, newest first.
    Runs {
        /// Path to look up.
        #[arg(long)]
        path: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// A stored analysis by database or custom identifier.
    Result {
        /// Database id, or a custom id containing `-`.
        id: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Raw source of a stored analysis with issue lines highlighted.
    Raw {
        /// Database id, or a custom id containing `-`.
        id: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Describe an issue key.
    Describe {
        /// Issue category.
        category: String,
        /// Two-word classification key, e.g. "Magic number".
        key: String,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = ApiConfig::new(&cli.api_url)?;
    let source = HttpResultsSource::new(config)?;
    run_command(cli.command, &source).await
}

#[cfg(test)]
fn main() {}

async fn run_command(command: Commands, source: &dyn ResultsSource) -> CliResult<()> {
    match command {
        Commands::Correlation { report } => run_correlation(source, &report).await,
        Commands::Stats { report } => run_stats(source, &report).await,
        Commands::Heatmap { path, report } => run_heatmap(source, path.as_deref(), &report).await,
        Commands::Trend { path, report } => run_trend(source, &path, &report).await,
        Commands::Runs { path, report } => run_runs(source, &path, &report).await,
        Commands::Result { id, report } => run_result(source, &id, &report).await,
        Commands::Raw { id, report } => run_raw(source, &id, &report).await,
        Commands::Describe {
            category,
            key,
            report,
        } => run_describe(&category, &key, &report).await,
    }
}

async fn run_correlation(source: &dyn ResultsSource, output: &OutputArgs) -> CliResult<()> {
    let bundle = source.all_results().await?;
    let report = correlation_report(&bundle);
    log::info!(
        "{} of {} files have correlated lines",
        report.files.len(),
        report.files_seen
    );
    emit_report(
        &report,
        output,
        render_correlation_text,
        render_correlation_markdown,
    )
    .await
}

async fn run_stats(source: &dyn ResultsSource, output: &OutputArgs) -> CliResult<()> {
    let bundle = source.all_results().await?;
    let statistics = issue_statistics(&bundle);
    emit_report(
        &statistics,
        output,
        |stats| render_statistics_text(stats),
        |stats| render_statistics_markdown(stats),
    )
    .await
}

async fn run_heatmap(
    source: &dyn ResultsSource,
    filter: Option<&str>,
    output: &OutputArgs,
) -> CliResult<()> {
    let bundle = source.all_results().await?;
    let grid = snapshot_grid(&heatmap_snapshot(&bundle, filter));
    emit_report(&grid, output, render_heatmap_text, |grid| {
        render_heatmap_markdown(HEATMAP_TITLE, grid)
    })
    .await
}

async fn run_trend(source: &dyn ResultsSource, path: &str, output: &OutputArgs) -> CliResult<()> {
    let bundle = source.all_results().await?;
    let report = trend_for_path(&bundle, path.trim());
    emit_report(&report, output, render_trend_text, render_trend_markdown).await
}

async fn run_runs(source: &dyn ResultsSource, path: &str, output: &OutputArgs) -> CliResult<()> {
    let path = path.trim();
    let bundle = source.results_for_path(path).await?;
    let history = run_history(&bundle, path);
    emit_report(&history, output, render_runs_text, render_runs_markdown).await
}

async fn run_result(source: &dyn ResultsSource, id: &str, output: &OutputArgs) -> CliResult<()> {
    let id = ResultId::parse(id)?;
    let stored = source.stored_results(&id).await?;
    if stored.is_empty() {
        return Err(format!("no stored results found for {id}").into());
    }
    let view = stored_view(&stored);
    emit_report(&view, output, render_stored_text, render_stored_markdown).await
}

async fn run_raw(source: &dyn ResultsSource, id: &str, output: &OutputArgs) -> CliResult<()> {
    let id = ResultId::parse(id)?;
    let view = raw_source_view(source, &id).await?;
    emit_report(&view, output, render_raw_text, render_raw_markdown).await
}

async fn run_describe(category: &str, key: &str, output: &OutputArgs) -> CliResult<()> {
    let category: Category = category.parse()?;
    let description = describe(category, key);
    emit_report(
        &description,
        output,
        render_description_text,
        render_description_markdown,
    )
    .await
}

async fn emit_report<T: Serialize + ?Sized>(
    payload: &T,
    output: &OutputArgs,
    text: fn(&T) -> String,
    markdown: fn(&T) -> String,
) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => text(payload),
        OutputFormat::Markdown => markdown(payload),
        OutputFormat::Json => render_json(payload)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_correlation_text(report: &CorrelationReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Files: {} analysed, {} correlated",
        report.files_seen,
        report.files.len()
    );
    for file in &report.files {
        let _ = writeln!(output, "{}", file.path);
        for line in &file.lines {
            let categories: Vec<&str> = line
                .entries
                .iter()
                .map(|entry| entry.category.as_str())
                .collect();
            let _ = writeln!(output, "  line {}: {}", line.line, categories.join(", "));
            for entry in &line.entries {
                let _ = writeln!(output, "    [{}] {}", entry.category, entry.detail);
            }
        }
    }
    let pairs: Vec<String> = report
        .matrix
        .categories()
        .flat_map(|row| {
            report
                .matrix
                .categories()
                .filter(move |column| row < *column)
                .map(move |column| (row, column))
        })
        .filter(|(row, column)| report.matrix.get(*row, *column) > 0)
        .map(|(row, column)| format!("{row}/{column}: {}", report.matrix.get(row, column)))
        .collect();
    if pairs.is_empty() {
        let _ = writeln!(output, "Co-occurrence: none");
    } else {
        let _ = writeln!(output, "Co-occurrence:");
        for pair in pairs {
            let _ = writeln!(output, "- {pair}");
        }
    }
    output
}

fn render_statistics_text(statistics: &[CategoryStatistics]) -> String {
    let mut output = String::new();
    for category in statistics {
        let _ = writeln!(
            output,
            "{}: {} issues",
            category.category.label(),
            category.total()
        );
        for row in &category.rows {
            let _ = writeln!(output, "- {} x{} ({})", row.key, row.count, row.summary);
        }
        let _ = writeln!(output);
    }
    output
}

fn render_heatmap_text(grid: &HeatmapGrid) -> String {
    let mut output = String::new();
    if grid.y_labels.is_empty() {
        let _ = writeln!(output, "No files found.");
        return output;
    }
    for (label, row) in grid.y_labels.iter().zip(&grid.cells) {
        let _ = writeln!(output, "{label}");
        for (column, cell) in grid.x_labels.iter().zip(row) {
            let value = cell
                .value
                .map_or_else(|| "-".to_string(), |value| value.to_string());
            let _ = writeln!(output, "  {column}: {value}");
        }
    }
    output
}

fn render_trend_text(report: &TrendReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Path: {}", report.path);
    if report.is_empty() {
        let _ = writeln!(output, "Runs: none");
        return output;
    }
    for series in &report.series {
        let values: Vec<String> = series
            .points
            .iter()
            .map(|point| point.value.to_string())
            .collect();
        let _ = writeln!(output, "{}: {}", series.name, values.join(" -> "));
    }
    output
}

fn render_runs_text(history: &RunHistory) -> String {
    let mut output = String::new();
    if history.is_empty() {
        let _ = writeln!(output, "Runs: none");
        return output;
    }
    if !history.combined.is_empty() {
        let _ = writeln!(output, "Combined runs:");
        for run in &history.combined {
            let counts: Vec<String> = lintlens_core::runs::COMBINED_LABELS
                .iter()
                .zip(&run.counts)
                .map(|(label, count)| format!("{label}={count}"))
                .collect();
            let _ = writeln!(output, "- {} {}", run.timestamp, counts.join(" "));
        }
    }
    if !history.individual.is_empty() {
        let _ = writeln!(output, "Individual runs:");
        for run in &history.individual {
            let _ = writeln!(
                output,
                "- {} {}={}",
                run.timestamp,
                run.category.label(),
                run.count
            );
        }
    }
    output
}

fn render_stored_text(view: &StoredView) -> String {
    let mut output = String::new();
    if let Some(id) = view.custom_id.as_ref().or(view.id.as_ref()) {
        let _ = writeln!(output, "Result: {id}");
    }
    if let Some(timestamp) = &view.timestamp {
        let _ = writeln!(output, "Timestamp: {timestamp}");
    }
    if let Some(path) = view
        .repository_info
        .as_ref()
        .and_then(|info| info.file_path())
    {
        let _ = writeln!(output, "Path: {path}");
    }
    for category in &view.categories {
        let _ = writeln!(
            output,
            "{}: {}",
            category.category.label(),
            category.issues.len()
        );
        for issue in &category.issues {
            let _ = writeln!(output, "- {}", issue.text);
        }
    }
    if let Some(reading) = &view.complexity {
        if reading.calculated {
            let _ = writeln!(output, "Complexity: {}", reading.score);
            for band in &reading.bands {
                let _ = writeln!(output, "- {}", band.description.trim());
            }
        } else {
            let _ = writeln!(output, "Complexity: not calculated");
        }
    }
    output
}

fn render_raw_text(view: &RawSourceView) -> String {
    let mut output = String::new();
    for line in &view.lines {
        let marker = if line.highlighted { '*' } else { ' ' };
        let _ = writeln!(output, "{marker}{:>5} {}", line.number, line.text);
    }
    output
}

fn render_description_text(description: &IssueDescription) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} / {}: {}",
        description.category.label(),
        description.key,
        description.summary
    );
    let _ = writeln!(output, "Description: {}", description.description);
    let _ = writeln!(output, "Solution: {}", description.solution);
    let _ = writeln!(output, "Example:\n{}", description.code_example);
    let _ = writeln!(output, "Explanation: {}", description.explanation);
    output
}
