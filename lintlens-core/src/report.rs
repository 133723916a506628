//! Report formatting utilities for LintLens outputs.

use std::fmt::Write;

use serde::Serialize;
use utoipa::ToSchema;

use crate::aggregate::{FileAggregate, IssueEntry, aggregate_bundle};
use crate::cooccurrence::{CoOccurrenceMatrix, co_occurrence};
use crate::descriptions::{ComplexityReading, IssueDescription};
use crate::domain::{RepositoryInfo, ResultsBundle};
use crate::heatmap::{HeatmapGrid, correlation_grid};
use crate::runs::{COMBINED_LABELS, RunHistory};
use crate::statistics::CategoryStatistics;
use crate::stored::{RawSourceView, StoredView};
use crate::trend::TrendReport;

/// Entries of one line flagged by more than one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedLine {
    /// Line number, or `unknown`.
    pub line: String,
    /// Deduplicated entries on the line.
    pub entries: Vec<IssueEntry>,
}

/// Correlated lines of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedFile {
    /// File path.
    pub path: String,
    /// Lines in line order.
    pub lines: Vec<CorrelatedLine>,
}

/// Cross-category correlation of a whole bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationReport {
    /// Number of files attributed to at least one issue.
    pub files_seen: usize,
    /// Files with at least one correlated line.
    pub files: Vec<CorrelatedFile>,
    /// Category co-occurrence counts.
    #[schema(value_type = Object)]
    pub matrix: CoOccurrenceMatrix,
    /// Heatmap of the matrix.
    pub grid: HeatmapGrid,
}

impl CorrelationReport {
    /// Build the report from an aggregate.
    pub fn from_aggregate(aggregate: &FileAggregate) -> Self {
        let files = aggregate
            .correlated_files()
            .map(|(path, lines)| CorrelatedFile {
                path: path.to_string(),
                lines: lines
                    .iter()
                    .map(|(line, entries)| CorrelatedLine {
                        line: line.to_string(),
                        entries: entries.iter().cloned().collect(),
                    })
                    .collect(),
            })
            .collect();
        let matrix = co_occurrence(aggregate);
        let grid = correlation_grid(&matrix);
        Self {
            files_seen: aggregate.len(),
            files,
            matrix,
            grid,
        }
    }
}

/// Run the full correlation pipeline over a bundle.
pub fn correlation_report(bundle: &ResultsBundle) -> CorrelationReport {
    CorrelationReport::from_aggregate(&aggregate_bundle(bundle))
}

/// Render the correlation report as Markdown.
pub fn render_correlation_markdown(report: &CorrelationReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# LintLens Correlation Report\n");
    let _ = writeln!(
        output,
        "- Files analysed: {}\n- Files with correlated lines: {}\n",
        report.files_seen,
        report.files.len()
    );

    let _ = writeln!(output, "## Co-occurrence\n");
    if report.matrix.is_empty() {
        let _ = writeln!(output, "No lines flagged by more than one category.\n");
    } else {
        append_grid(&mut output, &report.grid);
    }

    let _ = writeln!(output, "## Files\n");
    if report.files.is_empty() {
        let _ = writeln!(output, "No correlated lines found.\n");
    }
    for file in &report.files {
        let _ = writeln!(output, "### {}\n", file.path);
        for line in &file.lines {
            let _ = writeln!(output, "- Line {}", line.line);
            for entry in &line.entries {
                let _ = writeln!(output, "  - [{}] {}", entry.category, entry.detail);
            }
        }
        let _ = writeln!(output);
    }
    output
}

/// Render issue statistics as Markdown.
pub fn render_statistics_markdown(statistics: &[CategoryStatistics]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# LintLens Issue Statistics\n");
    for category in statistics {
        let _ = writeln!(
            output,
            "## {} ({} total)\n",
            category.category.label(),
            category.total()
        );
        if category.rows.is_empty() {
            let _ = writeln!(output, "No issues reported.\n");
            continue;
        }
        let _ = writeln!(output, "| Issue | Summary | Count |\n| --- | --- | --- |");
        for row in &category.rows {
            let _ = writeln!(output, "| {} | {} | {} |", row.key, row.summary, row.count);
        }
        let _ = writeln!(output);
    }
    output
}

/// Render a heatmap grid as a Markdown table.
pub fn render_heatmap_markdown(title: &str, grid: &HeatmapGrid) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {title}\n");
    if grid.y_labels.is_empty() {
        let _ = writeln!(output, "No data available.");
        return output;
    }
    append_grid(&mut output, grid);
    output
}

/// Render the trends of one file as Markdown.
pub fn render_trend_markdown(report: &TrendReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# LintLens Trends: {}\n", report.path);
    append_repository(&mut output, report.repository_info.as_ref());
    if report.is_empty() {
        let _ = writeln!(output, "No runs found for this file.");
        return output;
    }
    for series in &report.series {
        let _ = writeln!(output, "## {}\n", series.name);
        if series.points.is_empty() {
            let _ = writeln!(output, "No runs.\n");
            continue;
        }
        for point in &series.points {
            let when = point
                .timestamp
                .map_or_else(|| "undated".to_string(), |time| time.to_rfc3339());
            let _ = writeln!(output, "- {when}: {}", point.value);
        }
        let _ = writeln!(output);
    }
    output
}

/// Render run history as Markdown.
pub fn render_runs_markdown(history: &RunHistory) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# LintLens Run History\n");
    if history.is_empty() {
        let _ = writeln!(output, "No runs found.");
        return output;
    }

    let _ = writeln!(output, "## Combined runs\n");
    if history.combined.is_empty() {
        let _ = writeln!(output, "No combined runs.\n");
    } else {
        let _ = writeln!(
            output,
            "| Timestamp | Path | {} |",
            COMBINED_LABELS.join(" | ")
        );
        let _ = writeln!(output, "|{}", " --- |".repeat(COMBINED_LABELS.len() + 2));
        for run in &history.combined {
            let counts: Vec<String> = run.counts.iter().map(u64::to_string).collect();
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                run.timestamp,
                path_of(run.repository_info.as_ref()),
                counts.join(" | ")
            );
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Individual runs\n");
    if history.individual.is_empty() {
        let _ = writeln!(output, "No individual runs.\n");
    } else {
        let _ = writeln!(
            output,
            "| Timestamp | Path | Category | Count |\n| --- | --- | --- | --- |"
        );
        for run in &history.individual {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                run.timestamp,
                path_of(run.repository_info.as_ref()),
                run.category.label(),
                run.count
            );
        }
        let _ = writeln!(output);
    }
    output
}

/// Render a stored analysis as Markdown.
pub fn render_stored_markdown(view: &StoredView) -> String {
    let mut output = String::new();
    let title = view
        .custom_id
        .as_deref()
        .or(view.id.as_deref())
        .unwrap_or("unknown");
    let _ = writeln!(output, "# LintLens Result {title}\n");
    if let Some(timestamp) = &view.timestamp {
        let _ = writeln!(output, "- Timestamp: {timestamp}");
    }
    append_repository(&mut output, view.repository_info.as_ref());

    for category in &view.categories {
        let count = category
            .count
            .map_or_else(|| "n/a".to_string(), |count| count.to_string());
        let _ = writeln!(output, "## {} ({count})\n", category.category.label());
        if category.issues.is_empty() {
            let _ = writeln!(output, "No issues reported.\n");
            continue;
        }
        for issue in &category.issues {
            let _ = writeln!(output, "- {}", issue.text);
            let _ = writeln!(output, "  - {}", issue.explanation);
        }
        let _ = writeln!(output);
    }

    if let Some(reading) = &view.complexity {
        append_complexity(&mut output, reading);
    }
    output
}

/// Render raw source with highlighted lines as Markdown.
pub fn render_raw_markdown(view: &RawSourceView) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "# {}\n",
        path_of(Some(&view.repository_info))
    );
    let highlighted: Vec<String> = view.highlighted().map(|line| line.to_string()).collect();
    if highlighted.is_empty() {
        let _ = writeln!(output, "No highlighted lines.\n");
    } else {
        let _ = writeln!(output, "Highlighted lines: {}\n", highlighted.join(", "));
    }
    let _ = writeln!(output, "```java");
    for line in &view.lines {
        let marker = if line.highlighted { ">" } else { " " };
        let _ = writeln!(output, "{marker}{:>5} | {}", line.number, line.text);
    }
    let _ = writeln!(output, "```");
    output
}

/// Render an issue description as Markdown.
pub fn render_description_markdown(description: &IssueDescription) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "# {}: {}\n",
        description.category.label(),
        description.key
    );
    if !description.known {
        let _ = writeln!(output, "No description available for this key.\n");
    }
    let _ = writeln!(output, "{}\n", description.summary);
    let _ = writeln!(output, "### Description\n{}\n", description.description);
    let _ = writeln!(output, "### Solution\n{}\n", description.solution);
    let _ = writeln!(
        output,
        "### Example\n```java\n{}\n```\n",
        description.code_example
    );
    let _ = writeln!(output, "### Explanation\n{}", description.explanation);
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn path_of(info: Option<&RepositoryInfo>) -> &str {
    info.and_then(RepositoryInfo::file_path).unwrap_or("unknown")
}

fn append_repository(output: &mut String, info: Option<&RepositoryInfo>) {
    let Some(info) = info else {
        let _ = writeln!(output, "- Repository: unavailable\n");
        return;
    };
    let owner = info.username.as_deref().unwrap_or("?");
    let repo = info.repo.as_deref().unwrap_or("?");
    let _ = writeln!(output, "- Repository: {owner}/{repo}");
    if let Some(commit) = &info.commit_id {
        let _ = writeln!(output, "- Commit: `{commit}`");
    }
    let _ = writeln!(output, "- Path: `{}`\n", path_of(Some(info)));
}

fn append_complexity(output: &mut String, reading: &ComplexityReading) {
    let _ = writeln!(output, "## Complexity\n");
    if !reading.calculated {
        let _ = writeln!(output, "Complexity was not calculated.\n");
        return;
    }
    let _ = writeln!(output, "- Cyclomatic complexity: {}", reading.score);
    for band in &reading.bands {
        let _ = writeln!(output, "- {}-{}: {}", band.min, band.max, band.description.trim());
    }
    let _ = writeln!(output);
}

fn append_grid(output: &mut String, grid: &HeatmapGrid) {
    let _ = writeln!(output, "| | {} |", grid.x_labels.join(" | "));
    let _ = writeln!(output, "|{}", " --- |".repeat(grid.x_labels.len() + 1));
    for (label, row) in grid.y_labels.iter().zip(&grid.cells) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.value.map(|value| value.to_string()).unwrap_or_default())
            .collect();
        let _ = writeln!(output, "| {label} | {} |", cells.join(" | "));
    }
    let _ = writeln!(output);
}
