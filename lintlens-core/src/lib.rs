#![deny(missing_docs)]
//! LintLens core library.
//!
//! This crate turns the result documents of a static-analysis backend into
//! cross-category correlations, issue statistics, trends and heatmaps.

pub mod aggregate;
pub mod client;
pub mod cooccurrence;
pub mod descriptions;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod heatmap;
pub mod parser;
pub mod report;
pub mod runs;
pub mod sequence;
pub mod statistics;
pub mod stored;
pub mod trend;

pub use aggregate::{FileAggregate, FileIssues, IssueEntry, LineIssues, aggregate, aggregate_bundle};
pub use client::{
    ApiConfig, DEFAULT_API_URL, HttpResultsSource, ResultId, ResultsSource, SourceFuture,
    raw_source_view,
};
pub use cooccurrence::{CoOccurrenceMatrix, co_occurrence};
pub use descriptions::{ComplexityReading, IssueDescription, complexity_reading, describe};
pub use domain::{Category, RepositoryInfo, ResultDocument, ResultsBundle, StoredResults};
pub use error::{LintLensError, Result};
pub use extractor::{AnalysisResult, DocumentShape, analysis_results, extract};
pub use heatmap::{HeatmapGrid, Palette, correlation_grid, snapshot_grid};
pub use parser::{LineKey, ParsedIssue, parse_issue};
pub use report::{
    CorrelationReport, correlation_report, render_correlation_markdown,
    render_description_markdown, render_heatmap_markdown, render_json, render_raw_markdown,
    render_runs_markdown, render_statistics_markdown, render_stored_markdown,
    render_trend_markdown,
};
pub use runs::{RunHistory, run_history};
pub use sequence::{LatestSlot, RequestSequencer, RequestTicket};
pub use statistics::{CategoryStatistics, issue_statistics};
pub use stored::{RawSourceView, StoredView, stored_view};
pub use trend::{HeatmapSnapshot, TrendReport, heatmap_snapshot, trend_for_path};
