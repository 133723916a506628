//! Latest-snapshot and time-series reduction over result bundles.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Category, RepositoryInfo, ResultDocument, ResultsBundle};

/// Column labels of the snapshot heatmap, in [`Category::ALL`] order.
pub const SNAPSHOT_COLUMNS: [&str; 5] = [
    "Vulnerabilities",
    "Code Smells",
    "Quality Issues",
    "Style Violations",
    "Complexity",
];

/// Order in which trend series are presented.
pub const TREND_ORDER: [Category; 5] = [
    Category::Security,
    Category::Style,
    Category::CodeSmell,
    Category::Complexity,
    Category::Quality,
];

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (optionally fractional), the latter
/// read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn document_time(document: &ResultDocument) -> Option<DateTime<Utc>> {
    document.timestamp.as_deref().and_then(parse_timestamp)
}

fn matches_filter(path: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) if !filter.is_empty() => path.contains(filter),
        _ => true,
    }
}

/// Most recent document per file path, in first-appearance order.
///
/// A later document replaces an earlier one when its timestamp is not older,
/// so ties go to the last one seen. Missing or unparsable timestamps sort
/// before every real one.
pub fn latest_per_path(documents: &[ResultDocument]) -> Vec<(&str, &ResultDocument)> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: BTreeMap<&str, (&ResultDocument, Option<DateTime<Utc>>)> = BTreeMap::new();

    for document in documents {
        let Some(path) = document.path() else {
            continue;
        };
        let time = document_time(document);
        match latest.get_mut(path) {
            Some(current) => {
                if time >= current.1 {
                    *current = (document, time);
                }
            }
            None => {
                order.push(path);
                latest.insert(path, (document, time));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|path| latest.get(path).map(|(document, _)| (path, *document)))
        .collect()
}

/// One file row of the snapshot heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    /// File path.
    pub path: String,
    /// Latest count per column; missing counts are zero.
    pub counts: Vec<u64>,
}

/// Latest per-category counts for every file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSnapshot {
    /// Column labels.
    pub columns: Vec<String>,
    /// One row per file.
    pub rows: Vec<SnapshotRow>,
}

/// Build the latest-run heatmap from the per-category runs of a bundle.
///
/// `filter` keeps only paths containing it; an empty filter keeps all.
pub fn heatmap_snapshot(bundle: &ResultsBundle, filter: Option<&str>) -> HeatmapSnapshot {
    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, Vec<u64>> = BTreeMap::new();

    for (column, category) in Category::ALL.into_iter().enumerate() {
        for (path, document) in latest_per_path(bundle.results(category)) {
            if !matches_filter(path, filter) {
                continue;
            }
            let row = counts.entry(path.to_string()).or_insert_with(|| {
                order.push(path.to_string());
                vec![0; SNAPSHOT_COLUMNS.len()]
            });
            row[column] = category.count(document).unwrap_or(0);
        }
    }

    let rows = order
        .into_iter()
        .filter_map(|path| {
            counts
                .remove(&path)
                .map(|counts| SnapshotRow { path, counts })
        })
        .collect();

    HeatmapSnapshot {
        columns: SNAPSHOT_COLUMNS.iter().map(|label| label.to_string()).collect(),
        rows,
    }
}

/// One point of a trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Parsed run time, when the run carried a readable timestamp.
    #[schema(value_type = Option<String>)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Count reported by the run.
    pub value: u64,
}

/// Time-ordered counts of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// Category of the series.
    pub category: Category,
    /// Display name of the series.
    pub name: String,
    /// Points, oldest first.
    pub points: Vec<TrendPoint>,
}

/// Every trend series of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// File the trends describe.
    pub path: String,
    /// Repository the file was first seen in.
    pub repository_info: Option<RepositoryInfo>,
    /// One series per category in [`TREND_ORDER`].
    pub series: Vec<TrendSeries>,
}

impl TrendReport {
    /// The series of one category.
    pub fn series(&self, category: Category) -> Option<&TrendSeries> {
        self.series.iter().find(|series| series.category == category)
    }

    /// Whether no run of the file was found.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }
}

/// Collect the time series of every category for an exact file path.
///
/// Per-category runs contribute their own count. Combined runs contribute
/// each nested document, timed by the nested timestamp or else the combined
/// one.
pub fn trend_for_path(bundle: &ResultsBundle, path: &str) -> TrendReport {
    let mut points: BTreeMap<Category, Vec<TrendPoint>> = BTreeMap::new();

    for category in Category::ALL {
        for document in bundle.results(category) {
            if document.path() != Some(path) {
                continue;
            }
            points.entry(category).or_default().push(TrendPoint {
                timestamp: document_time(document),
                value: category.count(document).unwrap_or(0),
            });
        }
    }

    for combined in &bundle.combined_results {
        if combined.path() != Some(path) {
            continue;
        }
        let fallback = document_time(combined);
        for category in Category::ALL {
            let Some(nested) = category.nested_document(combined) else {
                continue;
            };
            points.entry(category).or_default().push(TrendPoint {
                timestamp: document_time(nested).or(fallback),
                value: category.count(nested).unwrap_or(0),
            });
        }
    }

    let series = TREND_ORDER
        .into_iter()
        .map(|category| {
            let mut points = points.remove(&category).unwrap_or_default();
            points.sort_by_key(|point| point.timestamp);
            TrendSeries {
                category,
                name: category.series_name().to_string(),
                points,
            }
        })
        .collect();

    TrendReport {
        path: path.to_string(),
        repository_info: bundle.repository_info(path).cloned(),
        series,
    }
}
