//! Run history of files matching a path filter.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Category, RepositoryInfo, ResultDocument, ResultsBundle};
use crate::trend::parse_timestamp;

/// Shown in place of a missing run timestamp.
pub const NO_TIMESTAMP: &str = "No timestamp available";

/// Labels of the counts carried by a combined run, in order.
pub const COMBINED_LABELS: [&str; 5] = ["Vulnerabilities", "Smells", "Quality", "Complexity", "Style"];

const COMBINED_ORDER: [Category; 5] = [
    Category::Security,
    Category::CodeSmell,
    Category::Quality,
    Category::Complexity,
    Category::Style,
];

/// One combined analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRun {
    /// Run identifier.
    pub id: Option<String>,
    /// Analysed source.
    pub repository_info: Option<RepositoryInfo>,
    /// Run timestamp as reported, or [`NO_TIMESTAMP`].
    pub timestamp: String,
    /// Counts in [`COMBINED_LABELS`] order; missing counts are zero.
    pub counts: Vec<u64>,
}

/// One single-category analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRun {
    /// Run identifier.
    pub id: Option<String>,
    /// Analysed source.
    pub repository_info: Option<RepositoryInfo>,
    /// Run timestamp as reported, or [`NO_TIMESTAMP`].
    pub timestamp: String,
    /// Category of the run.
    pub category: Category,
    /// Headline count of the run.
    pub count: u64,
}

/// Combined and individual runs, each newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunHistory {
    /// Combined runs.
    pub combined: Vec<CombinedRun>,
    /// Single-category runs.
    pub individual: Vec<IndividualRun>,
}

impl RunHistory {
    /// Whether no run matched.
    pub fn is_empty(&self) -> bool {
        self.combined.is_empty() && self.individual.is_empty()
    }
}

fn path_contains(document: &ResultDocument, filter: &str) -> bool {
    document
        .repository_info
        .as_ref()
        .and_then(|info| info.path.as_deref())
        .is_some_and(|path| path.contains(filter))
}

fn run_time(document: &ResultDocument) -> Option<DateTime<Utc>> {
    document.timestamp.as_deref().and_then(parse_timestamp)
}

fn display_timestamp(document: &ResultDocument) -> String {
    document
        .timestamp
        .clone()
        .filter(|timestamp| !timestamp.is_empty())
        .unwrap_or_else(|| NO_TIMESTAMP.to_string())
}

/// First non-zero count in the order vulnerabilities, complexity, smells,
/// quality, violations.
pub fn headline_count(document: &ResultDocument) -> u64 {
    [
        document.vulnerabilities_count,
        document.cyclomatic_complexity,
        document.smells_count,
        document.quality_count,
        document.violation_count,
    ]
    .into_iter()
    .flatten()
    .find(|count| *count != 0)
    .unwrap_or(0)
}

fn newest_first<'a>(documents: impl Iterator<Item = &'a ResultDocument>) -> Vec<&'a ResultDocument> {
    let mut documents: Vec<&ResultDocument> = documents.collect();
    documents.sort_by_key(|document| Reverse(run_time(document)));
    documents
}

/// Runs of every file whose path contains `filter`.
pub fn run_history(bundle: &ResultsBundle, filter: &str) -> RunHistory {
    let combined = newest_first(
        bundle
            .combined_results
            .iter()
            .filter(|document| path_contains(document, filter)),
    )
    .into_iter()
    .map(|document| CombinedRun {
        id: document.id.clone(),
        repository_info: document.repository_info.clone(),
        timestamp: display_timestamp(document),
        counts: COMBINED_ORDER
            .into_iter()
            .map(|category| {
                category
                    .nested_document(document)
                    .and_then(|nested| category.count(nested))
                    .unwrap_or(0)
            })
            .collect(),
    })
    .collect();

    let mut tagged: Vec<(Category, &ResultDocument)> = Category::ALL
        .into_iter()
        .flat_map(|category| {
            bundle
                .results(category)
                .iter()
                .filter(|document| path_contains(document, filter))
                .map(move |document| (category, document))
        })
        .collect();
    tagged.sort_by_key(|(_, document)| Reverse(run_time(document)));
    let individual = tagged
        .into_iter()
        .map(|(category, document)| IndividualRun {
            id: document.id.clone(),
            repository_info: document.repository_info.clone(),
            timestamp: display_timestamp(document),
            category,
            count: headline_count(document),
        })
        .collect();

    RunHistory {
        combined,
        individual,
    }
}
