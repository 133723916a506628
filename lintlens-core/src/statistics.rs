//! Issue key frequencies across every analysed file.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::descriptions;
use crate::domain::{Category, ResultsBundle};
use crate::parser::statistic_key;

/// One classification key and how often it was reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticRow {
    /// Classification key.
    pub key: String,
    /// Short summary of the key, or the key itself.
    pub summary: String,
    /// Number of reports.
    pub count: u64,
}

/// Key frequencies of one category, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistics {
    /// Category counted.
    pub category: Category,
    /// Rows sorted by count, then key.
    pub rows: Vec<StatisticRow>,
}

impl CategoryStatistics {
    /// Total number of reports in the category.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}

/// Count classification keys in each category's own issue list.
///
/// Only the per-category runs are counted; combined runs are not.
pub fn key_counts(bundle: &ResultsBundle, category: Category) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for document in bundle.results(category) {
        for raw in category.issues(document).unwrap_or(&[]) {
            *counts.entry(statistic_key(raw)).or_insert(0) += 1;
        }
    }
    counts
}

/// Statistics of one category.
pub fn category_statistics(bundle: &ResultsBundle, category: Category) -> CategoryStatistics {
    let mut rows: Vec<StatisticRow> = key_counts(bundle, category)
        .into_iter()
        .map(|(key, count)| StatisticRow {
            summary: descriptions::summary(category, &key)
                .map(str::to_string)
                .unwrap_or_else(|| key.clone()),
            key,
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    CategoryStatistics { category, rows }
}

/// Statistics of every issue category.
pub fn issue_statistics(bundle: &ResultsBundle) -> Vec<CategoryStatistics> {
    Category::ISSUE_CATEGORIES
        .into_iter()
        .map(|category| category_statistics(bundle, category))
        .collect()
}
