//! Category co-occurrence counting over correlated lines.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::FileAggregate;
use crate::domain::Category;

/// Counts of lines on which two categories both report an issue.
///
/// Both `[a][b]` and `[b][a]` are incremented for every pair, so the matrix
/// is symmetric by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoOccurrenceMatrix {
    counts: BTreeMap<Category, BTreeMap<Category, u64>>,
}

impl Default for CoOccurrenceMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl CoOccurrenceMatrix {
    /// A zeroed matrix over the issue categories.
    pub fn new() -> Self {
        let counts = Category::ISSUE_CATEGORIES
            .into_iter()
            .map(|row| {
                let cells = Category::ISSUE_CATEGORIES
                    .into_iter()
                    .map(|column| (column, 0))
                    .collect();
                (row, cells)
            })
            .collect();
        Self { counts }
    }

    /// Count at `[row][column]`.
    pub fn get(&self, row: Category, column: Category) -> u64 {
        self.counts
            .get(&row)
            .and_then(|cells| cells.get(&column))
            .copied()
            .unwrap_or(0)
    }

    fn increment(&mut self, row: Category, column: Category) {
        *self
            .counts
            .entry(row)
            .or_default()
            .entry(column)
            .or_insert(0) += 1;
    }

    /// Row labels in order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.counts.keys().copied()
    }

    /// Largest cell value.
    pub fn max(&self) -> u64 {
        self.counts
            .values()
            .flat_map(BTreeMap::values)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Whether every cell is zero.
    pub fn is_empty(&self) -> bool {
        self.max() == 0
    }
}

/// Count category co-occurrences on every surviving line of an aggregate.
///
/// Each entry on a line contributes its category, repeated per entry, and
/// every ordered pair of distinct categories is counted.
pub fn co_occurrence(aggregate: &FileAggregate) -> CoOccurrenceMatrix {
    let mut matrix = CoOccurrenceMatrix::new();
    for (_, lines) in aggregate.files() {
        for entries in lines.values() {
            let categories: Vec<Category> = entries.iter().map(|entry| entry.category).collect();
            for &row in &categories {
                for &column in &categories {
                    if row != column {
                        matrix.increment(row, column);
                    }
                }
            }
        }
    }
    matrix
}
