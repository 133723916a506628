//! Views over a single stored analysis and its raw source.

use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::descriptions::{self, ComplexityReading};
use crate::domain::{Category, RepositoryInfo, ResultDocument, StoredResults};
use crate::parser::{highlighted_line, issue_key, violation_line};

/// One issue of a stored run with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueLine {
    /// Reported line, if any.
    pub line: Option<u32>,
    /// Raw violation text.
    pub text: String,
    /// Classification key, if the text carries one.
    pub key: Option<String>,
    /// Long-form explanation of the key.
    pub explanation: String,
}

/// Issues of one category in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    /// Category shown.
    pub category: Category,
    /// Count reported by the run.
    pub count: Option<u64>,
    /// Issues sorted by line; unnumbered issues first.
    pub issues: Vec<IssueLine>,
}

/// Everything stored under one identifier, ready to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredView {
    /// Database identifier.
    pub id: Option<String>,
    /// Human-readable identifier.
    pub custom_id: Option<String>,
    /// Run timestamp.
    pub timestamp: Option<String>,
    /// Analysed source.
    pub repository_info: Option<RepositoryInfo>,
    /// One view per issue category that was stored.
    pub categories: Vec<CategoryView>,
    /// Complexity score, when a complexity run was stored.
    pub complexity: Option<ComplexityReading>,
}

fn issue_lines(category: Category, document: &ResultDocument) -> Vec<IssueLine> {
    let mut issues: Vec<IssueLine> = category
        .issues(document)
        .or_else(|| document.direct_issues())
        .unwrap_or(&[])
        .iter()
        .map(|raw| {
            let key = issue_key(raw);
            let explanation = key
                .as_deref()
                .map_or(descriptions::DETAIL_UNAVAILABLE, |key| {
                    descriptions::explanation(category, key)
                })
                .to_string();
            IssueLine {
                line: violation_line(raw),
                text: raw.clone(),
                key,
                explanation,
            }
        })
        .collect();
    issues.sort_by_key(|issue| issue.line.unwrap_or(0));
    issues
}

/// Build the display view of a stored analysis.
pub fn stored_view(stored: &StoredResults) -> StoredView {
    let categories = Category::ISSUE_CATEGORIES
        .into_iter()
        .filter_map(|category| {
            stored.document(category).map(|document| CategoryView {
                category,
                count: category.count(document),
                issues: issue_lines(category, document),
            })
        })
        .collect();

    let complexity = stored
        .document(Category::Complexity)
        .map(|document| {
            descriptions::complexity_reading(document.cyclomatic_complexity.unwrap_or(0))
        });

    StoredView {
        id: stored.runs().find_map(|run| run.id.clone()),
        custom_id: stored.runs().find_map(|run| run.custom_id.clone()),
        timestamp: stored.runs().find_map(|run| run.timestamp.clone()),
        repository_info: stored.repository_info().cloned(),
        categories,
        complexity,
    }
}

const HIGHLIGHT_ORDER: [Category; 4] = [
    Category::Quality,
    Category::CodeSmell,
    Category::Style,
    Category::Security,
];

// Checked in the order the result views list them.
fn highlight_issues(document: &ResultDocument) -> &[String] {
    document
        .duplications
        .as_deref()
        .or(document.violations.as_deref())
        .or(document.smells.as_deref())
        .or(document.vulnerabilities.as_deref())
        .unwrap_or(&[])
}

/// Distinct `Violation at line N:` lines across every stored run.
pub fn highlighted_lines(stored: &StoredResults) -> BTreeSet<u32> {
    let direct = HIGHLIGHT_ORDER
        .into_iter()
        .filter_map(|category| stored.result(category));
    let nested = stored.combined_result.iter().flat_map(|combined| {
        HIGHLIGHT_ORDER
            .into_iter()
            .filter_map(move |category| category.nested_document(combined))
    });
    direct
        .chain(nested)
        .flat_map(highlight_issues)
        .filter_map(|raw| highlighted_line(raw))
        .collect()
}

/// One line of raw source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceLine {
    /// 1-based line number.
    pub number: u32,
    /// Line text.
    pub text: String,
    /// Whether an issue was reported on the line.
    pub highlighted: bool,
}

/// Raw source of a stored analysis with issue lines marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceView {
    /// Source the text was fetched for.
    pub repository_info: RepositoryInfo,
    /// Every line of the file.
    pub lines: Vec<SourceLine>,
}

impl RawSourceView {
    /// Numbers of the highlighted lines.
    pub fn highlighted(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(|line| line.highlighted)
            .map(|line| line.number)
    }
}

/// Split source text into numbered lines, marking `highlighted` ones.
pub fn render_highlighted_source(source: &str, highlighted: &BTreeSet<u32>) -> Vec<SourceLine> {
    source
        .split('\n')
        .zip(1u32..)
        .map(|(text, number)| SourceLine {
            number,
            text: text.trim_end_matches('\r').to_string(),
            highlighted: highlighted.contains(&number),
        })
        .collect()
}
