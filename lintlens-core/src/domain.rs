//! Domain entities for LintLens.
//!
//! These mirror the JSON documents served by the analysis backend. Every field
//! is optional because the backend emits several document shapes and older runs
//! omit fields that newer runs carry.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{LintLensError, Result};

/// Analysis category reported by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Security vulnerabilities.
    Security,
    /// Code smells.
    CodeSmell,
    /// Quality findings such as duplications.
    Quality,
    /// Style violations.
    Style,
    /// Cyclomatic complexity score.
    Complexity,
}

impl Category {
    /// Categories that report per-line issue strings.
    pub const ISSUE_CATEGORIES: [Category; 4] = [
        Category::Security,
        Category::CodeSmell,
        Category::Quality,
        Category::Style,
    ];

    /// Every category, in backend payload order.
    pub const ALL: [Category; 5] = [
        Category::Security,
        Category::CodeSmell,
        Category::Quality,
        Category::Style,
        Category::Complexity,
    ];

    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::CodeSmell => "codeSmell",
            Self::Quality => "quality",
            Self::Style => "style",
            Self::Complexity => "complexity",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::CodeSmell => "Code Smell",
            Self::Quality => "Quality",
            Self::Style => "Style",
            Self::Complexity => "Complexity",
        }
    }

    /// Name of the trend series the category feeds.
    pub fn series_name(self) -> &'static str {
        match self {
            Self::CodeSmell => "smells",
            other => other.as_str(),
        }
    }

    /// Whether the category reports issue strings.
    pub fn has_issues(self) -> bool {
        !matches!(self, Self::Complexity)
    }

    /// The category's own issue list on a document.
    pub fn issues(self, document: &ResultDocument) -> Option<&[String]> {
        match self {
            Self::Security => document.vulnerabilities.as_deref(),
            Self::CodeSmell => document.smells.as_deref(),
            Self::Quality => document.duplications.as_deref(),
            Self::Style => document.violations.as_deref(),
            Self::Complexity => None,
        }
    }

    /// The category's own count field on a document.
    pub fn count(self, document: &ResultDocument) -> Option<u64> {
        match self {
            Self::Security => document.vulnerabilities_count,
            Self::CodeSmell => document.smells_count,
            Self::Quality => document.quality_count,
            Self::Style => document.violation_count,
            Self::Complexity => document.cyclomatic_complexity,
        }
    }

    /// The nested `<category>ResultDocument` of a combined document.
    pub fn nested_document(self, document: &ResultDocument) -> Option<&ResultDocument> {
        match self {
            Self::Security => document.security_result_document.as_deref(),
            Self::CodeSmell => document.code_smell_result_document.as_deref(),
            Self::Quality => document.quality_result_document.as_deref(),
            Self::Style => document.style_result_document.as_deref(),
            Self::Complexity => document.complexity_result_document.as_deref(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LintLensError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "security" | "vulnerabilities" => Ok(Self::Security),
            "codesmell" | "code-smell" | "smell" | "smells" => Ok(Self::CodeSmell),
            "quality" | "duplications" => Ok(Self::Quality),
            "style" | "violations" => Ok(Self::Style),
            "complexity" => Ok(Self::Complexity),
            other => Err(LintLensError::Other(format!("unknown category: {other}"))),
        }
    }
}

/// Identifies the analysed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    /// Repository owner.
    #[serde(default, deserialize_with = "lenient_text")]
    pub username: Option<String>,
    /// Repository name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub repo: Option<String>,
    /// Analysed commit.
    #[serde(default, deserialize_with = "lenient_text")]
    pub commit_id: Option<String>,
    /// File path within the repository.
    #[serde(default, deserialize_with = "lenient_text")]
    pub path: Option<String>,
}

impl RepositoryInfo {
    /// The file path, if present and non-empty.
    pub fn file_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|path| !path.is_empty())
    }
}

/// A single analysis result document.
///
/// Per-category documents carry their issue list and count directly. Combined
/// documents carry one nested `<category>ResultDocument` per category instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultDocument {
    /// Database identifier.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub id: Option<String>,
    /// Human-readable identifier.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub custom_id: Option<String>,
    /// Time the analysis ran.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp: Option<String>,
    /// Analysed source.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub repository_info: Option<RepositoryInfo>,
    /// Security findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_issues"
    )]
    pub vulnerabilities: Option<Vec<String>>,
    /// Code smell findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_issues"
    )]
    pub smells: Option<Vec<String>>,
    /// Quality findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_issues"
    )]
    pub duplications: Option<Vec<String>>,
    /// Style findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_issues"
    )]
    pub violations: Option<Vec<String>>,
    /// Number of security findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub vulnerabilities_count: Option<u64>,
    /// Number of code smells.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub smells_count: Option<u64>,
    /// Number of quality findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub quality_count: Option<u64>,
    /// Number of style findings.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub violation_count: Option<u64>,
    /// Cyclomatic complexity score.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub cyclomatic_complexity: Option<u64>,
    /// Nested security document of a combined run.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub security_result_document: Option<Box<ResultDocument>>,
    /// Nested code smell document of a combined run.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub code_smell_result_document: Option<Box<ResultDocument>>,
    /// Nested quality document of a combined run.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub quality_result_document: Option<Box<ResultDocument>>,
    /// Nested style document of a combined run.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub style_result_document: Option<Box<ResultDocument>>,
    /// Nested complexity document of a combined run.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_value"
    )]
    pub complexity_result_document: Option<Box<ResultDocument>>,
}

impl ResultDocument {
    /// The analysed file path, if any.
    pub fn path(&self) -> Option<&str> {
        self.repository_info
            .as_ref()
            .and_then(RepositoryInfo::file_path)
    }

    /// First issue list present on the document itself.
    ///
    /// Checked in the order vulnerabilities, smells, duplications, violations.
    /// A present but empty list still wins.
    pub fn direct_issues(&self) -> Option<&[String]> {
        self.vulnerabilities
            .as_deref()
            .or(self.smells.as_deref())
            .or(self.duplications.as_deref())
            .or(self.violations.as_deref())
    }
}

/// Payload of `/api/combined-results/all` and its path-filtered variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsBundle {
    /// Security runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub security_results: Vec<ResultDocument>,
    /// Code smell runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub code_smell_results: Vec<ResultDocument>,
    /// Quality runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub quality_results: Vec<ResultDocument>,
    /// Style runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub style_results: Vec<ResultDocument>,
    /// Complexity runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub complexity_results: Vec<ResultDocument>,
    /// Combined runs.
    #[serde(default, deserialize_with = "lenient_documents")]
    pub combined_results: Vec<ResultDocument>,
}

impl ResultsBundle {
    /// Per-category runs for a category.
    pub fn results(&self, category: Category) -> &[ResultDocument] {
        match category {
            Category::Security => &self.security_results,
            Category::CodeSmell => &self.code_smell_results,
            Category::Quality => &self.quality_results,
            Category::Style => &self.style_results,
            Category::Complexity => &self.complexity_results,
        }
    }

    /// Every document in payload order, combined runs last.
    pub fn documents(&self) -> impl Iterator<Item = &ResultDocument> {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.results(category).iter())
            .chain(self.combined_results.iter())
    }

    /// Repository info of the first document analysing `path`.
    pub fn repository_info(&self, path: &str) -> Option<&RepositoryInfo> {
        self.documents()
            .filter_map(|document| document.repository_info.as_ref())
            .find(|info| info.path.as_deref() == Some(path))
    }

    /// Whether the bundle carries no documents at all.
    pub fn is_empty(&self) -> bool {
        self.documents().next().is_none()
    }
}

/// Payload of `/api/results-all/{id}` and `/api/results-all/custom/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredResults {
    /// Security run.
    #[serde(deserialize_with = "lenient_value")]
    pub security_result: Option<ResultDocument>,
    /// Complexity run.
    #[serde(deserialize_with = "lenient_value")]
    pub complexity_result: Option<ResultDocument>,
    /// Code smell run.
    #[serde(deserialize_with = "lenient_value")]
    pub code_smell_result: Option<ResultDocument>,
    /// Quality run.
    #[serde(deserialize_with = "lenient_value")]
    pub quality_result: Option<ResultDocument>,
    /// Style run.
    #[serde(deserialize_with = "lenient_value")]
    pub style_result: Option<ResultDocument>,
    /// Combined run.
    #[serde(deserialize_with = "lenient_value")]
    pub combined_result: Option<ResultDocument>,
}

impl StoredResults {
    /// The per-category run, if stored.
    pub fn result(&self, category: Category) -> Option<&ResultDocument> {
        match category {
            Category::Security => self.security_result.as_ref(),
            Category::CodeSmell => self.code_smell_result.as_ref(),
            Category::Quality => self.quality_result.as_ref(),
            Category::Style => self.style_result.as_ref(),
            Category::Complexity => self.complexity_result.as_ref(),
        }
    }

    /// The per-category run, falling back to the combined run's nested document.
    pub fn document(&self, category: Category) -> Option<&ResultDocument> {
        self.result(category).or_else(|| {
            self.combined_result
                .as_ref()
                .and_then(|combined| category.nested_document(combined))
        })
    }

    /// Every stored run in lookup order.
    pub fn runs(&self) -> impl Iterator<Item = &ResultDocument> {
        [
            self.security_result.as_ref(),
            self.complexity_result.as_ref(),
            self.code_smell_result.as_ref(),
            self.quality_result.as_ref(),
            self.style_result.as_ref(),
            self.combined_result.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Repository info of the first stored run carrying one.
    pub fn repository_info(&self) -> Option<&RepositoryInfo> {
        self.runs().find_map(|run| run.repository_info.as_ref())
    }

    /// Whether nothing was stored under the identifier.
    pub fn is_empty(&self) -> bool {
        self.runs().next().is_none()
    }
}

// Each field decodes on its own. A mistyped value becomes `None` instead of
// failing the whole document.

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        // Numeric timestamps are epoch milliseconds.
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|millis| millis.is_finite()).map(|millis| millis as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|time| time.to_rfc3339()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|count| count.is_finite() && *count >= 0.0)
                .map(|count| count as u64)
        }),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_issues<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    other => {
                        log::debug!("skipping non-text issue entry: {other}");
                        None
                    }
                })
                .collect(),
        ),
        Some(other) => {
            log::debug!("ignoring issue list that is not an array: {other}");
            None
        }
        None => None,
    })
}

fn lenient_value<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|value| match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::debug!("ignoring malformed nested value: {err}");
            None
        }
    }))
}

fn lenient_documents<'de, D>(deserializer: D) -> std::result::Result<Vec<ResultDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let documents = values
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<ResultDocument>(value) {
                Ok(document) => Some(document),
                Err(err) => {
                    log::warn!("skipping malformed result document #{index}: {err}");
                    None
                }
            },
        )
        .collect();
    Ok(documents)
}
