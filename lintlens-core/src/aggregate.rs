//! Cross-category grouping of issues by file and line.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, ResultsBundle};
use crate::extractor::{AnalysisResult, analysis_results, extract};
use crate::parser::{LineKey, parse_issue};

/// One deduplicated issue on a line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct IssueEntry {
    /// Category that reported the issue.
    #[serde(rename = "type")]
    pub category: Category,
    /// Issue detail text.
    pub detail: String,
}

/// Issues of one file keyed by line.
pub type LineIssues = BTreeMap<LineKey, BTreeSet<IssueEntry>>;

/// Per-category line index of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileIssues {
    by_category: BTreeMap<Category, LineIssues>,
}

impl FileIssues {
    fn new() -> Self {
        let by_category = Category::ISSUE_CATEGORIES
            .into_iter()
            .map(|category| (category, LineIssues::new()))
            .collect();
        Self { by_category }
    }

    fn insert(&mut self, category: Category, line: LineKey, detail: String) -> bool {
        self.by_category
            .entry(category)
            .or_default()
            .entry(line)
            .or_default()
            .insert(IssueEntry { category, detail })
    }

    /// Lines reported by one category.
    pub fn lines(&self, category: Category) -> Option<&LineIssues> {
        self.by_category.get(&category)
    }

    /// Categories with at least one entry on `line`.
    pub fn categories_at(&self, line: &LineKey) -> BTreeSet<Category> {
        self.by_category
            .iter()
            .filter(|(_, lines)| lines.get(line).is_some_and(|set| !set.is_empty()))
            .map(|(category, _)| *category)
            .collect()
    }

    /// Every issue of the file merged across categories.
    pub fn merged(&self) -> LineIssues {
        let mut merged = LineIssues::new();
        for lines in self.by_category.values() {
            for (line, entries) in lines {
                merged
                    .entry(line.clone())
                    .or_default()
                    .extend(entries.iter().cloned());
            }
        }
        merged
    }

    /// Total number of deduplicated entries.
    pub fn issue_count(&self) -> usize {
        self.by_category
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }
}

/// Issues grouped by file, category and line, plus the lines flagged by more
/// than one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAggregate {
    index: BTreeMap<String, FileIssues>,
    files: BTreeMap<String, LineIssues>,
}

impl FileAggregate {
    /// Per-category index of a file.
    pub fn index(&self, path: &str) -> Option<&FileIssues> {
        self.index.get(path)
    }

    /// Surviving lines of a file. Empty when no line is shared by two
    /// categories.
    pub fn file(&self, path: &str) -> Option<&LineIssues> {
        self.files.get(path)
    }

    /// Entries on one surviving line.
    pub fn line(&self, path: &str, line: &LineKey) -> Option<&BTreeSet<IssueEntry>> {
        self.files.get(path).and_then(|lines| lines.get(line))
    }

    /// Every file with its surviving lines.
    pub fn files(&self) -> impl Iterator<Item = (&str, &LineIssues)> {
        self.files.iter().map(|(path, lines)| (path.as_str(), lines))
    }

    /// Files with at least one surviving line.
    pub fn correlated_files(&self) -> impl Iterator<Item = (&str, &LineIssues)> {
        self.files().filter(|(_, lines)| !lines.is_empty())
    }

    /// Number of files seen.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file was attributed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Group the issues of every result by file and line.
///
/// Lines reported by a single category are dropped from the merged per-file
/// view but stay in the per-category index.
pub fn aggregate(results: &[AnalysisResult<'_>]) -> FileAggregate {
    let mut index: BTreeMap<String, FileIssues> = BTreeMap::new();

    for result in results {
        let Some(extracted) = extract(result) else {
            continue;
        };
        let file = index
            .entry(extracted.path.to_string())
            .or_insert_with(FileIssues::new);
        for raw in extracted.issues {
            let parsed = parse_issue(raw);
            file.insert(extracted.category, parsed.line, parsed.detail);
        }
    }

    let files = index
        .iter()
        .map(|(path, file)| {
            let mut merged = file.merged();
            merged.retain(|line, _| file.categories_at(line).len() >= 2);
            (path.clone(), merged)
        })
        .collect();

    FileAggregate { index, files }
}

/// Aggregate every issue category of a bundle.
pub fn aggregate_bundle(bundle: &ResultsBundle) -> FileAggregate {
    aggregate(&analysis_results(bundle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RepositoryInfo, ResultDocument};

    fn document(path: &str, category: Category, issues: &[&str]) -> ResultDocument {
        let issues: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
        let mut document = ResultDocument {
            repository_info: Some(RepositoryInfo {
                path: Some(path.to_string()),
                ..RepositoryInfo::default()
            }),
            ..ResultDocument::default()
        };
        match category {
            Category::Security => document.vulnerabilities = Some(issues),
            Category::CodeSmell => document.smells = Some(issues),
            Category::Quality => document.duplications = Some(issues),
            Category::Style => document.violations = Some(issues),
            Category::Complexity => {}
        }
        document
    }

    #[test]
    fn keeps_lines_flagged_by_two_categories() {
        let security = document(
            "Foo.java",
            Category::Security,
            &["Violation at line 10: Potential SQL injection"],
        );
        let style = document(
            "Foo.java",
            Category::Style,
            &[
                "Violation at line 10: Magic number detected",
                "Violation at line 11: Opening brace misplaced",
            ],
        );
        let results = vec![
            AnalysisResult::new(Category::Security, &security),
            AnalysisResult::new(Category::Style, &style),
        ];
        let aggregate = aggregate(&results);

        let line = aggregate
            .line("Foo.java", &LineKey::Number(10))
            .expect("line 10 survives");
        assert_eq!(line.len(), 2);
        assert!(aggregate.line("Foo.java", &LineKey::Number(11)).is_none());

        let index = aggregate.index("Foo.java").expect("index");
        assert!(
            index
                .lines(Category::Style)
                .expect("style")
                .contains_key(&LineKey::Number(11))
        );
    }

    #[test]
    fn collapses_duplicate_entries() {
        let security = document(
            "Foo.java",
            Category::Security,
            &[
                "Violation at line 5: Potential XSS",
                "Violation at line 5: Potential XSS",
            ],
        );
        let quality = document(
            "Foo.java",
            Category::Quality,
            &["Violation at line 5: Duplicate code"],
        );
        let results = vec![
            AnalysisResult::new(Category::Security, &security),
            AnalysisResult::new(Category::Quality, &quality),
            AnalysisResult::new(Category::Security, &security),
        ];
        let aggregate = aggregate(&results);
        let line = aggregate
            .line("Foo.java", &LineKey::Number(5))
            .expect("line 5");
        assert_eq!(line.len(), 2);
        assert_eq!(aggregate.index("Foo.java").expect("index").issue_count(), 2);
    }

    #[test]
    fn single_category_file_has_empty_entry() {
        let style = document(
            "Only.java",
            Category::Style,
            &[
                "Violation at line 1: Magic number",
                "Violation at line 2: Method name",
            ],
        );
        let results = vec![AnalysisResult::new(Category::Style, &style)];
        let aggregate = aggregate(&results);
        assert!(aggregate.file("Only.java").expect("file").is_empty());
        assert_eq!(aggregate.correlated_files().count(), 0);
    }

    #[test]
    fn surviving_lines_always_have_two_categories() {
        let security = document(
            "A.java",
            Category::Security,
            &["Violation at line 1: a", "Violation at line 2: b", "oops"],
        );
        let smells = document(
            "A.java",
            Category::CodeSmell,
            &["Violation at line 2: c", "Violation at line 3: d", "other"],
        );
        let results = vec![
            AnalysisResult::new(Category::Security, &security),
            AnalysisResult::new(Category::CodeSmell, &smells),
        ];
        let aggregate = aggregate(&results);
        for (path, lines) in aggregate.files() {
            let index = aggregate.index(path).expect("index");
            for line in lines.keys() {
                assert!(index.categories_at(line).len() >= 2);
            }
        }
        let lines = aggregate.file("A.java").expect("file");
        assert_eq!(
            lines.keys().cloned().collect::<Vec<_>>(),
            vec![LineKey::Number(2), LineKey::Unknown]
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let security = document("B.java", Category::Security, &["Violation at line 4: x"]);
        let style = document("B.java", Category::Style, &["Violation at line 4: y"]);
        let results = vec![
            AnalysisResult::new(Category::Security, &security),
            AnalysisResult::new(Category::Style, &style),
        ];
        let reversed = vec![results[1], results[0]];
        assert_eq!(aggregate(&results), aggregate(&results));
        assert_eq!(aggregate(&results), aggregate(&reversed));
    }
}
