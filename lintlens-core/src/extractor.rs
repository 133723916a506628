//! Issue extraction from result documents of either shape.

use crate::domain::{Category, ResultDocument, ResultsBundle};

/// One result document attributed to a category.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisResult<'a> {
    /// Category the document is read as.
    pub category: Category,
    /// The document itself.
    pub document: &'a ResultDocument,
}

impl<'a> AnalysisResult<'a> {
    /// Attribute a document to a category.
    pub fn new(category: Category, document: &'a ResultDocument) -> Self {
        Self { category, document }
    }
}

/// Where a document keeps its issue list, resolved once per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape<'a> {
    /// Issues live on the document itself.
    Direct(&'a [String]),
    /// Issues live in the document's `<category>ResultDocument`.
    Nested(&'a [String]),
    /// Neither shape is present.
    Empty,
}

impl<'a> DocumentShape<'a> {
    /// Resolve the shape of `document` when read as `category`.
    pub fn resolve(document: &'a ResultDocument, category: Category) -> Self {
        if let Some(issues) = document.direct_issues() {
            return Self::Direct(issues);
        }
        match category.nested_document(document) {
            Some(nested) => Self::Nested(nested.direct_issues().unwrap_or(&[])),
            None => Self::Empty,
        }
    }

    /// The resolved issue list.
    pub fn issues(self) -> &'a [String] {
        match self {
            Self::Direct(issues) | Self::Nested(issues) => issues,
            Self::Empty => &[],
        }
    }
}

/// Raw issue strings extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIssues<'a> {
    /// File the issues belong to.
    pub path: &'a str,
    /// Category the issues were read as.
    pub category: Category,
    /// Raw violation strings.
    pub issues: &'a [String],
}

/// Extract the issue strings of a document.
///
/// Returns `None` when the document cannot be attributed to a file.
pub fn extract<'a>(result: &AnalysisResult<'a>) -> Option<ExtractedIssues<'a>> {
    let Some(path) = result.document.path() else {
        log::debug!(
            "skipping {} document without repository path",
            result.category
        );
        return None;
    };
    let issues = DocumentShape::resolve(result.document, result.category).issues();
    Some(ExtractedIssues {
        path,
        category: result.category,
        issues,
    })
}

/// Flatten a bundle into category-attributed documents.
///
/// Each combined run is read once per issue category, followed by the
/// per-category runs.
pub fn analysis_results(bundle: &ResultsBundle) -> Vec<AnalysisResult<'_>> {
    let combined = bundle.combined_results.iter().flat_map(|document| {
        Category::ISSUE_CATEGORIES
            .into_iter()
            .map(move |category| AnalysisResult::new(category, document))
    });
    let direct = Category::ISSUE_CATEGORIES.into_iter().flat_map(|category| {
        bundle
            .results(category)
            .iter()
            .map(move |document| AnalysisResult::new(category, document))
    });
    combined.chain(direct).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryInfo;

    fn info(path: &str) -> Option<RepositoryInfo> {
        Some(RepositoryInfo {
            path: Some(path.to_string()),
            ..RepositoryInfo::default()
        })
    }

    #[test]
    fn resolves_direct_shape_first() {
        let document = ResultDocument {
            repository_info: info("Foo.java"),
            vulnerabilities: Some(vec!["Violation at line 1: Potential SQL".to_string()]),
            security_result_document: Some(Box::new(ResultDocument {
                vulnerabilities: Some(vec!["nested".to_string()]),
                ..ResultDocument::default()
            })),
            ..ResultDocument::default()
        };
        let shape = DocumentShape::resolve(&document, Category::Security);
        assert!(matches!(shape, DocumentShape::Direct(issues) if issues.len() == 1));
    }

    #[test]
    fn resolves_nested_shape_per_category() {
        let document = ResultDocument {
            repository_info: info("Foo.java"),
            style_result_document: Some(Box::new(ResultDocument {
                violations: Some(vec!["Violation at line 2: Magic number".to_string()]),
                ..ResultDocument::default()
            })),
            ..ResultDocument::default()
        };
        let style = DocumentShape::resolve(&document, Category::Style);
        assert_eq!(style.issues().len(), 1);
        assert!(matches!(style, DocumentShape::Nested(_)));
        assert_eq!(
            DocumentShape::resolve(&document, Category::Security),
            DocumentShape::Empty
        );
    }

    #[test]
    fn nested_document_without_lists_is_empty_not_error() {
        let document = ResultDocument {
            repository_info: info("Foo.java"),
            quality_result_document: Some(Box::new(ResultDocument::default())),
            ..ResultDocument::default()
        };
        let shape = DocumentShape::resolve(&document, Category::Quality);
        assert!(matches!(shape, DocumentShape::Nested(issues) if issues.is_empty()));
    }

    #[test]
    fn extract_skips_documents_without_path() {
        let document = ResultDocument {
            vulnerabilities: Some(vec!["x".to_string()]),
            ..ResultDocument::default()
        };
        let result = AnalysisResult::new(Category::Security, &document);
        assert!(extract(&result).is_none());
    }

    #[test]
    fn analysis_results_reads_combined_runs_per_category() {
        let bundle = ResultsBundle {
            combined_results: vec![ResultDocument::default()],
            style_results: vec![ResultDocument::default(), ResultDocument::default()],
            complexity_results: vec![ResultDocument::default()],
            ..ResultsBundle::default()
        };
        let results = analysis_results(&bundle);
        assert_eq!(results.len(), 6);
        let categories: Vec<Category> = results.iter().map(|result| result.category).collect();
        assert_eq!(&categories[..4], &Category::ISSUE_CATEGORIES);
        assert!(categories[4..].iter().all(|c| *c == Category::Style));
    }
}
