use lintlens_core::{
    Category, LineKey, ResultsBundle, aggregate_bundle, co_occurrence, correlation_report,
    heatmap_snapshot, issue_statistics, trend_for_path,
};
use serde_json::json;

fn bundle() -> ResultsBundle {
    serde_json::from_value(json!({
        "securityResults": [{
            "timestamp": "2024-05-01T09:00:00Z",
            "vulnerabilitiesCount": 1,
            "repositoryInfo": {"username": "octo", "repo": "demo", "commitId": "c1", "path": "Foo.java"},
            "vulnerabilities": ["Violation at line 10: Potential SQL injection risk"]
        }],
        "styleResults": [
            {
                "timestamp": "2024-05-01T09:05:00Z",
                "violationCount": 2,
                "repositoryInfo": {"username": "octo", "repo": "demo", "commitId": "c1", "path": "Foo.java"},
                "violations": [
                    "Violation at line 10: Magic number 42",
                    "Violation at line 12: Method name Bad"
                ]
            },
            {
                "timestamp": "2024-05-01T09:06:00Z",
                "violationCount": 1,
                "repositoryInfo": {"path": "Bar.java"},
                "violations": ["Violation at line 3: Magic number 9"]
            },
            "not a document"
        ],
        "combinedResults": [{
            "timestamp": "2024-05-02T09:00:00Z",
            "repositoryInfo": {"path": "Foo.java"},
            "securityResultDocument": {
                "vulnerabilitiesCount": 3,
                "vulnerabilities": ["Violation at line 10: Potential SQL injection risk"]
            }
        }]
    }))
    .expect("bundle")
}

#[test]
fn correlates_lines_across_categories() {
    let bundle = bundle();
    let aggregate = aggregate_bundle(&bundle);

    let line = aggregate
        .line("Foo.java", &LineKey::Number(10))
        .expect("line 10 is correlated");
    assert_eq!(line.len(), 2);
    assert!(aggregate.line("Foo.java", &LineKey::Number(12)).is_none());
    assert!(aggregate.file("Bar.java").expect("Bar.java").is_empty());

    let matrix = co_occurrence(&aggregate);
    assert_eq!(matrix.get(Category::Security, Category::Style), 1);
    assert_eq!(matrix.get(Category::Style, Category::Security), 1);
    assert_eq!(matrix.get(Category::Security, Category::Quality), 0);
}

#[test]
fn builds_every_view_from_one_bundle() {
    let bundle = bundle();

    let report = correlation_report(&bundle);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, "Foo.java");

    let statistics = issue_statistics(&bundle);
    let style = statistics
        .iter()
        .find(|stats| stats.category == Category::Style)
        .expect("style statistics");
    assert_eq!(style.total(), 3);
    assert_eq!(style.rows[0].key, "Magic number");
    assert_eq!(style.rows[0].count, 2);

    let snapshot = heatmap_snapshot(&bundle, None);
    let paths: Vec<&str> = snapshot.rows.iter().map(|row| row.path.as_str()).collect();
    assert_eq!(paths, vec!["Foo.java", "Bar.java"]);
    assert_eq!(snapshot.rows[0].counts, vec![1, 0, 0, 2, 0]);

    let trend = trend_for_path(&bundle, "Foo.java");
    let security = trend.series(Category::Security).expect("security series");
    let values: Vec<u64> = security.points.iter().map(|point| point.value).collect();
    assert_eq!(values, vec![1, 3]);
}

#[test]
fn mistyped_scalars_do_not_hide_issues() {
    let bundle: ResultsBundle = serde_json::from_value(json!({
        "securityResults": [{
            "timestamp": 1714550400000u64,
            "vulnerabilitiesCount": "3",
            "repositoryInfo": {"path": "Foo.java"},
            "vulnerabilities": ["Violation at line 10: Potential SQL injection risk"]
        }],
        "styleResults": [{
            "timestamp": "2024-05-01T09:05:00Z",
            "repositoryInfo": {"path": "Foo.java"},
            "violations": ["Violation at line 10: Magic number 42"]
        }]
    }))
    .expect("bundle");
    assert_eq!(bundle.security_results.len(), 1);
    assert_eq!(bundle.security_results[0].vulnerabilities_count, Some(3));

    let matrix = co_occurrence(&aggregate_bundle(&bundle));
    assert_eq!(matrix.get(Category::Security, Category::Style), 1);
}

#[test]
fn unusual_line_numbers_stay_out_of_the_unknown_group() {
    let bundle: ResultsBundle = serde_json::from_value(json!({
        "securityResults": [{
            "repositoryInfo": {"path": "Foo.java"},
            "vulnerabilities": [
                "Violation at line 99999999999: Potential SQL injection risk",
                "Violation at line 010: Hardcoded secret"
            ]
        }],
        "styleResults": [{
            "repositoryInfo": {"path": "Foo.java"},
            "violations": [
                "Violation: Magic number 42",
                "Violation at line 10: Method name Bad"
            ]
        }]
    }))
    .expect("bundle");
    let aggregate = aggregate_bundle(&bundle);

    assert!(aggregate.line("Foo.java", &LineKey::Unknown).is_none());
    assert!(aggregate.line("Foo.java", &LineKey::Number(10)).is_none());
    assert!(co_occurrence(&aggregate).is_empty());
}
