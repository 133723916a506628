//! Parsing of backend violation strings.
//!
//! The backend reports each finding as text such as
//! `Violation at line 42: Potential SQL injection risk`. The line number is
//! optional for some categories.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LintLensError;

/// Marker used when a violation carries no line number.
pub const UNKNOWN_LINE: &str = "unknown";

/// Source line an issue was reported against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineKey {
    /// A concrete 1-based line number.
    Number(u32),
    /// Digits kept as written, for zero-padded or out-of-range line numbers.
    Literal(String),
    /// The violation carried no usable line number.
    Unknown,
}

impl LineKey {
    /// Key for a run of ASCII digits.
    ///
    /// Only canonical numbers become [`LineKey::Number`], so `010` and `10`
    /// stay distinct lines.
    pub fn from_digits(digits: &str) -> Self {
        match digits.parse::<u32>() {
            Ok(line) if line.to_string() == digits => Self::Number(line),
            _ => Self::Literal(digits.to_string()),
        }
    }

    /// The line number, if known.
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Number(line) => Some(*line),
            Self::Literal(_) | Self::Unknown => None,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(line) => write!(f, "{line}"),
            Self::Literal(digits) => f.write_str(digits),
            Self::Unknown => f.write_str(UNKNOWN_LINE),
        }
    }
}

impl FromStr for LineKey {
    type Err = LintLensError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == UNKNOWN_LINE {
            return Ok(Self::Unknown);
        }
        if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(LintLensError::Other(format!("invalid line key: {value}")));
        }
        Ok(Self::from_digits(value))
    }
}

// Serialized as a string so it can key JSON objects.
impl Serialize for LineKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LineKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A violation string split into line and detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIssue {
    /// Line the issue was reported against.
    pub line: LineKey,
    /// Free-text detail following the line marker.
    pub detail: String,
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"line (\d+):? (.*)").expect("valid line pattern"))
}

fn issue_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Violation(?: at line \d+)?:\s+(\w+\s+\w+)").expect("valid issue key pattern")
    })
}

fn violation_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Violation at line (\d+)(:)?").expect("valid violation line pattern")
    })
}

/// Split a violation string into its line and detail.
///
/// Strings without `line N` fall back to the text after the first colon, and
/// strings without any colon are kept whole as the detail.
pub fn parse_issue(raw: &str) -> ParsedIssue {
    if let Some(captures) = line_pattern().captures(raw) {
        return ParsedIssue {
            line: LineKey::from_digits(&captures[1]),
            detail: captures[2].to_string(),
        };
    }

    let detail = match raw.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => raw.to_string(),
    };
    ParsedIssue {
        line: LineKey::Unknown,
        detail,
    }
}

/// Two-word classification key used to look up issue explanations.
pub fn issue_key(raw: &str) -> Option<String> {
    issue_key_pattern()
        .captures(raw)
        .map(|captures| captures[1].trim().to_string())
}

/// Classification key used by issue statistics.
///
/// Takes the text between the first and second colon and keeps its first two
/// space-separated words.
pub fn statistic_key(raw: &str) -> String {
    let after_colon = raw.split(':').nth(1).unwrap_or("");
    after_colon
        .trim()
        .split(' ')
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Line number of a `Violation at line N` string, used for ordering.
pub fn violation_line(raw: &str) -> Option<u32> {
    violation_line_pattern()
        .captures(raw)
        .and_then(|captures| captures[1].parse().ok())
}

/// Line number of a `Violation at line N:` string, used for highlighting.
pub fn highlighted_line(raw: &str) -> Option<u32> {
    violation_line_pattern()
        .captures(raw)
        .filter(|captures| captures.get(2).is_some())
        .and_then(|captures| captures[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_and_detail() {
        let parsed = parse_issue("Violation at line 42: Potential SQL injection risk");
        assert_eq!(parsed.line, LineKey::Number(42));
        assert_eq!(parsed.detail, "Potential SQL injection risk");
    }

    #[test]
    fn parses_line_without_colon() {
        let parsed = parse_issue("Duplicate block at line 7 Duplicate code found");
        assert_eq!(parsed.line, LineKey::Number(7));
        assert_eq!(parsed.detail, "Duplicate code found");
    }

    #[test]
    fn falls_back_to_text_after_first_colon() {
        let parsed = parse_issue("Violation: Duplicate code found: twice");
        assert_eq!(parsed.line, LineKey::Unknown);
        assert_eq!(parsed.detail, "Duplicate code found: twice");
    }

    #[test]
    fn keeps_unmatched_strings_whole() {
        let parsed = parse_issue("Something odd happened");
        assert_eq!(parsed.line, LineKey::Unknown);
        assert_eq!(parsed.detail, "Something odd happened");
    }

    #[test]
    fn line_keys_order_numbers_before_unknown() {
        let mut keys = vec![LineKey::Unknown, LineKey::Number(10), LineKey::Number(2)];
        keys.sort();
        assert_eq!(
            keys,
            vec![LineKey::Number(2), LineKey::Number(10), LineKey::Unknown]
        );
        assert_eq!(LineKey::Unknown.to_string(), "unknown");
        assert_eq!("12".parse::<LineKey>().expect("parse"), LineKey::Number(12));
        assert_eq!(
            serde_json::to_string(&LineKey::Number(5)).expect("json"),
            "\"5\""
        );
    }

    #[test]
    fn keeps_padded_and_oversized_lines_as_written() {
        let padded = parse_issue("Violation at line 010: Magic number");
        assert_eq!(padded.line, LineKey::Literal("010".to_string()));
        assert_ne!(padded.line, LineKey::Number(10));
        assert_eq!(padded.line.to_string(), "010");

        let oversized = parse_issue("Violation at line 99999999999: Magic number");
        assert_eq!(oversized.line, LineKey::Literal("99999999999".to_string()));
        assert_ne!(oversized.line, LineKey::Unknown);
        assert_eq!(oversized.line.number(), None);

        assert_eq!(
            "010".parse::<LineKey>().expect("parse"),
            LineKey::Literal("010".to_string())
        );
        assert!("1x".parse::<LineKey>().is_err());
        assert!("".parse::<LineKey>().is_err());
    }

    #[test]
    fn extracts_issue_keys() {
        assert_eq!(
            issue_key("Violation at line 3: Potential XSS in output").as_deref(),
            Some("Potential XSS")
        );
        assert_eq!(
            issue_key("Violation: Duplicate code found").as_deref(),
            Some("Duplicate code")
        );
        assert_eq!(issue_key("no match here"), None);
    }

    #[test]
    fn extracts_statistic_keys() {
        assert_eq!(
            statistic_key("Violation at line 3: Magic number detected: 42"),
            "Magic number"
        );
        assert_eq!(statistic_key("no colon"), "");
        assert_eq!(statistic_key("Violation: Single"), "Single");
    }

    #[test]
    fn extracts_violation_lines() {
        assert_eq!(violation_line("Violation at line 12 near loop"), Some(12));
        assert_eq!(highlighted_line("Violation at line 12 near loop"), None);
        assert_eq!(highlighted_line("Violation at line 12: loop"), Some(12));
        assert_eq!(violation_line("Violation: none"), None);
    }
}
