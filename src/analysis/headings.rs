//! Heading extraction and text normalization
//!
//! A heading is a line that, once trimmed, starts with a run of `#` characters
//! followed by whitespace and non-empty text. Setext underlines, multi-line
//! headings and closing `#` runs are not recognized.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#+)\s+(.+)$").expect("heading regex is valid") // Static pattern, safe to panic
});

/// One heading extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    /// Number of leading `#` characters
    pub level: usize,

    /// Heading text as written
    pub text: String,

    /// Aggregation key derived from `text`
    pub normalized: String,

    /// Document the heading came from
    pub source: String,

    /// 1-based line number
    pub line: usize,
}

/// Parses one line into `(level, text)` if it is a heading
pub fn parse_heading(line: &str) -> Option<(usize, String)> {
    let captures = HEADING_PATTERN.captures(line.trim())?;
    let level = captures.get(1)?.as_str().len();
    let text = captures.get(2)?.as_str().trim();
    if text.is_empty() {
        return None;
    }
    Some((level, text.to_string()))
}

/// Extracts every heading from `content`
pub fn extract_headings(content: &str, source: &str) -> Vec<HeadingRecord> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            parse_heading(line).map(|(level, text)| HeadingRecord {
                level,
                normalized: normalize_text(&text),
                text,
                source: source.to_string(),
                line: index + 1,
            })
        })
        .collect()
}

/// Lower-cases, drops everything but letters, digits and whitespace, and
/// collapses whitespace runs to single spaces
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
