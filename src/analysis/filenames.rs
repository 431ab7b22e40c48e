//! Filename pattern analysis
//!
//! Three independent views of a document's base filename (lower-cased, final
//! `.md` removed):
//! - keyword membership, by substring containment
//! - a best-effort cluster label
//! - word tokens

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Keywords counted by substring containment
///
/// A compound keyword such as `threat_model` also matches its `-`, `.`, space
/// separated and unseparated spellings.
pub const FILENAME_PATTERNS: &[&str] = &[
    "threat_model",
    "threat_modeling",
    "security",
    "stride",
    "threat",
    "model",
    "risk",
    "attack",
    "vulnerability",
    "asset",
    "readme",
    "doc",
    "index",
];

/// Separators a compound keyword may be spelled with
const KEYWORD_SEPARATORS: &[&str] = &["_", "-", ".", " ", ""];

static MEANINGFUL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(threat|model|security|risk|attack|stride|readme)")
        .expect("token regex is valid") // Static pattern, safe to panic
});

static EXTENDED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(threat|model|security|risk|attack|stride|readme|doc)")
        .expect("token regex is valid") // Static pattern, safe to panic
});

static WORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-_\s.]+").expect("separator regex is valid") // Static pattern, safe to panic
});

/// Returns the lower-cased file name without directories and without a final `.md`
pub fn base_filename(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match name.strip_suffix(".md") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Returns every keyword contained in `base`, in `FILENAME_PATTERNS` order
pub fn match_patterns(base: &str) -> Vec<&'static str> {
    FILENAME_PATTERNS
        .iter()
        .copied()
        .filter(|pattern| contains_keyword(base, pattern))
        .collect()
}

fn contains_keyword(base: &str, keyword: &str) -> bool {
    if !keyword.contains('_') {
        return base.contains(keyword);
    }
    KEYWORD_SEPARATORS
        .iter()
        .any(|sep| base.contains(&keyword.replace('_', sep)))
}

/// Groups a base filename under a short label
///
/// This is a heuristic, not a bijection: unrelated names can share a label and
/// token order changes the result.
///
/// - A single `_`-separated part is its own label.
/// - If the last part starts with a meaningful token, the label is the last
///   part, prefixed by the second-to-last part when that one starts with a
///   meaningful token or `doc`.
/// - Otherwise the label joins every part that starts with a meaningful token,
///   or falls back to the whole name when none does.
pub fn cluster_filename(base: &str) -> String {
    let parts: Vec<&str> = base.split('_').collect();
    if parts.len() <= 1 {
        return base.to_string();
    }

    let last = parts[parts.len() - 1];
    if MEANINGFUL_TOKEN.is_match(last) {
        let previous = parts[parts.len() - 2];
        if EXTENDED_TOKEN.is_match(previous) {
            return format!("{}_{}", previous, last);
        }
        return last.to_string();
    }

    let meaningful: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|part| MEANINGFUL_TOKEN.is_match(part))
        .collect();
    if meaningful.is_empty() {
        base.to_string()
    } else {
        meaningful.join("_")
    }
}

/// Splits a base filename on runs of `-`, `_`, `.` and whitespace
pub fn filename_words(base: &str) -> Vec<String> {
    WORD_SEPARATOR
        .split(base)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
