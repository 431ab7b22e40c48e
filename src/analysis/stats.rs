//! Aggregate statistics for one analyzer run
//!
//! All counters live in an `AggregateStatistics` value owned by the caller and
//! folded over the directory walk. Counts only ever increase.

use crate::analysis::filenames::{
    base_filename, cluster_filename, filename_words, match_patterns, FILENAME_PATTERNS,
};
use crate::analysis::headings::HeadingRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Count of one normalized heading plus a representative raw text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingTally {
    pub count: u64,
    /// First raw text seen for this normalized key
    pub example: String,
}

/// Accumulators for headings and filenames
#[derive(Debug, Clone)]
pub struct AggregateStatistics {
    /// Every analyzed file, whether or not it had headings
    pub total_files_found: usize,

    /// Files that yielded at least one heading
    pub files_processed: usize,

    /// Files that could not be read
    pub read_errors: usize,

    /// Headings across all files
    pub total_headings: usize,

    /// Normalized heading -> tally
    pub heading_counts: HashMap<String, HeadingTally>,

    /// Level -> normalized heading -> count
    pub level_counts: BTreeMap<usize, HashMap<String, u64>>,

    /// Keyword -> number of files whose base name contains it
    pub filename_patterns: BTreeMap<String, u64>,

    /// Cluster label -> count
    pub filename_clusters: HashMap<String, u64>,

    /// Filename token -> count
    pub filename_words: HashMap<String, u64>,

    /// File names in walk order
    pub filenames: Vec<String>,

    /// File identifier -> its headings
    pub file_headings: BTreeMap<String, Vec<HeadingRecord>>,
}

impl Default for AggregateStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStatistics {
    /// Creates empty accumulators with every filename keyword at zero
    pub fn new() -> Self {
        Self {
            total_files_found: 0,
            files_processed: 0,
            read_errors: 0,
            total_headings: 0,
            heading_counts: HashMap::new(),
            level_counts: BTreeMap::new(),
            filename_patterns: FILENAME_PATTERNS
                .iter()
                .map(|p| (p.to_string(), 0))
                .collect(),
            filename_clusters: HashMap::new(),
            filename_words: HashMap::new(),
            filenames: Vec::new(),
            file_headings: BTreeMap::new(),
        }
    }

    /// Records the filename features of one analyzed file
    pub fn record_file(&mut self, path: &Path) {
        self.total_files_found += 1;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.filenames.push(file_name);

        let base = base_filename(path);
        for pattern in match_patterns(&base) {
            *self.filename_patterns.entry(pattern.to_string()).or_insert(0) += 1;
        }

        *self
            .filename_clusters
            .entry(cluster_filename(&base))
            .or_insert(0) += 1;

        for word in filename_words(&base) {
            *self.filename_words.entry(word).or_insert(0) += 1;
        }
    }

    /// Records the headings extracted from one file
    ///
    /// A file without headings leaves every heading counter untouched.
    pub fn record_headings(&mut self, file_id: &str, headings: Vec<HeadingRecord>) {
        if headings.is_empty() {
            return;
        }

        self.files_processed += 1;
        self.total_headings += headings.len();

        for heading in &headings {
            let tally = self
                .heading_counts
                .entry(heading.normalized.clone())
                .or_insert_with(|| HeadingTally {
                    count: 0,
                    example: heading.text.clone(),
                });
            tally.count += 1;

            *self
                .level_counts
                .entry(heading.level)
                .or_default()
                .entry(heading.normalized.clone())
                .or_insert(0) += 1;
        }

        self.file_headings.insert(file_id.to_string(), headings);
    }

    /// Counts a file that could not be read
    pub fn record_read_error(&mut self) {
        self.read_errors += 1;
    }

    /// Number of distinct normalized headings
    pub fn unique_headings(&self) -> usize {
        self.heading_counts.len()
    }

    /// Most frequent normalized headings
    pub fn top_headings(&self, limit: usize) -> Vec<(&str, &HeadingTally)> {
        let mut ranked: Vec<(&str, &HeadingTally)> = self
            .heading_counts
            .iter()
            .map(|(key, tally)| (key.as_str(), tally))
            .collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Most frequent normalized headings at one level
    pub fn top_for_level(&self, level: usize, limit: usize) -> Vec<(&str, u64)> {
        self.level_counts
            .get(&level)
            .map(|counts| top_counts(counts, limit))
            .unwrap_or_default()
    }

    /// Total headings recorded at one level
    pub fn level_total(&self, level: usize) -> u64 {
        self.level_counts
            .get(&level)
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }

    /// Most frequent filename cluster labels
    pub fn top_clusters(&self, limit: usize) -> Vec<(&str, u64)> {
        top_counts(&self.filename_clusters, limit)
    }

    /// Most frequent filename tokens
    pub fn top_words(&self, limit: usize) -> Vec<(&str, u64)> {
        top_counts(&self.filename_words, limit)
    }

    /// Most frequent normalized headings containing `keyword`
    pub fn keyword_matches(&self, keyword: &str, limit: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .heading_counts
            .iter()
            .filter(|(key, _)| key.contains(keyword))
            .map(|(key, tally)| (key.as_str(), tally.count))
            .collect();
        sort_ranked(&mut ranked);
        ranked.truncate(limit);
        ranked
    }
}

/// Ranks a count map, most frequent first, ties by key
fn top_counts(counts: &HashMap<String, u64>, limit: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sort_ranked(&mut ranked);
    ranked.truncate(limit);
    ranked
}

fn sort_ranked(ranked: &mut [(&str, u64)]) {
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
}
