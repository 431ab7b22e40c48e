use crate::search::SearchResultRecord;
use std::collections::HashSet;

/// Removes records sharing a `(repository, path)` key, keeping the first occurrence
///
/// # Returns
///
/// The surviving records in their original order, and the number removed
pub fn deduplicate(records: Vec<SearchResultRecord>) -> (Vec<SearchResultRecord>, usize) {
    let total = records.len();
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(total);

    let unique: Vec<SearchResultRecord> = records
        .into_iter()
        .filter(|r| seen.insert((r.repository.clone(), r.path.clone())))
        .collect();

    let removed = total - unique.len();
    (unique, removed)
}
