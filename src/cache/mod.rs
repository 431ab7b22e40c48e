//! Filesystem cache for downloaded documents
//!
//! Every document lives at `root/<sanitized repository>/<sanitized path>`, where
//! sanitizing replaces path separators with `_`. The location is a pure function
//! of `(repository, path)`, so re-running the pipeline reuses earlier downloads.
//! A present, non-empty file is treated as permanently valid.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Character substituted for path separators
pub const FILLER: char = '_';

/// Document bytes plus their storage coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    /// Owning repository (`owner/name`)
    pub repository: String,

    /// Original path within the repository
    pub path: String,

    /// Document content
    pub content: Vec<u8>,
}

impl DownloadedDocument {
    /// Writes the document into the cache rooted at `root`
    pub fn store(&self, root: &Path) -> io::Result<PathBuf> {
        store(&self.content, &self.repository, &self.path, root)
    }
}

/// Replaces every `/` and `\` in `component` with the filler character
pub fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| if c == '/' || c == '\\' { FILLER } else { c })
        .collect()
}

/// Derives the cache location for a document
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use tm_survey::cache::cache_path;
///
/// let path = cache_path(Path::new("downloads"), "acme/widgets", "docs/threat_model.md");
/// assert_eq!(path, Path::new("downloads/acme_widgets/docs_threat_model.md"));
/// ```
pub fn cache_path(root: &Path, repository: &str, path: &str) -> PathBuf {
    root.join(sanitize(repository)).join(sanitize(path))
}

/// Returns true iff a non-empty file exists at the derived location
pub fn is_cached(repository: &str, path: &str, root: &Path) -> bool {
    fs::metadata(cache_path(root, repository, path))
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Writes `bytes` to the derived location, creating the repository directory
///
/// Existing files are overwritten unconditionally.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The path written
/// * `Err(io::Error)` - Failed to create the directory or write the file
pub fn store(bytes: &[u8], repository: &str, path: &str, root: &Path) -> io::Result<PathBuf> {
    let target = cache_path(root, repository, path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, bytes)?;
    Ok(target)
}
