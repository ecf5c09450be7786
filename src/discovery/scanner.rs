//! File system scanner for discovering input images.
//!
//! Lists a directory (optionally recursively) and keeps files whose
//! extension is in the configured set.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{SpriteError, Result};

use super::manifest::Manifest;

/// Extensions accepted when no others are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "tga"];

/// Order of discovered files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Whatever order the file system lists entries in.
    #[default]
    Listing,
    /// Sorted by file name.
    Name,
}

/// Immutable discovery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    extensions: Vec<String>,
    excludes: Vec<String>,
    recursive: bool,
    sort: SortOrder,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl DiscoveryConfig {
    /// Create a config accepting the given extensions.
    ///
    /// Extensions are matched case-insensitively; a leading dot is ignored.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            excludes: vec![],
            recursive: false,
            sort: SortOrder::default(),
        }
    }

    /// Build a config from manifest settings.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self::new(&manifest.extensions)
            .with_excludes(manifest.excludes.clone())
            .with_recursive(manifest.recursive)
            .with_sort(manifest.sort)
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check whether a path has one of the accepted extensions.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.contains(&e))
    }

    /// Check if a path matches any exclude pattern.
    ///
    /// Patterns without a `/` are matched against the file name; patterns
    /// with one are matched against the whole path. `*` matches any run of
    /// characters.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let full = path.to_string_lossy().replace('\\', "/");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.excludes.iter().any(|pattern| {
            if pattern.contains('/') {
                wildcard_match(pattern, &full)
            } else {
                wildcard_match(pattern, &name)
            }
        })
    }
}

/// Result of scanning an input path.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Accepted image files, in processing order.
    pub files: Vec<PathBuf>,
    /// Files that were looked at but rejected (wrong extension or excluded).
    pub ignored: Vec<PathBuf>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Scan a file or directory for input images.
///
/// A single file is accepted or ignored on its own. A directory is listed
/// (recursively if configured) and its matching files kept in listing or
/// name order.
///
/// # Errors
///
/// Returns an `Io` error when `input` is neither a file nor a directory.
pub fn scan(input: &Path, config: &DiscoveryConfig) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    if input.is_file() {
        if config.is_supported(input) {
            result.files.push(input.to_path_buf());
        } else {
            result.ignored.push(input.to_path_buf());
        }
        return Ok(result);
    }

    if !input.is_dir() {
        return Err(SpriteError::Io {
            path: input.to_path_buf(),
            message: "Input is neither a file nor a directory".to_string(),
        });
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut walker = WalkDir::new(input)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true);

    if config.sort == SortOrder::Name {
        walker = walker.sort_by(|a, b| a.file_name().cmp(b.file_name()));
    }

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if config.is_supported(&path) && !config.is_excluded(&path) {
            result.files.push(path);
        } else {
            result.ignored.push(path);
        }
    }

    Ok(result)
}

/// Match `text` against a pattern where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` and the text index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
