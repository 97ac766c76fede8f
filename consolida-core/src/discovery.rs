//! Source-file discovery helpers for consolida-core

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Path to a discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileRef {
    pub path: PathBuf,
}

/// The configured source root does not exist.
///
/// Carried inside `anyhow::Error` so callers can `downcast_ref` and report
/// the missing path with a dedicated diagnostic.
#[derive(Debug)]
pub struct RootNotFound(pub PathBuf);

impl fmt::Display for RootNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source directory does not exist: {}", self.0.display())
    }
}

impl std::error::Error for RootNotFound {}

/// Trait for enumerating source files from some backing store (filesystem,
/// manifest, etc.).
pub trait SourceDiscovery {
    fn discover(&self) -> Result<Vec<SourceFileRef>>;
}

/// Recursive filesystem walker that collects files with a target extension.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    root: PathBuf,
    extension: String,
    follow_symlinks: bool,
    sorted: bool,
    excludes: Vec<Regex>,
}

impl PathDiscovery {
    /// `extension` may be given with or without a leading dot; matching is
    /// ASCII case-insensitive.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            follow_symlinks: false,
            sorted: false,
            excludes: Vec::new(),
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sort entries by file name at every level instead of taking the
    /// directory-listing order as-is.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Skip files whose root-relative path matches any of `patterns`.
    pub fn exclude(mut self, patterns: Vec<Regex>) -> Self {
        self.excludes = patterns;
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let haystack = relative.to_string_lossy();
        self.excludes.iter().any(|re| re.is_match(&haystack))
    }
}

impl SourceDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<SourceFileRef>> {
        if !self.root.exists() {
            return Err(Error::new(RootNotFound(self.root.clone())));
        }

        let mut walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file()
                && has_extension(entry.path(), &self.extension)
                && !self.is_excluded(entry.path())
            {
                found.push(SourceFileRef {
                    path: entry.path().to_path_buf(),
                });
            }
        }

        Ok(found)
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case(wanted),
        None => false,
    }
}
