//! Listing output helpers for consolida-core

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::discovery::SourceFileRef;

/// A discovered file paired with its invocation-root-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Pair each entry with its path relative to `base`; entries outside `base`
/// keep their full path.
pub fn listed(entries: &[SourceFileRef], base: &Path) -> Vec<ListedFile> {
    entries
        .iter()
        .map(|entry| ListedFile {
            path: entry.path.clone(),
            relative: entry
                .path
                .strip_prefix(base)
                .unwrap_or(&entry.path)
                .to_path_buf(),
        })
        .collect()
}

/// Write the listing as a prettified JSON array.
pub fn write_json_pretty(entries: &[ListedFile], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write the listing as newline-delimited JSON (NDJSON).
pub fn write_ndjson(entries: &[ListedFile], mut w: impl Write) -> Result<()> {
    for entry in entries {
        let line = serde_json::to_string(entry)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}
