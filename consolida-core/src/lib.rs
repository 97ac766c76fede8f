//! consolida-core: turn a source tree into one reviewable document
//!
//! This library powers `consolida`, a small tool that walks a project's
//! source directory, collects every file with a target extension, and merges
//! their contents into a single text file. Each section is preceded by a
//! separator header naming the file's path relative to the invocation root,
//! so the merged document can be split back into its parts.
//!
//! Two phases, run back to back:
//!
//! **Discovery**: [`discovery::PathDiscovery`] walks the root depth-first,
//! filters by extension (optionally skipping regex-excluded paths), and
//! returns an ordered list of [`discovery::SourceFileRef`]s. A missing root
//! surfaces as [`discovery::RootNotFound`] so callers can print a pointed
//! diagnostic.
//!
//! **Consolidation**: [`consolidate::write_bundle`] reads each entry in
//! order and appends `(separator, content)` pairs to any writer, reporting
//! progress per file and returning a [`consolidate::BundleReport`] once the
//! output is flushed. A failed read halts the run and leaves only the
//! already-written prefix behind.
//!
//! ```rust,no_run
//! use consolida_core::consolidate::bundle_to_path;
//! use consolida_core::discovery::{PathDiscovery, SourceDiscovery};
//! use std::path::Path;
//!
//! let entries = PathDiscovery::new("lib", "dart").discover()?;
//! if !entries.is_empty() {
//!     let report = bundle_to_path(
//!         &entries,
//!         Path::new(""),
//!         Path::new("codigo_flutter.txt"),
//!         |done, total| eprintln!("{done}/{total}"),
//!     )?;
//!     println!("wrote {} files", report.files);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The [`output`] module renders discovery results as plain JSON or NDJSON
//! for dry-run listings.

pub mod consolidate;
pub mod discovery;
pub mod output;
