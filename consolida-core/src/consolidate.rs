//! Consolidation: merge discovered files into one output document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::discovery::SourceFileRef;

/// Header inserted before each file's content, naming its path relative to
/// the invocation root. The literal is part of the output format.
pub fn separator(relative: &Path) -> String {
    format!(
        "\n\n// ---- Início do Arquivo: {} ----\n\n",
        relative.display()
    )
}

/// What a completed bundle run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleReport {
    pub files: usize,
    pub bytes: u64,
}

/// Write every entry, in order, as (separator, content) pairs.
///
/// `on_file(done, total)` fires after each file is appended. A failed read
/// aborts the remaining entries, so the writer ends up holding only the
/// successfully processed prefix. The writer is flushed before returning.
pub fn write_bundle<W: Write>(
    entries: &[SourceFileRef],
    base: &Path,
    mut w: W,
    mut on_file: impl FnMut(usize, usize),
) -> Result<BundleReport> {
    let total = entries.len();
    let mut bytes: u64 = 0;

    for (index, entry) in entries.iter().enumerate() {
        let content = fs::read_to_string(&entry.path)
            .with_context(|| format!("reading {}", entry.path.display()))?;
        let relative = entry.path.strip_prefix(base).unwrap_or(&entry.path);
        let header = separator(relative);

        w.write_all(header.as_bytes())
            .with_context(|| format!("writing section for {}", entry.path.display()))?;
        w.write_all(content.as_bytes())
            .with_context(|| format!("writing section for {}", entry.path.display()))?;

        bytes += (header.len() + content.len()) as u64;
        on_file(index + 1, total);
    }

    w.flush().context("flushing output")?;
    Ok(BundleReport {
        files: total,
        bytes,
    })
}

/// Create (or truncate) `output` and write the bundle there.
pub fn bundle_to_path(
    entries: &[SourceFileRef],
    base: &Path,
    output: &Path,
    on_file: impl FnMut(usize, usize),
) -> Result<BundleReport> {
    let file =
        File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_bundle(entries, base, BufWriter::new(file), on_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn separator_names_relative_path() {
        let header = separator(Path::new("lib/main.dart"));
        assert_eq!(
            header,
            "\n\n// ---- Início do Arquivo: lib/main.dart ----\n\n"
        );
    }

    #[test]
    fn writes_sections_in_entry_order() {
        let tmp = tempdir().expect("tempdir");
        let lib = tmp.path().join("lib");
        fs::create_dir_all(&lib).expect("mkdir");
        let first = lib.join("a.dart");
        let second = lib.join("b.dart");
        fs::write(&first, "int a = 1;").expect("write a");
        fs::write(&second, "int b = 2;").expect("write b");

        let entries = vec![
            SourceFileRef { path: first },
            SourceFileRef { path: second },
        ];

        let mut buf = Vec::new();
        let report =
            write_bundle(&entries, tmp.path(), &mut buf, |_, _| {}).expect("bundle");

        let text = String::from_utf8(buf).expect("utf8");
        let a_pos = text.find("lib/a.dart").expect("a header");
        let b_pos = text.find("lib/b.dart").expect("b header");
        assert!(a_pos < b_pos, "sections must appear in entry order");
        assert!(text.contains("int a = 1;"));
        assert!(text.contains("int b = 2;"));
        assert_eq!(report.files, 2);
        assert_eq!(report.bytes, text.len() as u64);
    }

    #[test]
    fn empty_entries_produce_empty_document() {
        let mut buf = Vec::new();
        let report = write_bundle(&[], Path::new(""), &mut buf, |_, _| {}).expect("bundle");

        assert!(buf.is_empty());
        assert_eq!(report, BundleReport { files: 0, bytes: 0 });
    }

    #[test]
    fn progress_callback_counts_every_file() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("x.dart");
        fs::write(&file, "int x;").expect("write");

        let entries = vec![SourceFileRef { path: file }];
        let mut seen = Vec::new();
        write_bundle(&entries, tmp.path(), Vec::<u8>::new(), |done, total| {
            seen.push((done, total));
        })
        .expect("bundle");

        assert_eq!(seen, vec![(1, 1)]);
    }

    #[test]
    fn read_failure_keeps_the_written_prefix() {
        let tmp = tempdir().expect("tempdir");
        let good = tmp.path().join("good.dart");
        fs::write(&good, "int g;").expect("write");

        let entries = vec![
            SourceFileRef { path: good },
            SourceFileRef {
                path: tmp.path().join("missing.dart"),
            },
        ];

        let mut buf = Vec::new();
        let err = write_bundle(&entries, tmp.path(), &mut buf, |_, _| {})
            .expect_err("missing file should abort");

        assert!(err.to_string().contains("missing.dart"));
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("good.dart"), "prefix should survive");
        assert!(!text.contains("missing.dart"));
    }

    #[test]
    fn bundle_to_path_truncates_previous_output() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("a.dart");
        fs::write(&file, "int a;").expect("write");
        let output = tmp.path().join("out.txt");
        fs::write(&output, "stale content that should vanish").expect("seed output");

        let entries = vec![SourceFileRef { path: file }];
        bundle_to_path(&entries, tmp.path(), &output, |_, _| {}).expect("bundle");

        let text = fs::read_to_string(&output).expect("read output");
        assert!(!text.contains("stale content"));
        assert!(text.contains("a.dart"));
    }

    #[test]
    fn entry_outside_base_falls_back_to_full_path() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("a.dart");
        fs::write(&file, "int a;").expect("write");

        let entries = vec![SourceFileRef { path: file.clone() }];
        let mut buf = Vec::new();
        write_bundle(&entries, &PathBuf::from("/elsewhere"), &mut buf, |_, _| {})
            .expect("bundle");

        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains(&file.display().to_string()));
    }
}
