//! consolida CLI

use std::fs;
use std::io::{self, ErrorKind, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use regex::Regex;

use consolida_core::consolidate::{bundle_to_path, BundleReport};
use consolida_core::discovery::{PathDiscovery, RootNotFound, SourceDiscovery};
use consolida_core::output::{listed, write_json_pretty, write_ndjson, ListedFile};

/// Directory scanned when no root is given.
pub const DEFAULT_ROOT: &str = "lib";
/// Extension collected when no `--ext` is given.
pub const DEFAULT_EXTENSION: &str = "dart";
/// Output document written when no `--output` is given.
pub const DEFAULT_OUTPUT: &str = "codigo_flutter.txt";

/// CLI entrypoint for consolida.
#[derive(Debug, Parser)]
#[command(
    name = "consolida",
    about = "Consolidate a source tree into a single text file"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge every matching file under the root into one output document
    Bundle(BundleArgs),
    /// List the files a bundle would include, without writing anything
    List(ListArgs),
    /// Delete a previously generated output document
    Clean(CleanArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Directory to scan
    #[arg(default_value = DEFAULT_ROOT, value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// File extension to collect (leading dot optional)
    #[arg(short = 'e', long = "ext", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Regex patterns for relative paths to skip
    #[arg(short = 'x', long = "exclude", value_hint = ValueHint::Other)]
    exclude: Vec<String>,

    /// Follow symlinks while walking the root
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Sort entries by file name for deterministic output
    #[arg(long = "sort", action = ArgAction::SetTrue)]
    sort: bool,
}

#[derive(Debug, Args)]
struct BundleArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Destination file (overwritten on every run)
    #[arg(
        short = 'o',
        long = "output",
        default_value = DEFAULT_OUTPUT,
        value_hint = ValueHint::FilePath
    )]
    output: PathBuf,

    /// Suppress the in-place progress counter
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct CleanArgs {
    /// Output document to remove
    #[arg(default_value = DEFAULT_OUTPUT, value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

/// How a bundle run ended: nothing to do, or a written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BundleOutcome {
    Empty,
    Written(BundleReport),
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Bundle(args) => run_bundle(args),
        Command::List(args) => run_list(args),
        Command::Clean(args) => run_clean(args),
    }
}

fn run_bundle(args: BundleArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let show_progress = !args.quiet && out.is_terminal();

    let outcome = match execute_bundle(&args, |done, total| {
        if show_progress {
            let _ = write!(out, "\rprocessing file {done} of {total}...");
            let _ = out.flush();
        }
    }) {
        Ok(outcome) => outcome,
        Err(err) => {
            return Err(match err.downcast_ref::<RootNotFound>() {
                Some(not_found) => anyhow!(
                    "{not_found}\nrun consolida from the project root, or pass the directory to scan"
                ),
                None => err,
            });
        }
    };

    match outcome {
        BundleOutcome::Empty => {
            writeln!(
                out,
                "no .{} files found under {}",
                args.scan.extension.trim_start_matches('.'),
                args.scan.root.display()
            )?;
        }
        BundleOutcome::Written(report) => {
            if show_progress {
                writeln!(out)?;
            }
            writeln!(
                out,
                "consolidated {} files ({} bytes) into {}",
                report.files,
                report.bytes,
                args.output.display()
            )?;
        }
    }

    Ok(())
}

/// Discover and, unless the scan came back empty, write the bundle.
fn execute_bundle(
    args: &BundleArgs,
    on_file: impl FnMut(usize, usize),
) -> Result<BundleOutcome> {
    let entries = build_discovery(&args.scan)?.discover()?;
    if entries.is_empty() {
        return Ok(BundleOutcome::Empty);
    }

    let base = invocation_base(&args.scan.root);
    let report = bundle_to_path(&entries, &base, &args.output, on_file)?;
    Ok(BundleOutcome::Written(report))
}

fn run_list(args: ListArgs) -> Result<()> {
    let entries = build_discovery(&args.scan)?.discover()?;
    let files = listed(&entries, &invocation_base(&args.scan.root));

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.ndjson {
        write_ndjson(&files, &mut handle)?;
    } else if args.json {
        write_json_pretty(&files, &mut handle)?;
    } else {
        write_plain(&files, &mut handle)?;
    }

    Ok(())
}

fn run_clean(args: CleanArgs) -> Result<()> {
    match fs::remove_file(&args.output) {
        Ok(()) => {
            println!("removed {}", args.output.display());
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            println!("nothing to clean at {}", args.output.display());
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("removing {}", args.output.display())),
    }
}

fn build_discovery(scan: &ScanArgs) -> Result<PathDiscovery> {
    let excludes = compile_patterns(&scan.exclude)?;
    Ok(PathDiscovery::new(&scan.root, &scan.extension)
        .follow_symlinks(scan.follow_symlinks)
        .sorted(scan.sort)
        .exclude(excludes))
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex: {p}")))
        .collect()
}

/// Base directory the separator headers are computed against. For the
/// default `lib` root this is the current directory, so headers read
/// `lib/<file>` exactly like the generated document always has.
fn invocation_base(root: &Path) -> PathBuf {
    root.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn write_plain(files: &[ListedFile], mut w: impl Write) -> Result<()> {
    for file in files {
        writeln!(w, "{}", file.relative.display())?;
    }
    Ok(())
}
