//! Public and internal types for the pkgbench API and pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::utils::config::LayoutNames;

/// A source package: a directory holding `manifest.json` and a `files/` subdirectory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDirectory {
    /// Base name of the directory; names the output subdirectory and the ledger line.
    pub name: String,
    pub path: PathBuf,
}

impl PackageDirectory {
    /// Build from a listed path. The name is the last normal component of the absolute,
    /// lexically normalized path (`.` dropped, `..` applied), lossily converted.
    /// Returns `None` when no such component exists (`/`, `a/..` from the root, an empty path).
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = package_name(&path)?;
        Some(Self { name, path })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(LayoutNames::MANIFEST)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.path.join(LayoutNames::FILES_DIR)
    }

    /// Output directory for this package under `out_root`.
    pub fn output_dir(&self, out_root: &Path) -> PathBuf {
        out_root.join(&self.name)
    }
}

fn package_name(path: &Path) -> Option<String> {
    let absolute = std::path::absolute(path).ok()?;
    let mut normal = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(part) => normal.push(part),
            Component::ParentDir => {
                normal.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    normal.last().map(|n| n.to_string_lossy().into_owned())
}

/// Index of a worker in the pool. Sequential runs use worker 0.
pub type WorkerId = usize;

/// One ledger line: `<package> installed`, optionally tagged with the worker that did it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstallRecord {
    pub package: String,
    pub worker: Option<WorkerId>,
}

impl InstallRecord {
    pub const MARKER: &'static str = "installed";

    /// Render as a full ledger line, trailing newline included.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    /// Parse a ledger line (without the newline). Returns `None` for lines that are not records.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(package) = line.strip_suffix(" installed") {
            return Some(Self {
                package: package.to_string(),
                worker: None,
            });
        }
        let (package, tag) = line.rsplit_once(" installed (worker ")?;
        let worker = tag.strip_suffix(')')?.parse().ok()?;
        Some(Self {
            package: package.to_string(),
            worker: Some(worker),
        })
    }
}

impl fmt::Display for InstallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.worker {
            Some(w) => write!(f, "{} {} (worker {})", self.package, Self::MARKER, w),
            None => write!(f, "{} {}", self.package, Self::MARKER),
        }
    }
}

/// Why a package was excluded from the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// `manifest.json` missing or unreadable.
    ManifestUnreadable(String),
    /// Output directory could not be created.
    OutputUnwritable(String),
    /// Files were written but the ledger append failed.
    LedgerAppend(String),
    /// An earlier list entry already owns this package name; holds that entry's path.
    DuplicateName(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ManifestUnreadable(e) => write!(f, "cannot open manifest: {e}"),
            SkipReason::OutputUnwritable(e) => write!(f, "cannot create output directory: {e}"),
            SkipReason::LedgerAppend(e) => write!(f, "cannot append to ledger: {e}"),
            SkipReason::DuplicateName(first) => write!(f, "name already installed from {first}"),
        }
    }
}

/// Result of running the install pipeline over one package. Never an error: failures are contained here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackageOutcome {
    /// All files attempted and one ledger record appended. `failed_files` were skipped with a warning.
    Installed { files: usize, failed_files: usize },
    Skipped(SkipReason),
    /// No `files/` directory or no regular files in it. Nothing written.
    Empty,
    /// Stopped between files after a cancel request. No ledger record.
    Cancelled,
}

/// How packages are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One package at a time in list order.
    Serial,
    /// Worker pool with dynamic claiming.
    #[default]
    Parallel,
    /// Serial then parallel over the same list, into separate subdirectories.
    Compare,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Serial => "serial",
            RunMode::Parallel => "parallel",
            RunMode::Compare => "compare",
        };
        f.write_str(s)
    }
}

/// Aggregate result of one run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    /// Packages in the list (dispatched or not).
    pub listed: usize,
    pub installed: usize,
    pub skipped: usize,
    pub empty: usize,
    pub cancelled: usize,
    pub files_installed: usize,
    pub files_failed: usize,
    pub elapsed_secs: f64,
    /// Worker count actually used (1 for serial).
    pub workers: usize,
    pub parallel: bool,
}

impl RunSummary {
    /// Fold one package outcome into the counts.
    pub fn record(&mut self, outcome: &PackageOutcome) {
        match outcome {
            PackageOutcome::Installed {
                files,
                failed_files,
            } => {
                self.installed += 1;
                self.files_installed += files;
                self.files_failed += failed_files;
            }
            PackageOutcome::Skipped(_) => self.skipped += 1,
            PackageOutcome::Empty => self.empty += 1,
            PackageOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Headline line printed to stdout.
    pub fn headline(&self) -> String {
        if self.parallel {
            format!(
                "Processed {} packages in {:.6} seconds (parallel, threads={})",
                self.listed, self.elapsed_secs, self.workers
            )
        } else {
            format!(
                "Processed {} packages in {:.6} seconds (serial)",
                self.listed, self.elapsed_secs
            )
        }
    }
}

/// Full options (CLI and lib).
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Worker count for parallel mode. When None, host parallelism capped by the FD limit.
    pub workers: Option<usize>,
    pub mode: RunMode,
    /// Append `(worker N)` to each ledger line.
    pub tag_worker: bool,
    /// Append to an existing ledger instead of truncating it at run start.
    pub keep_ledger: bool,
    /// Per-package info lines and progress bar.
    pub verbose: bool,
    /// Print the summary as JSON.
    pub json: bool,
}

/// Result of one CLI invocation: one summary per mode that ran.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<RunSummary>,
    /// Serial elapsed / parallel elapsed, when both ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedup: Option<f64>,
}

impl RunReport {
    pub fn new(serial: Option<RunSummary>, parallel: Option<RunSummary>) -> Self {
        let speedup = match (&serial, &parallel) {
            (Some(s), Some(p)) if p.elapsed_secs > 0.0 => Some(s.elapsed_secs / p.elapsed_secs),
            _ => None,
        };
        Self {
            serial,
            parallel,
            speedup,
        }
    }

    pub fn summaries(&self) -> impl Iterator<Item = &RunSummary> {
        self.serial.iter().chain(self.parallel.iter())
    }
}
