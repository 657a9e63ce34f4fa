//! Application configuration constants.
//! File layout names and worker tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Name of the optional settings file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Package layout ----

/// Names inside a source package and the output tree.
pub struct LayoutNames;

impl LayoutNames {
    /// Manifest that must be readable for a package to be installed.
    pub const MANIFEST: &'static str = "manifest.json";
    /// Subdirectory holding the package payload.
    pub const FILES_DIR: &'static str = "files";
    /// Extension appended to a payload file name for its checksum sidecar.
    pub const SIDECAR_EXT: &'static str = "meta";
    /// Shared ledger file at the output root.
    pub const LEDGER: &'static str = "install_db.txt";
    /// Output subdirectories used by compare mode.
    pub const SERIAL_SUBDIR: &'static str = "serial";
    pub const PARALLEL_SUBDIR: &'static str = "parallel";
}

// ---- Worker threads ----

/// Thread limits for the worker pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size in parallel mode.
    pub floor: usize,
    /// Hard ceiling for a user-requested worker count.
    pub max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;
    pub const MAX_THREADS: usize = 512;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Clamp a requested worker count (or the host default when `None`) into `[floor, max]`.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.all_threads)
            .clamp(self.floor, self.max)
    }
}

// ---- Test data generation ----

/// Defaults for the `generate` subcommand.
pub struct GenerateConsts;

impl GenerateConsts {
    pub const DEFAULT_PACKAGES: usize = 100;
    pub const DEFAULT_FILES_PER_PACKAGE: usize = 20;
    /// Payload size is `MIN_FILE_SIZE + rand(0..=FILE_SIZE_JITTER)` bytes.
    pub const MIN_FILE_SIZE: usize = 1024;
    pub const FILE_SIZE_JITTER: usize = 4096;
    pub const PACKAGES_DIR: &'static str = "pkgs";
    pub const LIST_FILENAME: &'static str = "packages.txt";
}
