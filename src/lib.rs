//! pkgbench: simulate installing a batch of packages serially or across a worker pool

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::engine::reporter::Reporter;
use crate::engine::tools::read_package_list;
use crate::pipeline::{ScheduleMode, report_skipped, run_install};
use crate::utils::config::{LayoutNames, WorkerThreadLimits};
use crate::utils::fd_limit::cap_workers;

/// Result alias used by public pkgbench API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Worker count for parallel mode: `opts.workers` or host parallelism, clamped and capped by the FD limit.
pub fn resolve_workers(opts: &Opts) -> usize {
    cap_workers(WorkerThreadLimits::current().resolve(opts.workers))
}

/// Single entry point: read the package list at `list_path` and install every package under
/// `out_root` according to `opts.mode`.
///
/// - **`Serial`** / **`Parallel`** → one run directly into `out_root`.
/// - **`Compare`** → serial into `out_root/serial`, then parallel into `out_root/parallel`.
///
/// Progress and warnings go to stderr. Set `cancel` to stop claiming new packages mid-run.
pub fn install_packages(
    list_path: &Path,
    out_root: &Path,
    opts: &Opts,
    cancel: Option<&AtomicBool>,
) -> Result<RunReport> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let packages = read_package_list(list_path)?;
    debug!("{} packages listed in {}", packages.len(), list_path.display());

    let parallel_mode = ScheduleMode::Concurrent {
        workers: resolve_workers(opts),
    };
    let run = |out: &Path, mode: ScheduleMode| -> Result<RunSummary> {
        let reporter = Reporter::stderr(packages.len(), opts.verbose);
        let summary = run_install(&packages, out, mode, opts, &reporter, cancel);
        reporter.finish();
        let summary = summary?;
        report_skipped(&summary, &reporter, opts.verbose);
        Ok(summary)
    };

    let report = match opts.mode {
        RunMode::Serial => RunReport::new(Some(run(out_root, ScheduleMode::Sequential)?), None),
        RunMode::Parallel => RunReport::new(None, Some(run(out_root, parallel_mode)?)),
        RunMode::Compare => {
            let serial = run(
                &out_root.join(LayoutNames::SERIAL_SUBDIR),
                ScheduleMode::Sequential,
            )?;
            let parallel = run(&out_root.join(LayoutNames::PARALLEL_SUBDIR), parallel_mode)?;
            RunReport::new(Some(serial), Some(parallel))
        }
    };
    Ok(report)
}
