use anyhow::Result;
use log::debug;
use std::path::Path;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use crate::engine::ledger::Ledger;
use crate::engine::reporter::Reporter;
use crate::engine::tools::{duplicate_names, ensure_output_root, ledger_path};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::package::{process_package, skip_duplicate};
use crate::pipeline::scheduler::{ScheduleMode, schedule};
use crate::{Opts, PackageDirectory, PackageOutcome, RunSummary};

/// Install `packages` into `out_root` with the given scheduling mode.
///
/// Creates `out_root`, opens the ledger (fresh unless `opts.keep_ledger`), times the scheduler from
/// first dispatch to last completion and folds every package outcome into a [`RunSummary`].
/// A package whose name repeats an earlier entry's is skipped so each output directory has one owner.
/// Only setup failures are errors; per-package problems end up in the summary counts.
pub fn run_install(
    packages: &[PackageDirectory],
    out_root: &Path,
    mode: ScheduleMode,
    opts: &Opts,
    reporter: &Reporter,
    cancel: Option<&AtomicBool>,
) -> Result<RunSummary> {
    ensure_output_root(out_root)?;
    let ledger = Ledger::open(&ledger_path(out_root), !opts.keep_ledger)?;
    let ctx = PipelineContext {
        out_root,
        ledger: &ledger,
        reporter,
        tag_worker: opts.tag_worker,
        cancel,
    };

    // One slot per package; the scheduler hands each index to exactly one worker.
    let outcomes: Vec<OnceLock<PackageOutcome>> =
        packages.iter().map(|_| OnceLock::new()).collect();
    let owners = duplicate_names(packages);

    let start = Instant::now();
    let stats = schedule(packages.len(), mode, cancel, |worker, index| {
        let outcome = match owners[index] {
            Some(first) => skip_duplicate(&packages[index], &packages[first], &ctx, worker),
            None => process_package(&packages[index], &ctx, worker),
        };
        let _ = outcomes[index].set(outcome);
    })?;
    let elapsed = start.elapsed();
    debug!(
        "{} jobs run, per worker: {:?}",
        stats.dispatched(),
        stats.per_worker
    );

    let mut summary = RunSummary {
        listed: packages.len(),
        elapsed_secs: elapsed.as_secs_f64(),
        workers: stats.workers(),
        parallel: matches!(mode, ScheduleMode::Concurrent { .. }),
        ..Default::default()
    };
    for outcome in outcomes.iter().filter_map(OnceLock::get) {
        summary.record(outcome);
    }
    // Packages never claimed because of a cancel request.
    summary.cancelled += packages.len() - stats.dispatched();
    Ok(summary)
}
