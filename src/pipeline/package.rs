//! The per-package install pipeline: manifest check, payload install, one ledger append.

use log::{debug, trace};

use crate::pipeline::context::PipelineContext;
use crate::pipeline::files::{install_file, list_payload_files};
use crate::{InstallRecord, PackageDirectory, PackageOutcome, SkipReason, WorkerId};

/// Run the install pipeline for one package on `worker`.
///
/// Every failure is contained here and reported through `ctx.reporter`:
/// - unreadable manifest: warning, [`PackageOutcome::Skipped`], nothing written
/// - no `files/` or no regular files in it: [`PackageOutcome::Empty`], nothing written
/// - a file that cannot be read or written: warning, remaining files continue
///
/// A ledger record is appended only when the package reaches the end of its file list.
/// Every call, whatever the outcome, advances the reporter's finished count once.
pub fn process_package(
    pkg: &PackageDirectory,
    ctx: &PipelineContext<'_>,
    worker: WorkerId,
) -> PackageOutcome {
    let outcome = install_package(pkg, ctx, worker);
    let finished = ctx.reporter.package_finished();
    if let PackageOutcome::Installed { files, .. } = &outcome {
        ctx.reporter.info(
            worker,
            &format!(
                "{} installed ({} files) [{}/{}, {:.0}%]",
                pkg.name,
                files,
                finished,
                ctx.reporter.total(),
                ctx.reporter.percent()
            ),
        );
    }
    outcome
}

/// Skip `pkg` because `owner`, listed earlier, has the same name and so owns its output directory.
pub fn skip_duplicate(
    pkg: &PackageDirectory,
    owner: &PackageDirectory,
    ctx: &PipelineContext<'_>,
    worker: WorkerId,
) -> PackageOutcome {
    ctx.reporter.warn(
        worker,
        &format!(
            "{}: skipping {}, name already taken by {}",
            pkg.name,
            pkg.path.display(),
            owner.path.display()
        ),
    );
    ctx.reporter.package_finished();
    PackageOutcome::Skipped(SkipReason::DuplicateName(owner.path.display().to_string()))
}

fn install_package(
    pkg: &PackageDirectory,
    ctx: &PipelineContext<'_>,
    worker: WorkerId,
) -> PackageOutcome {
    let manifest_path = pkg.manifest_path();
    // Content is opaque; reading it is part of the simulated work.
    match std::fs::read(&manifest_path) {
        Ok(manifest) => trace!("{}: manifest {} bytes", pkg.name, manifest.len()),
        Err(e) => {
            ctx.reporter.warn(
                worker,
                &format!("cannot open manifest: {} ({})", manifest_path.display(), e),
            );
            return PackageOutcome::Skipped(SkipReason::ManifestUnreadable(e.to_string()));
        }
    }

    let Some(listing) = list_payload_files(&pkg.files_dir()) else {
        debug!("{}: no files directory, nothing to install", pkg.name);
        return PackageOutcome::Empty;
    };
    for (path, msg) in &listing.unreadable {
        let shown = path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| pkg.files_dir().display().to_string());
        ctx.reporter
            .warn(worker, &format!("{}: skipping {}: {}", pkg.name, shown, msg));
    }
    if listing.files.is_empty() {
        debug!("{}: files directory is empty, nothing to install", pkg.name);
        return PackageOutcome::Empty;
    }

    let out_dir = pkg.output_dir(ctx.out_root);
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        ctx.reporter.warn(
            worker,
            &format!("{}: cannot create {}: {}", pkg.name, out_dir.display(), e),
        );
        return PackageOutcome::Skipped(SkipReason::OutputUnwritable(e.to_string()));
    }

    let mut installed = 0_usize;
    let mut failed = listing.unreadable.len();
    for file in &listing.files {
        // Checked between files so an interrupted run never leaves a half-written copy.
        if ctx.cancel_requested() {
            ctx.reporter
                .info(worker, &format!("{}: cancelled after {} files", pkg.name, installed));
            return PackageOutcome::Cancelled;
        }
        match install_file(file, &out_dir) {
            Ok(sum) => {
                trace!("{}: {} checksum {}", pkg.name, file.display(), sum);
                installed += 1;
            }
            Err(e) => {
                ctx.reporter
                    .warn(worker, &format!("{}: skipping file: {:#}", pkg.name, e));
                failed += 1;
            }
        }
    }

    let record = InstallRecord {
        package: pkg.name.clone(),
        worker: ctx.tag_worker.then_some(worker),
    };
    if let Err(e) = ctx.ledger.append(&record) {
        ctx.reporter.warn(worker, &format!("{}: {:#}", pkg.name, e));
        return PackageOutcome::Skipped(SkipReason::LedgerAppend(e.to_string()));
    }

    ctx.reporter.complete();
    PackageOutcome::Installed {
        files: installed,
        failed_files: failed,
    }
}
