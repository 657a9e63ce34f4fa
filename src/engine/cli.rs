//! CLI command handler: install by default; `generate` builds a synthetic package tree.

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::{Cli, Commands};
use crate::engine::generate::generate_test_data;
use crate::utils::{Colors, apply_file_to_opts, load_pkgbench_toml, setup_logging};
use crate::{Opts, RunReport, RunSummary, install_packages};

/// Build opts: defaults, then `.pkgbench.toml` in the working directory, then CLI flags.
/// A bad settings file is reported once the logger is installed and otherwise ignored.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    let file = load_pkgbench_toml(Path::new("."));
    if let Ok(Some(file)) = &file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(mode) = cli.mode {
        opts.mode = mode;
    }
    if cli.workers.is_some() {
        opts.workers = cli.workers;
    }
    opts.tag_worker = cli.tag_worker.unwrap_or(opts.tag_worker);
    opts.keep_ledger = cli.keep_ledger.unwrap_or(opts.keep_ledger);
    opts.json = cli.json.unwrap_or(opts.json);
    opts.verbose = cli.verbose.unwrap_or(opts.verbose);
    setup_logging(opts.verbose);
    if let Err(e) = file {
        warn!("Ignoring settings file: {:#}", e);
    }
    opts
}

fn print_summary(summary: &RunSummary) {
    println!("{}", summary.headline());
    println!(
        "  {} | {} | {}",
        Colors::colorize(Colors::INSTALLED, &format!("Installed: {}", summary.installed)),
        Colors::colorize(Colors::SKIPPED, &format!("Skipped: {}", summary.skipped)),
        Colors::colorize(Colors::EMPTY, &format!("Empty: {}", summary.empty)),
    );
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("serialize run report")?
        );
        return Ok(());
    }
    for summary in report.summaries() {
        print_summary(summary);
    }
    if let Some(speedup) = report.speedup {
        println!("Speedup: {}", format!("{speedup:.2}x").bold());
    }
    Ok(())
}

/// Run install (default) or `generate`.
pub fn handle_run(cli: &Cli) -> Result<()> {
    if let Some(Commands::Generate {
        dir,
        packages,
        files,
    }) = &cli.command
    {
        setup_logging(false);
        let list = generate_test_data(dir, *packages, *files)?;
        println!(
            "Generated {} packages x {} files; list at {}",
            packages,
            files,
            list.display()
        );
        return Ok(());
    }

    let (Some(list), Some(out)) = (&cli.package_list, &cli.output_dir) else {
        anyhow::bail!("usage: pkgbench <PACKAGE_LIST> <OUTPUT_DIR>");
    };
    let opts = setup_opts(cli);

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    debug!("Installing packages from {}", list.display());
    let report = install_packages(list, out, &opts, Some(&cancel_requested))?;
    print_report(&report, opts.json)?;

    if cancel_requested.load(Ordering::Relaxed) {
        warn!("Install cancelled by user; in-flight packages finished their current file");
    }
    Ok(())
}
