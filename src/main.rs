//! pkgbench CLI: install a package list serially or in parallel and report elapsed time.

use anyhow::Result;
use clap::Parser;
use pkgbench::engine::arg_parser::Cli;
use pkgbench::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
