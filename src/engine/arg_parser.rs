use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::RunMode;
use crate::utils::config::GenerateConsts;

/// Simulated package installer: serial vs parallel install throughput.
#[derive(Clone, Parser)]
#[command(name = "pkgbench")]
#[command(about = "Install every package in PACKAGE_LIST into OUTPUT_DIR and report elapsed time.")]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text file listing one package directory per line (blank lines ignored).
    #[arg(value_name = "PACKAGE_LIST", required = true)]
    pub package_list: Option<PathBuf>,

    /// Output root: one subdirectory per installed package plus the install ledger.
    #[arg(value_name = "OUTPUT_DIR", required = true)]
    pub output_dir: Option<PathBuf>,

    /// Scheduling mode. Default: parallel.
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<RunMode>,

    /// Worker threads for parallel mode. Default: available parallelism.
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Append the worker id to each ledger line.
    #[arg(long, short = 't', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub tag_worker: Option<bool>,

    /// Append to an existing ledger instead of starting a fresh one.
    #[arg(long, short = 'k', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub keep_ledger: Option<bool>,

    /// Print the run summary as JSON.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Verbose output: per-package lines and a progress bar.
    #[arg(long, short = 'v', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Create a synthetic package tree and its package list.
    Generate {
        /// Directory to create `pkgs/` and `packages.txt` in.
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Number of packages.
        #[arg(long, short = 'p', default_value_t = GenerateConsts::DEFAULT_PACKAGES)]
        packages: usize,

        /// Payload files per package.
        #[arg(long, short = 'f', default_value_t = GenerateConsts::DEFAULT_FILES_PER_PACKAGE)]
        files: usize,
    },
}
