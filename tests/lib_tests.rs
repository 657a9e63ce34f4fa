use clap::Parser;
use pkgbench::engine::{Cli, Commands, generate_test_data};
use pkgbench::utils::config::{LayoutNames, WorkerThreadLimits};
use pkgbench::{InstallRecord, Opts, RunMode, RunReport, RunSummary, install_packages};
use std::path::PathBuf;

// --- InstallRecord ---

#[test]
fn test_record_line_plain() {
    let r = InstallRecord {
        package: "pkg001".into(),
        worker: None,
    };
    assert_eq!(r.to_line(), "pkg001 installed\n");
}

#[test]
fn test_record_line_tagged() {
    let r = InstallRecord {
        package: "pkg001".into(),
        worker: Some(5),
    };
    assert_eq!(r.to_line(), "pkg001 installed (worker 5)\n");
    assert_eq!(InstallRecord::parse("pkg001 installed (worker 5)"), Some(r));
}

#[test]
fn test_record_parse_name_with_space() {
    let r = InstallRecord::parse("my pkg installed").unwrap();
    assert_eq!(r.package, "my pkg");
    assert_eq!(r.worker, None);
}

#[test]
fn test_record_parse_rejects_other_lines() {
    assert_eq!(InstallRecord::parse(""), None);
    assert_eq!(InstallRecord::parse("pkg001 removed"), None);
    assert_eq!(InstallRecord::parse("pkg001 installed (worker x)"), None);
}

// --- RunSummary / RunReport ---

#[test]
fn test_headline_serial_and_parallel() {
    let mut s = RunSummary {
        listed: 3,
        elapsed_secs: 0.5,
        workers: 1,
        ..Default::default()
    };
    assert_eq!(s.headline(), "Processed 3 packages in 0.500000 seconds (serial)");
    s.parallel = true;
    s.workers = 4;
    assert_eq!(
        s.headline(),
        "Processed 3 packages in 0.500000 seconds (parallel, threads=4)"
    );
}

#[test]
fn test_speedup_only_when_both_ran() {
    let serial = RunSummary {
        elapsed_secs: 2.0,
        ..Default::default()
    };
    let parallel = RunSummary {
        elapsed_secs: 0.5,
        parallel: true,
        ..Default::default()
    };
    let both = RunReport::new(Some(serial.clone()), Some(parallel));
    assert_eq!(both.speedup, Some(4.0));
    assert_eq!(both.summaries().count(), 2);
    assert_eq!(RunReport::new(Some(serial), None).speedup, None);
}

// --- worker resolution ---

#[test]
fn test_worker_limits_resolve() {
    let limits = WorkerThreadLimits {
        all_threads: 8,
        ..Default::default()
    };
    assert_eq!(limits.resolve(None), 8);
    assert_eq!(limits.resolve(Some(3)), 3);
    assert_eq!(limits.resolve(Some(0)), WorkerThreadLimits::FLOOR_THREADS);
    assert_eq!(
        limits.resolve(Some(100_000)),
        WorkerThreadLimits::MAX_THREADS
    );
}

// --- CLI parsing ---

#[test]
fn test_cli_requires_both_paths() {
    assert!(Cli::try_parse_from(["pkgbench"]).is_err());
    assert!(Cli::try_parse_from(["pkgbench", "packages.txt"]).is_err());
    let cli = Cli::try_parse_from(["pkgbench", "packages.txt", "out"]).unwrap();
    assert_eq!(cli.package_list, Some(PathBuf::from("packages.txt")));
    assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    assert!(cli.mode.is_none());
}

#[test]
fn test_cli_flags() {
    let cli = Cli::try_parse_from([
        "pkgbench",
        "list",
        "out",
        "-m",
        "compare",
        "-j",
        "3",
        "--tag-worker",
        "--json",
    ])
    .unwrap();
    assert_eq!(cli.mode, Some(RunMode::Compare));
    assert_eq!(cli.workers, Some(3));
    assert_eq!(cli.tag_worker, Some(true));
    assert_eq!(cli.json, Some(true));
    assert_eq!(cli.verbose, None);
}

#[test]
fn test_cli_bool_flags_before_paths_take_no_value() {
    let cli = Cli::try_parse_from(["pkgbench", "-v", "-k", "packages.txt", "out"]).unwrap();
    assert_eq!(cli.verbose, Some(true));
    assert_eq!(cli.keep_ledger, Some(true));
    assert_eq!(cli.package_list, Some(PathBuf::from("packages.txt")));
    assert_eq!(cli.output_dir, Some(PathBuf::from("out")));

    let cli = Cli::try_parse_from(["pkgbench", "--json=false", "list", "out"]).unwrap();
    assert_eq!(cli.json, Some(false));
}

#[test]
fn test_cli_generate_needs_no_paths() {
    let cli = Cli::try_parse_from(["pkgbench", "generate", "data", "-p", "5"]).unwrap();
    match cli.command {
        Some(Commands::Generate {
            dir,
            packages,
            files,
        }) => {
            assert_eq!(dir, PathBuf::from("data"));
            assert_eq!(packages, 5);
            assert_eq!(files, 20);
        }
        None => panic!("expected generate subcommand"),
    }
}

// --- library entry point ---

#[test]
fn test_compare_mode_runs_both_into_subdirs() {
    let dir = tempfile::tempdir().unwrap();
    let list = generate_test_data(dir.path(), 4, 3).unwrap();
    let out = dir.path().join("out");
    let opts = Opts {
        mode: RunMode::Compare,
        workers: Some(2),
        ..Default::default()
    };

    let report = install_packages(&list, &out, &opts, None).unwrap();
    let serial = report.serial.as_ref().unwrap();
    let parallel = report.parallel.as_ref().unwrap();
    assert_eq!(serial.installed, 4);
    assert_eq!(parallel.installed, 4);
    assert!(parallel.workers <= 2);
    for sub in [LayoutNames::SERIAL_SUBDIR, LayoutNames::PARALLEL_SUBDIR] {
        let ledger = std::fs::read_to_string(out.join(sub).join(LayoutNames::LEDGER)).unwrap();
        assert_eq!(ledger.lines().count(), 4);
    }
}

#[test]
fn test_serial_mode_reports_one_summary() {
    let dir = tempfile::tempdir().unwrap();
    let list = generate_test_data(dir.path(), 2, 1).unwrap();
    let out = dir.path().join("out");
    let opts = Opts {
        mode: RunMode::Serial,
        ..Default::default()
    };
    let report = install_packages(&list, &out, &opts, None).unwrap();
    assert!(report.parallel.is_none());
    assert_eq!(report.serial.unwrap().workers, 1);
    assert!(out.join("pkg001").join("f1.bin.meta").is_file());
}
