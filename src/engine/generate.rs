//! Synthetic package tree for benchmarking: `pkgs/pkgNNN/{manifest.json,files/fK.bin}` plus `packages.txt`.

use anyhow::{Context, Result};
use rand::Rng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::utils::config::{GenerateConsts, LayoutNames};

/// Write `packages` packages of `files_per_package` random payloads each under `root`.
/// Returns the path of the package list, whose lines are the package directories.
pub fn generate_test_data(root: &Path, packages: usize, files_per_package: usize) -> Result<PathBuf> {
    let pkgs_dir = root.join(GenerateConsts::PACKAGES_DIR);
    std::fs::create_dir_all(&pkgs_dir)
        .with_context(|| format!("create {}", pkgs_dir.display()))?;

    let mut rng = rand::rng();
    let mut list = String::new();
    for i in 1..=packages {
        let name = format!("pkg{i:03}");
        let pkg_dir = pkgs_dir.join(&name);
        let files_dir = pkg_dir.join(LayoutNames::FILES_DIR);
        std::fs::create_dir_all(&files_dir)
            .with_context(|| format!("create {}", files_dir.display()))?;

        let manifest = format!("{{\"name\":\"{name}\",\"version\":\"1.0.0\"}}\n");
        std::fs::write(pkg_dir.join(LayoutNames::MANIFEST), manifest)
            .with_context(|| format!("write manifest for {name}"))?;

        for j in 1..=files_per_package {
            let size = GenerateConsts::MIN_FILE_SIZE
                + rng.random_range(0..=GenerateConsts::FILE_SIZE_JITTER);
            let mut payload = vec![0u8; size];
            rng.fill(payload.as_mut_slice());
            let path = files_dir.join(format!("f{j}.bin"));
            std::fs::write(&path, &payload)
                .with_context(|| format!("write {}", path.display()))?;
        }
        let _ = writeln!(list, "{}", pkg_dir.display());
    }

    let list_path = root.join(GenerateConsts::LIST_FILENAME);
    std::fs::write(&list_path, list)
        .with_context(|| format!("write {}", list_path.display()))?;
    Ok(list_path)
}
