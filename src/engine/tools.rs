//! Package list and path utilities

use anyhow::{Context, Result};
use log::warn;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use crate::PackageDirectory;
use crate::utils::config::LayoutNames;

/// Parse a package list: one directory per line, blank lines skipped, surrounding whitespace trimmed.
/// Entries with no usable package name (such as `/`) are dropped with a warning.
pub fn parse_package_list(text: &str) -> Vec<PackageDirectory> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let pkg = PackageDirectory::from_path(line);
            if pkg.is_none() {
                warn!("Ignoring list entry {:?}: no package name in path", line);
            }
            pkg
        })
        .collect()
}

/// For each package, the index of the first earlier entry with the same name.
/// Only the first entry for a name owns its output directory.
pub fn duplicate_names(packages: &[PackageDirectory]) -> Vec<Option<usize>> {
    let mut owners: HashMap<&str, usize> = HashMap::with_capacity(packages.len());
    packages
        .iter()
        .enumerate()
        .map(|(index, pkg)| match owners.entry(pkg.name.as_str()) {
            Entry::Occupied(first) => Some(*first.get()),
            Entry::Vacant(slot) => {
                slot.insert(index);
                None
            }
        })
        .collect()
}

/// Read and parse the package list at `path`.
pub fn read_package_list(path: &Path) -> Result<Vec<PackageDirectory>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read package list {}", path.display()))?;
    Ok(parse_package_list(&text))
}

/// Sidecar path for a payload file: `<out_dir>/<file_name>.meta`.
pub fn sidecar_path(out_dir: &Path, file_name: &str) -> PathBuf {
    out_dir.join(format!("{file_name}.{}", LayoutNames::SIDECAR_EXT))
}

/// Ledger path under an output root.
pub fn ledger_path(out_root: &Path) -> PathBuf {
    out_root.join(LayoutNames::LEDGER)
}

/// Create `out_root` (and parents) if missing.
pub fn ensure_output_root(out_root: &Path) -> Result<()> {
    std::fs::create_dir_all(out_root)
        .with_context(|| format!("create output root {}", out_root.display()))
}
