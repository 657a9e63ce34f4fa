//! Load `.pkgbench.toml` from a directory (CLI only). Lib callers pass [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{Opts, RunMode};

#[derive(Debug, Default, Deserialize)]
pub struct PkgbenchToml {
    #[serde(default)]
    settings: RunSection,
}

#[derive(Debug, Default, Deserialize)]
struct RunSection {
    workers: Option<usize>,
    mode: Option<RunMode>,
    tag_worker: Option<bool>,
    keep_ledger: Option<bool>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Parse settings from TOML text.
pub fn parse_pkgbench_toml(s: &str) -> Result<PkgbenchToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load `.pkgbench.toml` from `dir`. `Ok(None)` when the file does not exist; a file that
/// cannot be read or parsed is an error for the caller to report once logging is up.
pub fn load_pkgbench_toml(dir: &Path) -> Result<Option<PkgbenchToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    parse_pkgbench_toml(&s)
        .map(Some)
        .with_context(|| format!("parse {}", path.display()))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &PkgbenchToml, opts: &mut Opts) {
    let section = &file.settings;
    if section.workers.is_some() {
        opts.workers = section.workers;
    }
    apply_file_opt!(section, opts, mode);
    apply_file_opt!(section, opts, tag_worker);
    apply_file_opt!(section, opts, keep_ledger);
    apply_file_opt!(section, opts, verbose);
    apply_file_opt!(section, opts, json);
}
