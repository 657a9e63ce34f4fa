//! Payload enumeration and the per-file install step (read, checksum, copy, sidecar).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::checksum::{checksum, sidecar_contents};
use crate::engine::tools::sidecar_path;

/// Regular files found directly under a package's `files/` directory, plus entries that could not be read.
#[derive(Debug, Default)]
pub struct PayloadListing {
    /// Sorted by file name.
    pub files: Vec<PathBuf>,
    /// `(path if known, error)` for entries the walk could not read.
    pub unreadable: Vec<(Option<PathBuf>, String)>,
}

/// List regular files (symlinks followed) at depth 1 of `files_dir`.
/// Returns `None` when `files_dir` is missing or not a directory.
pub fn list_payload_files(files_dir: &Path) -> Option<PayloadListing> {
    if !files_dir.is_dir() {
        return None;
    }
    let mut listing = PayloadListing::default();
    for result in WalkDir::new(files_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match result {
            Ok(entry) if entry.file_type().is_file() => listing.files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => listing
                .unreadable
                .push((err.path().map(PathBuf::from), err.to_string())),
        }
    }
    Some(listing)
}

/// Install one payload file into `out_dir`: copy bytes unchanged and write `<name>.meta`.
/// Returns the checksum.
pub fn install_file(src: &Path, out_dir: &Path) -> Result<u64> {
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", src.display()))?;
    let data = std::fs::read(src).with_context(|| format!("read {}", src.display()))?;
    let sum = checksum(&data);

    let out_file = out_dir.join(&name);
    std::fs::write(&out_file, &data).with_context(|| format!("write {}", out_file.display()))?;
    let meta = sidecar_path(out_dir, &name);
    std::fs::write(&meta, sidecar_contents(sum))
        .with_context(|| format!("write {}", meta.display()))?;
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_payload_files(&dir.path().join("files")).is_none());
    }

    #[test]
    fn test_file_instead_of_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        std::fs::write(&files, b"not a dir").unwrap();
        assert!(list_payload_files(&files).is_none());
    }

    #[test]
    fn test_lists_only_top_level_regular_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        std::fs::create_dir_all(files.join("nested")).unwrap();
        std::fs::write(files.join("b.bin"), b"b").unwrap();
        std::fs::write(files.join("a.bin"), b"a").unwrap();
        std::fs::write(files.join("nested").join("c.bin"), b"c").unwrap();

        let listing = list_payload_files(&files).unwrap();
        let names: Vec<_> = listing
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin"]);
        assert!(listing.unreadable.is_empty());
    }

    #[test]
    fn test_install_file_copies_and_writes_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("f1.bin");
        let payload: Vec<u8> = (0..2000u32).map(|i| (i * 31 % 251) as u8).collect();
        std::fs::write(&src, &payload).unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        let sum = install_file(&src, &out).unwrap();
        assert_eq!(sum, checksum(&payload));
        assert_eq!(std::fs::read(out.join("f1.bin")).unwrap(), payload);
        assert_eq!(
            std::fs::read_to_string(out.join("f1.bin.meta")).unwrap(),
            format!("checksum:{sum}\n")
        );
    }

    #[test]
    fn test_install_file_missing_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = install_file(&dir.path().join("gone.bin"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("gone.bin"));
    }
}
