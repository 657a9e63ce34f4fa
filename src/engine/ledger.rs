//! Shared install ledger: one append-only text file written by every worker.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::InstallRecord;

/// Append-only ledger guarded by a mutex. Each [`Ledger::append`] writes one whole line while
/// holding the lock, so records from different workers never interleave.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    file: Mutex<File>,
}

impl Ledger {
    /// Open (creating if needed) the ledger at `path`. With `truncate`, existing records are dropped.
    pub fn open(path: &Path, truncate: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options
            .open(path)
            .with_context(|| format!("open ledger {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Append one record. The line is rendered before the lock is taken.
    pub fn append(&self, record: &InstallRecord) -> Result<()> {
        let line = record.to_line();
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("ledger lock poisoned"))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("append to ledger {}", self.path.display()))
    }

    /// Read all records from a ledger file, in file order. Lines that are not records are ignored.
    pub fn read_records(path: &Path) -> Result<Vec<InstallRecord>> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read ledger {}", path.display()))?;
        Ok(s.lines().filter_map(InstallRecord::parse).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    fn record(name: &str, worker: Option<usize>) -> InstallRecord {
        InstallRecord {
            package: name.to_string(),
            worker,
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install_db.txt");
        let ledger = Ledger::open(&path, true).unwrap();
        ledger.append(&record("pkg001", None)).unwrap();
        ledger.append(&record("pkg002", Some(3))).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "pkg001 installed\npkg002 installed (worker 3)\n");
        assert_eq!(
            Ledger::read_records(&path).unwrap(),
            vec![record("pkg001", None), record("pkg002", Some(3))]
        );
    }

    #[test]
    fn test_truncate_vs_keep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install_db.txt");
        Ledger::open(&path, true)
            .unwrap()
            .append(&record("old", None))
            .unwrap();

        Ledger::open(&path, false)
            .unwrap()
            .append(&record("kept", None))
            .unwrap();
        assert_eq!(Ledger::read_records(&path).unwrap().len(), 2);

        Ledger::open(&path, true)
            .unwrap()
            .append(&record("fresh", None))
            .unwrap();
        assert_eq!(
            Ledger::read_records(&path).unwrap(),
            vec![record("fresh", None)]
        );
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install_db.txt");
        let ledger = Ledger::open(&path, true).unwrap();
        let threads = 8;
        let per_thread = 250;

        thread::scope(|s| {
            for t in 0..threads {
                let ledger = &ledger;
                s.spawn(move || {
                    for i in 0..per_thread {
                        ledger
                            .append(&record(&format!("pkg-{t}-{i}"), Some(t)))
                            .unwrap();
                    }
                });
            }
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), threads * per_thread);
        let parsed: HashSet<InstallRecord> = lines
            .iter()
            .map(|l| InstallRecord::parse(l).expect("every line is a whole record"))
            .collect();
        assert_eq!(parsed.len(), threads * per_thread, "no duplicates");
    }

    #[test]
    fn test_read_skips_garbage_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install_db.txt");
        std::fs::write(&path, "a installed\n\nnot a record\nb installed (worker 1)\n").unwrap();
        assert_eq!(
            Ledger::read_records(&path).unwrap(),
            vec![record("a", None), record("b", Some(1))]
        );
    }
}
