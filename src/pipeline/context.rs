//! Shared state handed to every package pipeline: output root, ledger, reporter, cancel flag.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::ledger::Ledger;
use crate::engine::reporter::Reporter;

/// Borrowed by all workers for the duration of one run. Only the ledger and reporter are mutable,
/// and both serialize access internally.
pub struct PipelineContext<'a> {
    pub out_root: &'a Path,
    pub ledger: &'a Ledger,
    pub reporter: &'a Reporter,
    /// Tag ledger records with the worker id.
    pub tag_worker: bool,
    pub cancel: Option<&'a AtomicBool>,
}

impl PipelineContext<'_> {
    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }
}
