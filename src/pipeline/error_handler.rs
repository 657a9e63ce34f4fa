use crate::RunSummary;
use crate::engine::reporter::Reporter;

/// After a run: log a one-line tally of skipped packages and failed files; in verbose mode
/// list every warning again so they are not lost above a progress bar.
pub fn report_skipped(summary: &RunSummary, reporter: &Reporter, verbose: bool) {
    if summary.skipped == 0 && summary.files_failed == 0 {
        return;
    }
    log::warn!(
        "Skipped {} packages and {} files due to unreadable or unwritable paths",
        summary.skipped,
        summary.files_failed
    );
    if verbose {
        for w in reporter.warnings() {
            eprintln!("  skipped: {}", w);
        }
    }
}
