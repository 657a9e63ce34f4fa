//! Progress bar utilities for displaying install status

use kdam::{Animation, Bar, BarExt};

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration. The caller owns locking.
pub fn create_progress_bar(config: ProgressBarConfig) -> Bar {
    kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " pkgs"
    )
}

/// Print a line above the bar without tearing it.
pub fn write_above_bar(bar: &mut Bar, line: &str) {
    let _ = bar.write(line);
}

/// Advance the bar by `n`.
pub fn advance_bar(bar: &mut Bar, n: usize) {
    let _ = bar.update(n);
}

/// Final redraw so the bar shows its last count.
pub fn finish_bar(bar: &mut Bar) {
    let _ = bar.refresh();
    eprintln!();
}
