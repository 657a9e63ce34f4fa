//! Synchronized reporter: one lock-guarded output for all workers plus atomic progress counters.

use colored::Colorize;
use kdam::{Animation, Bar};
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::WorkerId;
use crate::engine::progress::{
    ProgressBarConfig, advance_bar, create_progress_bar, finish_bar, write_above_bar,
};

/// Everything behind the reporter lock. Lines go above the bar when one is shown.
struct ReporterOutput {
    sink: Box<dyn Write + Send>,
    bar: Option<Bar>,
    warnings: Vec<String>,
}

/// Serializes progress and warning lines from concurrent pipelines so no two lines interleave.
pub struct Reporter {
    output: Mutex<ReporterOutput>,
    /// Packages installed (one ledger record each).
    completed: AtomicUsize,
    /// Packages whose pipeline has ended, whatever the outcome. Drives the bar and `percent()`.
    finished: AtomicUsize,
    total: usize,
    verbose: bool,
}

impl Reporter {
    /// Reporter writing to stderr. When verbose, info lines are shown and a progress bar tracks finished packages.
    pub fn stderr(total: usize, verbose: bool) -> Self {
        let bar = verbose.then(|| {
            create_progress_bar(ProgressBarConfig::new(
                total,
                "Installing",
                Animation::Classic,
            ))
        });
        Self::build(Box::new(std::io::stderr()), bar, total, verbose)
    }

    /// Reporter writing to any sink (no progress bar).
    pub fn with_sink<W: Write + Send + 'static>(sink: W, total: usize, verbose: bool) -> Self {
        Self::build(Box::new(sink), None, total, verbose)
    }

    fn build(sink: Box<dyn Write + Send>, bar: Option<Bar>, total: usize, verbose: bool) -> Self {
        Self {
            output: Mutex::new(ReporterOutput {
                sink,
                bar,
                warnings: Vec::new(),
            }),
            completed: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            total,
            verbose,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReporterOutput> {
        // A panicked writer leaves nothing half-written that matters here.
        self.output.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write one whole line. Atomic with respect to every other call on this reporter.
    pub fn emit(&self, line: &str) {
        let mut out = self.lock();
        write_line(&mut out, line);
    }

    /// Per-package progress line; shown only when verbose.
    pub fn info(&self, worker: WorkerId, msg: &str) {
        if self.verbose {
            self.emit(&format!("[worker {worker}] {msg}"));
        }
    }

    /// Warning line; always shown and kept for [`Reporter::warnings`].
    pub fn warn(&self, worker: WorkerId, msg: &str) {
        let line = format!("{} [worker {}] {}", "warning:".yellow(), worker, msg);
        let mut out = self.lock();
        write_line(&mut out, &line);
        out.warnings.push(msg.to_string());
    }

    /// Count one installed package. Returns the new count.
    pub fn complete(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Mark one package's pipeline as ended (installed, skipped, empty or cancelled) and advance
    /// the bar. Returns the new count.
    pub fn package_finished(&self) -> usize {
        let done = self.finished.fetch_add(1, Ordering::AcqRel) + 1;
        let mut out = self.lock();
        if let Some(bar) = out.bar.as_mut() {
            advance_bar(bar, 1);
        }
        done
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Finished share of the listed packages, 0.0..=100.0. An empty list counts as done.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.finished() as f64 * 100.0 / self.total as f64
    }

    /// Warnings emitted so far, in emission order.
    pub fn warnings(&self) -> Vec<String> {
        self.lock().warnings.clone()
    }

    /// Redraw and release the progress bar, flush the sink.
    pub fn finish(&self) {
        let mut out = self.lock();
        if let Some(mut bar) = out.bar.take() {
            finish_bar(&mut bar);
        }
        let _ = out.sink.flush();
    }
}

fn write_line(out: &mut ReporterOutput, line: &str) {
    match out.bar.as_mut() {
        Some(bar) => write_above_bar(bar, line),
        None => {
            let _ = writeln!(out.sink, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Cloneable in-memory sink so tests can read what the reporter wrote.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Sink that writes each buffer one byte at a time, so unsynchronized writers would tear lines.
    #[derive(Clone, Default)]
    struct ByteAtATime(SharedBuf);

    impl Write for ByteAtATime {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match buf.first() {
                Some(b) => {
                    self.0.write(std::slice::from_ref(b))?;
                    thread::yield_now();
                    Ok(1)
                }
                None => Ok(0),
            }
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_info_hidden_unless_verbose() {
        let buf = SharedBuf::default();
        let quiet = Reporter::with_sink(buf.clone(), 1, false);
        quiet.info(0, "hello");
        assert!(buf.text().is_empty());

        let loud = Reporter::with_sink(buf.clone(), 1, true);
        loud.info(2, "hello");
        assert_eq!(buf.text(), "[worker 2] hello\n");
    }

    #[test]
    fn test_warn_always_shown_and_kept() {
        let buf = SharedBuf::default();
        let r = Reporter::with_sink(buf.clone(), 1, false);
        r.warn(1, "cannot open manifest: pkgA");
        assert!(buf.text().contains("cannot open manifest: pkgA"));
        assert_eq!(r.warnings(), vec!["cannot open manifest: pkgA".to_string()]);
    }

    #[test]
    fn test_concurrent_emits_do_not_interleave() {
        let sink = ByteAtATime::default();
        let r = Reporter::with_sink(sink.clone(), 0, true);
        let threads = 6;
        let per_thread = 40;
        thread::scope(|s| {
            for t in 0..threads {
                let r = &r;
                s.spawn(move || {
                    for i in 0..per_thread {
                        r.emit(&format!("line-{t}-{i}-{}", "x".repeat(t * 3)));
                    }
                });
            }
        });
        let text = sink.0.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), threads * per_thread);
        for line in lines {
            let parts: Vec<&str> = line.splitn(4, '-').collect();
            assert_eq!(parts.len(), 4, "torn line: {line}");
            let t: usize = parts[1].parse().unwrap();
            assert_eq!(parts[3], "x".repeat(t * 3), "torn line: {line}");
        }
    }

    #[test]
    fn test_counters_lose_no_updates() {
        let r = Reporter::with_sink(std::io::sink(), 800, false);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for i in 0..100 {
                        if i % 2 == 0 {
                            r.complete();
                        }
                        r.package_finished();
                    }
                });
            }
        });
        assert_eq!(r.completed(), 400);
        assert_eq!(r.finished(), 800);
        assert!((r.percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_counts_every_finished_package() {
        let r = Reporter::with_sink(std::io::sink(), 3, false);
        r.complete();
        r.package_finished();
        assert!((r.percent() - 100.0 / 3.0).abs() < 1e-9);
        r.package_finished();
        r.package_finished();
        assert_eq!(r.completed(), 1);
        assert_eq!(r.percent(), 100.0);
    }

    #[test]
    fn test_percent_empty_total() {
        let r = Reporter::with_sink(std::io::sink(), 0, false);
        assert_eq!(r.percent(), 100.0);
    }
}
