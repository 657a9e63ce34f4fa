//! Work scheduler: runs a job per package index, serially or across a pool of worker threads.
//!
//! Concurrent mode queues every index on a crossbeam channel; each worker claims one index at a
//! time and comes back for the next when done, so slow packages never hold up a fixed share of
//! the list. The scheduler does no I/O of its own.

use anyhow::Result;
use crossbeam_channel::{Receiver, bounded};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::WorkerId;

/// How indices are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleMode {
    /// Input order on the calling thread, as worker 0.
    Sequential,
    /// Dynamic one-at-a-time claiming by up to `workers` threads.
    Concurrent { workers: usize },
}

/// Jobs run per worker. `per_worker.len()` is the pool size actually used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub per_worker: Vec<usize>,
}

impl ScheduleStats {
    pub fn workers(&self) -> usize {
        self.per_worker.len()
    }

    pub fn dispatched(&self) -> usize {
        self.per_worker.iter().sum()
    }
}

fn cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|c| c.load(Ordering::Relaxed))
}

/// Run `job(worker, index)` for every index in `0..count` and wait for all of them.
/// When `cancel` is set, no further indices are claimed; jobs already running finish.
pub fn schedule<F>(
    count: usize,
    mode: ScheduleMode,
    cancel: Option<&AtomicBool>,
    job: F,
) -> Result<ScheduleStats>
where
    F: Fn(WorkerId, usize) + Sync,
{
    match mode {
        ScheduleMode::Sequential => {
            let mut ran = 0_usize;
            for index in 0..count {
                if cancelled(cancel) {
                    break;
                }
                job(0, index);
                ran += 1;
            }
            Ok(ScheduleStats {
                per_worker: vec![ran],
            })
        }
        ScheduleMode::Concurrent { workers } => run_pool(count, workers, cancel, &job),
    }
}

/// Single worker: claim indices from `queue` until it is drained or cancel is set.
fn worker_loop<F>(
    worker: WorkerId,
    queue: Receiver<usize>,
    cancel: Option<&AtomicBool>,
    job: &F,
) -> usize
where
    F: Fn(WorkerId, usize) + Sync,
{
    let mut ran = 0_usize;
    while !cancelled(cancel) {
        match queue.recv() {
            Ok(index) => {
                job(worker, index);
                ran += 1;
            }
            Err(_) => break,
        }
    }
    ran
}

fn run_pool<F>(
    count: usize,
    workers: usize,
    cancel: Option<&AtomicBool>,
    job: &F,
) -> Result<ScheduleStats>
where
    F: Fn(WorkerId, usize) + Sync,
{
    // More workers than packages would only spin up idle threads.
    let workers = workers.clamp(1, count.max(1));
    debug!("Scheduling {} packages across {} workers", count, workers);

    let (tx, rx) = bounded::<usize>(count.max(1));
    for index in 0..count {
        tx.send(index)
            .map_err(|_| anyhow::anyhow!("work queue closed early"))?;
    }
    // Dropping the only sender lets workers see the queue close once it drains.
    drop(tx);

    thread::scope(|s| -> Result<ScheduleStats> {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let rx = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("worker-{worker}"))
                .spawn_scoped(s, move || worker_loop(worker, rx, cancel, job))?;
            handles.push(handle);
        }
        // Join every worker before looking at results so no panicked thread is left unjoined.
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        let per_worker = joined
            .into_iter()
            .map(|r| r.map_err(|_| anyhow::anyhow!("worker thread panicked")))
            .collect::<Result<Vec<usize>>>()?;
        Ok(ScheduleStats { per_worker })
    })
}
