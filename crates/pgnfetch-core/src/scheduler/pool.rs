//! Bounded worker pool and the completion-order coordinator loop.

use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tokio::sync::mpsc::UnboundedSender;

use super::options::FetchOptions;
use super::report::{ItemReport, RunReport, RunSummary};
use crate::fetcher::{fetch_record, NO_SOURCE_LINK};
use crate::outcome::Outcome;
use crate::record::Record;
use crate::retry::{ErrorKind, FetchFailure};
use crate::stats::StatsAggregator;
use crate::transport::Transport;
use crate::url_model;

type Completion = (usize, Outcome);

/// Owns the pool configuration and transport; one `run` per batch.
pub struct FetchCoordinator {
    opts: FetchOptions,
    transport: Arc<dyn Transport>,
}

/// Reporting state for the coordinator loop.
struct Progress<'a> {
    records: &'a [Record],
    dest_dir: &'a Path,
    stats: StatsAggregator,
    progress_tx: Option<&'a UnboundedSender<ItemReport>>,
    reported: Vec<bool>,
    completed: usize,
}

impl<'a> Progress<'a> {
    /// Counts and reports one outcome; returns the 1-based completion number.
    fn complete(&mut self, index: usize, outcome: Outcome) -> usize {
        if std::mem::replace(&mut self.reported[index], true) {
            tracing::error!(index, "duplicate completion ignored");
            return self.completed;
        }
        self.completed += 1;
        self.stats.record(&outcome);

        let record = &self.records[index];
        let filename = record
            .source_url()
            .map(|_| url_model::resolve_target(record, self.dest_dir).filename);
        let report = ItemReport {
            index: self.completed,
            total: self.records.len(),
            record_id: record.id,
            filename,
            outcome,
        };
        tracing::info!("{}", report);
        if let Some(tx) = self.progress_tx {
            let _ = tx.send(report);
        }
        self.completed
    }

    fn unreported(&self) -> Vec<usize> {
        self.reported
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(i, _)| i)
            .collect()
    }
}

impl FetchCoordinator {
    pub fn new(opts: FetchOptions, transport: Arc<dyn Transport>) -> Self {
        Self { opts, transport }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// Fetches every record into `dest_dir` and returns the aggregated summary.
    ///
    /// At most `concurrency` fetches are in flight. Records without a link are
    /// counted as skipped without entering the pool. Completions are reported
    /// (to `progress_tx` and the log) as they arrive; after every
    /// `pause_every`-th completion dispatch is held back for `pause` while
    /// in-flight fetches continue. Individual failures never abort the run.
    pub fn run(
        &self,
        records: Vec<Record>,
        dest_dir: &Path,
        progress_tx: Option<&UnboundedSender<ItemReport>>,
    ) -> Result<RunReport> {
        if records.is_empty() {
            tracing::info!("no records to fetch");
            return Ok(RunReport::NothingToDo);
        }

        std::fs::create_dir_all(dest_dir)
            .with_context(|| format!("create destination {}", dest_dir.display()))?;
        let destination = absolute(dest_dir);

        let records = Arc::new(records);
        let (fetchable, linkless): (Vec<usize>, Vec<usize>) =
            (0..records.len()).partition(|&i| records[i].source_url().is_some());

        let workers = self.opts.concurrency.max(1).min(fetchable.len());
        tracing::info!(
            total = records.len(),
            fetchable = fetchable.len(),
            workers,
            dest = %destination.display(),
            "starting fetch run"
        );

        let mut progress = Progress {
            records: &records,
            dest_dir,
            stats: StatsAggregator::new(records.len() as u64),
            progress_tx,
            reported: vec![false; records.len()],
            completed: 0,
        };

        let (job_tx, job_rx) = mpsc::channel::<usize>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (done_tx, done_rx) = mpsc::channel::<Completion>();
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(workers);
        for n in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let done_tx = done_tx.clone();
            let records = Arc::clone(&records);
            let transport = Arc::clone(&self.transport);
            let dest = dest_dir.to_path_buf();
            let retry = self.opts.retry;
            let handle = std::thread::Builder::new()
                .name(format!("pgnfetch-worker-{}", n))
                .spawn(move || loop {
                    let next = job_rx.lock().unwrap_or_else(|e| e.into_inner()).recv();
                    let Ok(index) = next else { break };
                    let outcome = catch_unwind(AssertUnwindSafe(|| {
                        fetch_record(&records[index], &dest, transport.as_ref(), &retry)
                    }))
                    .unwrap_or_else(|_| Outcome::Failed {
                        error: FetchFailure::new(ErrorKind::Other, "worker panicked"),
                    });
                    if done_tx.send((index, outcome)).is_err() {
                        break;
                    }
                })
                .context("spawn fetch worker")?;
            handles.push(handle);
        }
        drop(done_tx);

        // Records sharing a target path are never in flight together; a later
        // one waits and then finds the file already present.
        let targets: Vec<PathBuf> = records
            .iter()
            .map(|r| url_model::resolve_target(r, dest_dir).path)
            .collect();
        let mut busy: HashSet<PathBuf> = HashSet::new();
        let mut pending: VecDeque<usize> = fetchable.into_iter().collect();
        let mut in_flight = 0usize;
        let dispatch = |pending: &mut VecDeque<usize>, in_flight: &mut usize, busy: &mut HashSet<PathBuf>| {
            let mut pos = 0;
            while *in_flight < workers && pos < pending.len() {
                let index = pending[pos];
                if busy.contains(&targets[index]) {
                    pos += 1;
                    continue;
                }
                if job_tx.send(index).is_err() {
                    break;
                }
                pending.remove(pos);
                busy.insert(targets[index].clone());
                *in_flight += 1;
            }
        };

        dispatch(&mut pending, &mut in_flight, &mut busy);

        for index in linkless {
            let n = progress.complete(index, Outcome::skipped(NO_SOURCE_LINK));
            self.cadence_pause(n, &pending);
        }

        while in_flight > 0 {
            let Ok((index, outcome)) = done_rx.recv() else {
                tracing::error!(in_flight, "worker pool stopped before all records completed");
                break;
            };
            in_flight -= 1;
            busy.remove(&targets[index]);
            let n = progress.complete(index, outcome);
            self.cadence_pause(n, &pending);
            dispatch(&mut pending, &mut in_flight, &mut busy);
        }
        drop(job_tx);

        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("fetch worker thread panicked");
            }
        }

        // Only reachable if the pool died; keep the one-outcome-per-record invariant.
        for index in progress.unreported() {
            progress.complete(
                index,
                Outcome::Failed {
                    error: FetchFailure::new(ErrorKind::Other, "not fetched: worker pool stopped"),
                },
            );
        }

        let summary = RunSummary {
            stats: progress.stats.snapshot(),
            destination,
        };
        tracing::info!(
            total = summary.stats.total,
            downloaded = summary.stats.downloaded,
            skipped = summary.stats.skipped,
            failed = summary.stats.failed,
            "fetch run finished"
        );
        Ok(RunReport::Completed(summary))
    }

    fn cadence_pause(&self, completed: usize, pending: &VecDeque<usize>) {
        if self.opts.pause_due(completed) && !pending.is_empty() {
            tracing::debug!(completed, pause_ms = self.opts.pause.as_millis() as u64, "cadence pause");
            std::thread::sleep(self.opts.pause);
        }
    }
}

fn absolute(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}
