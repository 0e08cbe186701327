//! Search sessions: validated configuration, the once-per-participant entry
//! point, and an in-process driver that runs a whole cluster on threads.

use std::thread;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::candidate::DEFAULT_DIFFICULTY;
use crate::coordinator::{run_coordinator, Solution};
use crate::error::Error;
use crate::partition::NoncePartition;
use crate::wire::{wire_cluster, Links};
use crate::worker::{run_worker, WorkerSummary};

/// Parameters shared by every participant of one search.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct SearchConfig {
    /// Leading `'0'` hex digits a winning digest must carry. Callers must
    /// keep this within `0..=64`; a larger value can never be satisfied and
    /// the coordinator waits forever, deliberately without an internal
    /// guard or timeout.
    #[builder(default = "DEFAULT_DIFFICULTY")]
    pub difficulty: u32,
    /// Number of searching workers, ranks `1..=workers`.
    pub workers: usize,
    /// How the nonce space is split across the workers.
    #[builder(default)]
    pub partition: NoncePartition,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be >= 1".into()));
        }
        Ok(())
    }
}

impl SearchConfigBuilder {
    fn validate(&self) -> Result<(), Error> {
        if self.workers.unwrap_or(0) == 0 {
            return Err(Error::InvalidConfig("workers must be >= 1".into()));
        }
        Ok(())
    }

    pub fn build_validated(self) -> Result<SearchConfig, Error> {
        self.validate()?;
        self.build().map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Aggregate counters from all workers of one finished search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub total_attempts: u64,
    pub total_submissions: u64,
    pub workers: usize,
}

/// Entry point for one participant, dispatched by the role its links carry.
///
/// The coordinator (rank 0) requires the puzzle input and resolves to
/// `Some(Solution)`. Workers ignore `input`, search until stopped, and
/// resolve to `None`.
pub fn run(
    links: Links,
    config: &SearchConfig,
    input: Option<&[u8]>,
) -> Result<Option<Solution>, Error> {
    config.validate()?;
    match links {
        Links::Coordinator(links) => {
            let input = input.ok_or_else(|| {
                Error::InvalidConfig("the coordinator requires the puzzle input".into())
            })?;
            run_coordinator(&links, input, config).map(Some)
        }
        Links::Worker(links) => {
            let summary = run_worker(links, config)?;
            log::debug!(
                "worker {} finished with {} attempts",
                summary.rank,
                summary.attempts
            );
            Ok(None)
        }
    }
}

/// Runs a whole search in-process: one thread per worker, the coordinator on
/// the calling thread. Returns the first independently verified find.
pub fn search(input: &[u8], config: &SearchConfig) -> Result<Solution, Error> {
    search_with_stats(input, config).map(|(solution, _)| solution)
}

/// Like [`search`], but also folds every worker's counters into
/// [`SearchStats`] once the pool has drained.
pub fn search_with_stats(
    input: &[u8],
    config: &SearchConfig,
) -> Result<(Solution, SearchStats), Error> {
    config.validate()?;
    let (coordinator, workers) = wire_cluster(config.workers);
    let mut joins = Vec::with_capacity(config.workers);
    for links in workers {
        let worker_config = config.clone();
        joins.push(thread::spawn(move || run_worker(links, &worker_config)));
    }

    match run_coordinator(&coordinator, input, config) {
        Ok(solution) => {
            // Keep the coordinator links alive while draining so a worker's
            // last-moment submission lands in the buffer instead of failing.
            let stats = drain_workers(joins, config.workers);
            Ok((solution, stats))
        }
        Err(err) => {
            // Disconnect the channels so no worker stays blocked.
            drop(coordinator);
            drain_workers(joins, config.workers);
            Err(err)
        }
    }
}

fn drain_workers(
    joins: Vec<thread::JoinHandle<Result<WorkerSummary, Error>>>,
    workers: usize,
) -> SearchStats {
    let mut stats = SearchStats {
        total_attempts: 0,
        total_submissions: 0,
        workers,
    };
    for join in joins {
        match join.join() {
            Ok(Ok(summary)) => {
                stats.total_attempts += summary.attempts;
                stats.total_submissions += summary.submissions;
            }
            Ok(Err(err)) => log::warn!("worker exited abnormally: {err}"),
            Err(_) => log::warn!("worker thread panicked"),
        }
    }
    stats
}
