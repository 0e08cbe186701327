//! The searching side of the protocol: one cursor, one hash engine, one
//! non-blocking stop poll per attempt.

use serde::{Deserialize, Serialize};

use crate::candidate::{encode_candidate_into, meets_difficulty};
use crate::error::Error;
use crate::session::SearchConfig;
use crate::sha256::Sha256;
use crate::wire::{InputFrame, WorkerLinks};

/// Counters a worker reports once it has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub rank: usize,
    pub attempts: u64,
    pub submissions: u64,
}

/// Runs one worker to completion: receive the two-phase puzzle input, then
/// search until the coordinator's stop signal arrives.
///
/// A valid candidate is submitted fire-and-forget and the search continues;
/// only the stop signal ends the loop. Any channel failure is fatal to this
/// worker and surfaces as [`Error::ChannelClosed`].
pub fn run_worker(links: WorkerLinks, config: &SearchConfig) -> Result<WorkerSummary, Error> {
    let input = receive_input(&links)?;
    let mut cursor = config.partition.start_nonce(links.rank);
    let step = config.partition.stride(config.workers);
    log::debug!(
        "worker {} searching from nonce {} with stride {}",
        links.rank,
        cursor,
        step
    );

    let mut attempts = 0u64;
    let mut submissions = 0u64;
    let mut scratch = Vec::with_capacity(input.len() + 20);
    loop {
        // Poll, never wait: the hashing loop must not stall on termination.
        match links.stop_rx.try_recv() {
            Ok(()) => break,
            Err(flume::TryRecvError::Empty) => {}
            Err(flume::TryRecvError::Disconnected) => return Err(Error::ChannelClosed),
        }

        encode_candidate_into(&mut scratch, &input, cursor);
        let digest = Sha256::digest(&scratch);
        attempts += 1;
        if meets_difficulty(&digest, config.difficulty) {
            if links.submit_tx.send(cursor).is_err() {
                return Err(Error::ChannelClosed);
            }
            submissions += 1;
            log::debug!("worker {} submitted nonce {}", links.rank, cursor);
        }
        cursor = cursor.wrapping_add(step);
    }

    log::debug!(
        "worker {} stopped after {} attempts, {} submissions",
        links.rank,
        attempts,
        submissions
    );
    Ok(WorkerSummary {
        rank: links.rank,
        attempts,
        submissions,
    })
}

/// Blocking receive of the length frame and then the byte frame. The length
/// must match the payload exactly.
fn receive_input(links: &WorkerLinks) -> Result<Vec<u8>, Error> {
    let announced = match links.input_rx.recv() {
        Ok(InputFrame::Len(n)) => n,
        Ok(InputFrame::Bytes(_)) => {
            return Err(Error::BadFrame("input bytes arrived before length".into()))
        }
        Err(_) => return Err(Error::ChannelClosed),
    };
    let bytes = match links.input_rx.recv() {
        Ok(InputFrame::Bytes(bytes)) => bytes,
        Ok(InputFrame::Len(_)) => return Err(Error::BadFrame("duplicate length frame".into())),
        Err(_) => return Err(Error::ChannelClosed),
    };
    if bytes.len() as u64 != announced {
        return Err(Error::BadFrame(format!(
            "announced {} input bytes, received {}",
            announced,
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SearchConfigBuilder;
    use crate::wire::wire_cluster;
    use std::thread;

    fn config(difficulty: u32, workers: usize) -> SearchConfig {
        SearchConfigBuilder::default()
            .difficulty(difficulty)
            .workers(workers)
            .build_validated()
            .expect("test config")
    }

    #[test]
    fn submits_and_keeps_searching_at_zero_difficulty() {
        let (coordinator, mut links) = wire_cluster(1);
        let cfg = config(0, 1);
        let worker = {
            let links = links.remove(0);
            let cfg = cfg.clone();
            thread::spawn(move || run_worker(links, &cfg))
        };

        coordinator.input_txs[0]
            .send(InputFrame::Len(4))
            .expect("send length");
        coordinator.input_txs[0]
            .send(InputFrame::Bytes(b"test".to_vec()))
            .expect("send bytes");

        // Difficulty 0 makes every attempt a hit; a worker that stopped
        // after its first find would never deliver the second nonce.
        assert_eq!(coordinator.submit_rx.recv(), Ok(0));
        assert_eq!(coordinator.submit_rx.recv(), Ok(1));

        coordinator.broadcast_stop();
        let summary = worker
            .join()
            .expect("worker thread")
            .expect("worker result");
        assert_eq!(summary.rank, 1);
        assert!(summary.submissions >= 2);
        assert!(summary.attempts >= summary.submissions);
    }

    #[test]
    fn stops_on_signal_without_a_find() {
        let (coordinator, mut links) = wire_cluster(1);
        // An all-zero digest is unreachable, so no submission can happen.
        let cfg = config(64, 1);
        let worker = {
            let links = links.remove(0);
            let cfg = cfg.clone();
            thread::spawn(move || run_worker(links, &cfg))
        };

        coordinator.input_txs[0]
            .send(InputFrame::Len(4))
            .expect("send length");
        coordinator.input_txs[0]
            .send(InputFrame::Bytes(b"test".to_vec()))
            .expect("send bytes");
        coordinator.broadcast_stop();

        let summary = worker
            .join()
            .expect("worker thread")
            .expect("worker result");
        assert_eq!(summary.submissions, 0);
    }

    #[test]
    fn rejects_length_mismatch() {
        let (coordinator, mut links) = wire_cluster(1);
        let cfg = config(1, 1);
        let worker = {
            let links = links.remove(0);
            let cfg = cfg.clone();
            thread::spawn(move || run_worker(links, &cfg))
        };

        coordinator.input_txs[0]
            .send(InputFrame::Len(3))
            .expect("send length");
        coordinator.input_txs[0]
            .send(InputFrame::Bytes(b"test".to_vec()))
            .expect("send bytes");

        let err = worker.join().expect("worker thread").expect_err("mismatch");
        assert!(matches!(err, Error::BadFrame(_)));
    }

    #[test]
    fn rejects_bytes_before_length() {
        let (coordinator, mut links) = wire_cluster(1);
        let cfg = config(1, 1);
        let worker = {
            let links = links.remove(0);
            let cfg = cfg.clone();
            thread::spawn(move || run_worker(links, &cfg))
        };

        coordinator.input_txs[0]
            .send(InputFrame::Bytes(b"test".to_vec()))
            .expect("send bytes");

        let err = worker
            .join()
            .expect("worker thread")
            .expect_err("frame order");
        assert!(matches!(err, Error::BadFrame(_)));
    }

    #[test]
    fn lost_coordinator_is_fatal() {
        let (coordinator, mut links) = wire_cluster(1);
        let cfg = config(1, 1);
        let worker = {
            let links = links.remove(0);
            let cfg = cfg.clone();
            thread::spawn(move || run_worker(links, &cfg))
        };

        drop(coordinator);
        let err = worker
            .join()
            .expect("worker thread")
            .expect_err("disconnect");
        assert_eq!(err, Error::ChannelClosed);
    }
}
