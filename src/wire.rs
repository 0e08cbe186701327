//! Channel plumbing between the coordinator and its workers.
//!
//! The protocol's four messages ride three channel kinds: a rendezvous input
//! channel per worker carrying the two-phase transfer (`InputFrame::Len`,
//! then `InputFrame::Bytes`), one shared unbounded submission channel every
//! worker sends nonces on, and an unbounded stop channel per worker so the
//! shutdown round cannot block on a worker that stopped polling.

use flume::{Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Two-phase puzzle input transfer: the byte length announces the payload,
/// then the raw bytes follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFrame {
    Len(u64),
    Bytes(Vec<u8>),
}

/// Channel endpoints owned by one worker.
pub struct WorkerLinks {
    pub rank: usize,
    pub input_rx: Receiver<InputFrame>,
    pub stop_rx: Receiver<()>,
    pub submit_tx: Sender<u64>,
}

/// Channel endpoints owned by the coordinator. Index `i` of `input_txs` and
/// `stop_txs` reaches the worker with rank `i + 1`.
pub struct CoordinatorLinks {
    pub input_txs: Vec<Sender<InputFrame>>,
    pub stop_txs: Vec<Sender<()>>,
    pub submit_rx: Receiver<u64>,
}

impl CoordinatorLinks {
    /// Sends one zero-payload stop to every worker individually. The stop
    /// channels are buffered, so this never blocks; a worker that already
    /// terminated is skipped.
    pub fn broadcast_stop(&self) {
        for (i, tx) in self.stop_txs.iter().enumerate() {
            if tx.send(()).is_err() {
                log::warn!("worker {} was gone before stop delivery", i + 1);
            }
        }
    }
}

/// Either side's endpoints, for rank-dispatched entry points.
pub enum Links {
    Coordinator(CoordinatorLinks),
    Worker(WorkerLinks),
}

impl Links {
    /// Participant rank these endpoints belong to (0 is the coordinator).
    pub fn rank(&self) -> usize {
        match self {
            Links::Coordinator(_) => 0,
            Links::Worker(links) => links.rank,
        }
    }
}

/// Builds the full channel mesh for one coordinator and `workers` workers.
pub fn wire_cluster(workers: usize) -> (CoordinatorLinks, Vec<WorkerLinks>) {
    let (submit_tx, submit_rx) = flume::unbounded();
    let mut input_txs = Vec::with_capacity(workers);
    let mut stop_txs = Vec::with_capacity(workers);
    let mut worker_links = Vec::with_capacity(workers);
    for rank in 1..=workers {
        // Rendezvous: input delivery doubles as the start barrier.
        let (input_tx, input_rx) = flume::bounded(0);
        let (stop_tx, stop_rx) = flume::unbounded();
        input_txs.push(input_tx);
        stop_txs.push(stop_tx);
        worker_links.push(WorkerLinks {
            rank,
            input_rx,
            stop_rx,
            submit_tx: submit_tx.clone(),
        });
    }
    let coordinator = CoordinatorLinks {
        input_txs,
        stop_txs,
        submit_rx,
    };
    (coordinator, worker_links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_channel_requires_rendezvous() {
        let (coordinator, workers) = wire_cluster(1);
        // No worker is blocked in a receive, so an input send cannot finish.
        assert!(coordinator.input_txs[0]
            .try_send(InputFrame::Len(3))
            .is_err());
        drop(workers);
    }

    #[test]
    fn stop_channel_buffers_without_a_polling_worker() {
        let (coordinator, workers) = wire_cluster(1);
        assert!(coordinator.stop_txs[0].send(()).is_ok());
        assert!(workers[0].stop_rx.try_recv().is_ok());
    }

    #[test]
    fn broadcast_stop_survives_dead_workers() {
        let (coordinator, mut workers) = wire_cluster(2);
        drop(workers.remove(0));
        coordinator.broadcast_stop();
        assert!(workers[0].stop_rx.try_recv().is_ok());
    }

    #[test]
    fn submissions_arrive_in_send_order() {
        let (coordinator, workers) = wire_cluster(2);
        workers[0].submit_tx.send(11).expect("first submission");
        workers[1].submit_tx.send(22).expect("second submission");
        assert_eq!(coordinator.submit_rx.recv(), Ok(11));
        assert_eq!(coordinator.submit_rx.recv(), Ok(22));
    }

    #[test]
    fn serde_roundtrip_input_frames() {
        let frames = vec![InputFrame::Len(4), InputFrame::Bytes(b"test".to_vec())];
        let json = serde_json::to_string(&frames).expect("serialize frames");
        let back: Vec<InputFrame> = serde_json::from_str(&json).expect("deserialize frames");
        assert_eq!(back, frames);
    }
}
