//! The judging side of the protocol: distribute the input, wait on
//! submissions in arrival order, verify each locally, stop the pool.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::candidate::encode_candidate;
use crate::error::Error;
use crate::session::SearchConfig;
use crate::sha256::Digest;
use crate::verify::verify_nonce;
use crate::wire::{CoordinatorLinks, InputFrame};

/// The accepted winning find, carrying everything a caller needs to report
/// and to re-verify independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub nonce: u64,
    pub digest: Digest,
    /// The exact bytes whose hash won: `input || decimal(nonce)`.
    pub candidate: Vec<u8>,
    /// Wall-clock time from the start of the waiting phase to acceptance.
    pub elapsed: Duration,
}

impl Solution {
    /// 64-character hex rendering of the winning digest.
    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// The winning candidate as text; non-UTF-8 input bytes are replaced.
    pub fn candidate_lossy(&self) -> String {
        String::from_utf8_lossy(&self.candidate).into_owned()
    }
}

/// Runs the coordinator to completion.
///
/// Distributes the puzzle input to every worker in two frames (this blocks
/// until each worker has taken delivery), then receives submissions in
/// arrival order. Every submission is re-verified here; an invalid one is
/// discarded and the wait continues. The first valid submission wins: a stop
/// signal goes out to each worker individually and the solution is returned
/// with the elapsed wall-clock search time.
///
/// The wait has no timeout. If no worker can ever satisfy the difficulty
/// this blocks until the submission channel closes, which surfaces as
/// [`Error::ChannelClosed`].
pub fn run_coordinator(
    links: &CoordinatorLinks,
    input: &[u8],
    config: &SearchConfig,
) -> Result<Solution, Error> {
    distribute_input(links, input)?;
    log::debug!(
        "distributed {} input bytes to {} workers",
        input.len(),
        links.input_txs.len()
    );

    let waiting_since = Instant::now();
    let (nonce, digest) = loop {
        let nonce = links.submit_rx.recv().map_err(|_| Error::ChannelClosed)?;
        match verify_nonce(input, nonce, config.difficulty) {
            Ok(digest) => break (nonce, digest),
            // Stale or bogus submission; keep waiting.
            Err(err) => log::debug!("discarded submission {nonce}: {err}"),
        }
    };

    links.broadcast_stop();
    let elapsed = waiting_since.elapsed();
    log::info!(
        "accepted nonce {} after {:.3}s",
        nonce,
        elapsed.as_secs_f64()
    );
    Ok(Solution {
        nonce,
        digest,
        candidate: encode_candidate(input, nonce),
        elapsed,
    })
}

/// Two frames per worker: the byte length announces the payload, then the
/// bytes follow. Rendezvous delivery makes this the start barrier.
fn distribute_input(links: &CoordinatorLinks, input: &[u8]) -> Result<(), Error> {
    for tx in &links.input_txs {
        tx.send(InputFrame::Len(input.len() as u64))
            .map_err(|_| Error::ChannelClosed)?;
        tx.send(InputFrame::Bytes(input.to_vec()))
            .map_err(|_| Error::ChannelClosed)?;
    }
    Ok(())
}
