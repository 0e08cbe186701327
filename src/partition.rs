//! Nonce-space partitioning policies for the worker pool.

use serde::{Deserialize, Serialize};

/// How the nonce space is split across worker ranks `1..=workers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoncePartition {
    /// Worker `r` of `W` searches `r - 1, r - 1 + W, r - 1 + 2W, ...`.
    /// Regions are disjoint and together cover the whole space.
    #[default]
    Stride,
    /// Heuristic: worker `r` starts at `u32::MAX / (r + 1)` and steps by 1.
    /// Spreads ranks out but guarantees neither disjointness nor coverage.
    Spread,
}

impl NoncePartition {
    /// First nonce for `rank`. Worker ranks start at 1; rank 0 is the
    /// coordinator and never searches.
    pub fn start_nonce(&self, rank: usize) -> u64 {
        match self {
            NoncePartition::Stride => rank.saturating_sub(1) as u64,
            NoncePartition::Spread => u64::from(u32::MAX) / (rank as u64 + 1),
        }
    }

    /// Cursor increment between consecutive attempts of one worker.
    pub fn stride(&self, workers: usize) -> u64 {
        match self {
            NoncePartition::Stride => workers as u64,
            NoncePartition::Spread => 1,
        }
    }
}
