//! A coordinator/worker brute-force search for a SHA-256 proof-of-work
//! nonce.
//!
//! One coordinator (rank 0) distributes a puzzle input to a pool of workers.
//! Each worker walks its own slice of the nonce space, hashing
//! `input || decimal(nonce)` with the crate's own SHA-256 engine, and
//! submits every find. The coordinator re-verifies each submission and the
//! first valid arrival wins; everyone else is told to stop.
//!
//! [`search`] runs a whole cluster on threads. [`run`] drives a single
//! participant over [`wire::Links`] for callers that manage their own
//! topology.
//!
//! ```
//! use powswarm::{search, SearchConfigBuilder};
//!
//! let config = SearchConfigBuilder::default()
//!     .difficulty(1)
//!     .workers(2)
//!     .build_validated()?;
//! let solution = search(b"hello", &config)?;
//! assert!(solution.digest_hex().starts_with('0'));
//! # Ok::<(), powswarm::Error>(())
//! ```

pub mod candidate;
pub mod coordinator;
pub mod error;
pub mod partition;
pub mod session;
pub mod sha256;
pub mod verify;
pub mod wire;
pub mod worker;

pub use candidate::{encode_candidate, leading_zero_nibbles, meets_difficulty, DEFAULT_DIFFICULTY};
pub use coordinator::{run_coordinator, Solution};
pub use error::{Error, VerifyError};
pub use partition::NoncePartition;
pub use session::{run, search, search_with_stats, SearchConfig, SearchConfigBuilder, SearchStats};
pub use sha256::{Digest, Sha256};
pub use verify::{verify_nonce, verify_solution};
pub use wire::{wire_cluster, Links};
pub use worker::{run_worker, WorkerSummary};
