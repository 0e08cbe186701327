//! Independent re-verification of claimed finds. A submission is never taken
//! at face value; everything is recomputed from the input.

use crate::candidate::{encode_candidate, meets_difficulty};
use crate::coordinator::Solution;
use crate::error::VerifyError;
use crate::sha256::{Digest, Sha256};

/// Recomputes the digest for `(input, nonce)` and checks it against the
/// difficulty. The coordinator runs this on every submission it receives.
pub fn verify_nonce(input: &[u8], nonce: u64, difficulty: u32) -> Result<Digest, VerifyError> {
    let digest = Sha256::digest(&encode_candidate(input, nonce));
    if !meets_difficulty(&digest, difficulty) {
        return Err(VerifyError::InvalidDifficulty);
    }
    Ok(digest)
}

/// Full check of a reported [`Solution`] against the input it claims to
/// solve: candidate bytes, digest, and difficulty must all agree.
pub fn verify_solution(
    input: &[u8],
    solution: &Solution,
    difficulty: u32,
) -> Result<(), VerifyError> {
    if solution.candidate != encode_candidate(input, solution.nonce) {
        return Err(VerifyError::Malformed);
    }
    let digest = Sha256::digest(&solution.candidate);
    if digest != solution.digest {
        return Err(VerifyError::Malformed);
    }
    if !meets_difficulty(&digest, difficulty) {
        return Err(VerifyError::InvalidDifficulty);
    }
    Ok(())
}
