//! Candidate construction (`input || decimal(nonce)`) and the leading-zero
//! validity predicate over a digest.

use crate::sha256::Digest;

/// Stock difficulty for the demos: required leading `'0'` hex digits.
pub const DEFAULT_DIFFICULTY: u32 = 5;

/// Builds the byte sequence hashed for one attempt: the puzzle input followed
/// by the nonce's canonical decimal digits, no separator.
pub fn encode_candidate(input: &[u8], nonce: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(input.len() + 20);
    encode_candidate_into(&mut buf, input, nonce);
    buf
}

/// Same as [`encode_candidate`] but replaces the contents of `buf`, letting a
/// search loop reuse one allocation across attempts.
pub fn encode_candidate_into(buf: &mut Vec<u8>, input: &[u8], nonce: u64) {
    buf.clear();
    buf.extend_from_slice(input);

    // u64 never needs more than 20 decimal digits. Nonce 0 still emits "0".
    let mut digits = [0u8; 20];
    let mut start = digits.len();
    let mut n = nonce;
    loop {
        start -= 1;
        digits[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[start..]);
}

/// Number of leading `'0'` characters in the digest's hex rendering, counted
/// on the raw bytes (high nibble first) so no string is allocated.
pub fn leading_zero_nibbles(digest: &Digest) -> u32 {
    let mut count = 0;
    for &byte in digest.as_bytes() {
        if byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}

/// True iff the first `difficulty` characters of the digest's 64-char hex
/// form are `'0'`. A difficulty of 0 accepts every digest.
pub fn meets_difficulty(digest: &Digest, difficulty: u32) -> bool {
    leading_zero_nibbles(digest) >= difficulty
}
