//! From-scratch SHA-256 (FIPS 180-4): an incremental engine plus a one-shot
//! digest helper. Conformance is pinned by the published test vectors below.

use std::fmt;

use serde::{Deserialize, Serialize};

const BLOCK_LEN: usize = 64;

/// Initial hash state, fractional parts of the square roots of the first
/// eight primes.
const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constants, fractional parts of the cube roots of the first 64 primes.
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// A finished 32-byte SHA-256 digest.
///
/// Rendered as 64 lowercase hex characters by [`Digest::to_hex`] and
/// [`fmt::Display`], most significant nibble of each byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fixed-width 64-character lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(raw: [u8; 32]) -> Self {
        Digest(raw)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Incremental SHA-256 engine.
///
/// A fresh engine (or one that has just been [`reset`](Sha256::reset)) holds
/// the fixed initial state and empty counters. [`update`](Sha256::update) may
/// be called any number of times; [`finalize`](Sha256::finalize) consumes the
/// engine, so a half-finalized instance can never be reused by accident. Code
/// that hashes one buffer at a time should prefer [`Sha256::digest`], which
/// never exposes engine state at all.
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    block: [u8; BLOCK_LEN],
    filled: usize,
    len: u64,
}

impl Sha256 {
    pub fn new() -> Self {
        Self {
            state: H0,
            block: [0; BLOCK_LEN],
            filled: 0,
            len: 0,
        }
    }

    /// Restores the exact state of a newly constructed engine.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Absorbs `data`, compressing every completed 64-byte block. Splitting
    /// an input across calls yields the same digest as one concatenated call.
    pub fn update(&mut self, mut data: &[u8]) {
        self.len += data.len() as u64;
        if self.filled > 0 {
            let take = (BLOCK_LEN - self.filled).min(data.len());
            self.block[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled == BLOCK_LEN {
                compress(&mut self.state, &self.block);
                self.filled = 0;
            }
        }
        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }
        let rest = blocks.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.filled += rest.len();
    }

    /// Appends the standard padding and length field, runs the last
    /// compression, and serializes the state big-endian. Consuming `self`
    /// makes finalizing twice without a reset unrepresentable.
    pub fn finalize(mut self) -> Digest {
        let bit_len = self.len * 8;
        self.block[self.filled] = 0x80;
        self.filled += 1;
        // Not enough room for the 8-byte length field: pad out this block
        // and spill into one more.
        if self.filled > BLOCK_LEN - 8 {
            self.block[self.filled..].fill(0);
            compress(&mut self.state, &self.block);
            self.filled = 0;
        }
        self.block[self.filled..BLOCK_LEN - 8].fill(0);
        self.block[BLOCK_LEN - 8..].copy_from_slice(&bit_len.to_be_bytes());
        compress(&mut self.state, &self.block);

        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest(out)
    }

    /// One-shot digest of `data` with a private, freshly initialized engine.
    pub fn digest(data: &[u8]) -> Digest {
        let mut engine = Self::new();
        engine.update(data);
        engine.finalize()
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

/// One compression round over a full 64-byte block. `block` must be exactly
/// `BLOCK_LEN` bytes.
fn compress(state: &mut [u32; 8], block: &[u8]) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut w = [0u32; 64];
    for i in 0..16 {
        w[i] = u32::from_be_bytes([
            block[4 * i],
            block[4 * i + 1],
            block[4 * i + 2],
            block[4 * i + 3],
        ]);
    }
    for i in 16..64 {
        let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
        let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
        w[i] = w[i - 16]
            .wrapping_add(s0)
            .wrapping_add(w[i - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
    state[5] = state[5].wrapping_add(f);
    state[6] = state[6].wrapping_add(g);
    state[7] = state[7].wrapping_add(h);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use sha2::Digest as _;

    #[test]
    fn empty_input_matches_published_vector() {
        assert_eq!(
            Sha256::digest(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn abc_matches_published_vector() {
        assert_eq!(
            Sha256::digest(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn two_block_nist_vector() {
        // 56 bytes, forcing the length field into a second padding block.
        let msg = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
        assert_eq!(
            Sha256::digest(msg).to_hex(),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
    }

    #[test]
    fn ascii_sentence_vector() {
        assert_eq!(
            Sha256::digest(b"The quick brown fox jumps over the lazy dog").to_hex(),
            "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592"
        );
    }

    #[test]
    fn million_a_vector() {
        let mut engine = Sha256::new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            engine.update(&chunk);
        }
        assert_eq!(
            engine.finalize().to_hex(),
            "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
        );
    }

    #[test]
    fn incremental_equals_one_shot_at_padding_edges() {
        let data: Vec<u8> = (0u8..=130).collect();
        let whole = Sha256::digest(&data);
        for split in [0, 1, 55, 56, 63, 64, 65, 127, 128, data.len()] {
            let mut engine = Sha256::new();
            engine.update(&data[..split]);
            engine.update(&data[split..]);
            assert_eq!(engine.finalize(), whole, "split at {split}");
        }
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut engine = Sha256::new();
        engine.update(b"poisoned leftover state");
        engine.reset();
        engine.update(b"abc");
        assert_eq!(engine.finalize(), Sha256::digest(b"abc"));
    }

    #[test]
    fn random_chunkings_match_reference_implementation() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.gen_range(0..600);
            let data: Vec<u8> = (&mut rng)
                .sample_iter(rand::distributions::Standard)
                .take(len)
                .collect();

            let mut engine = Sha256::new();
            let mut fed = 0;
            while fed < data.len() {
                let take = rng.gen_range(1..=data.len() - fed);
                engine.update(&data[fed..fed + take]);
                fed += take;
            }
            let ours = engine.finalize();

            let theirs: [u8; 32] = sha2::Sha256::digest(&data).into();
            assert_eq!(ours.as_bytes(), &theirs);
        }
    }

    #[test]
    fn display_renders_lowercase_hex() {
        let digest = Sha256::digest(b"abc");
        let shown = format!("{digest}");
        assert_eq!(shown.len(), 64);
        assert_eq!(shown, digest.to_hex());
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
