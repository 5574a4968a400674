// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Deterministic seeded stream of field elements.
//!
//! Row-encoding randomness must be re-derivable by the servers from the
//! `(seed, nonce)` pairs carried in each proof, so the stream is pinned to
//! a fixed construction: a ChaCha20 RNG keyed with the seed, with the nonce
//! selecting the stream. Each draw takes the top 63 bits of the next 64-bit
//! output and reduces them modulo the requested bound.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A deterministic generator of field elements, fixed by `(seed, nonce)`.
pub(crate) struct SeededPrng {
    rng: ChaCha20Rng,
}

impl SeededPrng {
    /// Fix the stream identified by `(seed, nonce)`.
    pub(crate) fn new(seed: u64, nonce: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(nonce);
        Self { rng }
    }

    /// The next 63-bit draw, reduced modulo `bound`.
    pub(crate) fn next(&mut self, bound: u64) -> u64 {
        (self.rng.next_u64() >> 1) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_nonce_replays_the_stream() {
        let a: Vec<u64> = {
            let mut prng = SeededPrng::new(42, 7);
            (0..32).map(|_| prng.next(101)).collect()
        };
        let b: Vec<u64> = {
            let mut prng = SeededPrng::new(42, 7);
            (0..32).map(|_| prng.next(101)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_nonces_give_distinct_streams() {
        let mut p0 = SeededPrng::new(42, 0);
        let mut p1 = SeededPrng::new(42, 1);
        let a: Vec<u64> = (0..16).map(|_| p0.next(1 << 62)).collect();
        let b: Vec<u64> = (0..16).map(|_| p1.next(1 << 62)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn draws_respect_the_bound() {
        let mut prng = SeededPrng::new(1, 0);
        for _ in 0..1000 {
            assert!(prng.next(101) < 101);
        }
    }
}
