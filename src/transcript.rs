// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Fiat-Shamir transcript hashing and challenge expansion.
//!
//! Challenges are public-coin: any party can recompute them from the
//! transcript items alone, so the constructions here are fixed.
//!
//! * [`hash_concat`] is SHA-256 over the in-order concatenation of its
//!   arguments.
//! * [`expand`] derives element `i` of a challenge vector as
//!   `SHA-256(seed || i)` (with `i` as a 64-bit big-endian counter),
//!   folded byte-by-byte modulo the bound.
//! * [`element_bytes`] is the canonical 64-bit big-endian serialization of
//!   a field-element vector, used both for transcript items and Merkle
//!   leaves.

use sha2::{Digest, Sha256};

/// SHA-256 of the concatenation of `parts`, in order.
pub fn hash_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut digest = Sha256::new();
    for part in parts {
        digest.update(part);
    }
    digest.finalize().into()
}

/// Deterministically expand `seed` into `length` elements of `[0, bound)`.
pub fn expand(seed: &[u8], length: usize, bound: u64) -> Vec<u64> {
    (0..length as u64)
        .map(|counter| {
            let mut digest = Sha256::new();
            digest.update(seed);
            digest.update(counter.to_be_bytes());
            reduce_digest(&digest.finalize(), bound)
        })
        .collect()
}

/// Serialize field elements as consecutive 64-bit big-endian words.
pub fn element_bytes(elements: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(elements.len() * 8);
    for element in elements {
        bytes.extend_from_slice(&element.to_be_bytes());
    }
    bytes
}

// Interpret a 256-bit digest as a big-endian integer mod `bound`.
fn reduce_digest(digest: &[u8], bound: u64) -> u64 {
    let mut acc = 0u128;
    for &byte in digest {
        acc = ((acc << 8) | byte as u128) % bound as u128;
    }
    acc as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_concat_matches_one_shot_hashing() {
        let joined: [u8; 32] = Sha256::digest(b"hello world").into();
        assert_eq!(hash_concat(&[b"hello", b" ", b"world"]), joined);
        assert_eq!(hash_concat(&[b"hello world"]), joined);
    }

    #[test]
    fn expansion_is_deterministic_and_bounded() {
        let a = expand(b"seed", 64, 101);
        let b = expand(b"seed", 64, 101);
        assert_eq!(a, b);
        assert!(a.iter().all(|&v| v < 101));
        // A prefix of a longer expansion is the shorter expansion.
        assert_eq!(expand(b"seed", 16, 101), &a[..16]);
    }

    #[test]
    fn different_seeds_expand_differently() {
        assert_ne!(expand(b"seed-a", 32, 101), expand(b"seed-b", 32, 101));
    }

    #[test]
    fn digest_reduction_matches_big_integer_arithmetic() {
        // 0x0100 = 256, and 256 mod 101 = 54.
        assert_eq!(reduce_digest(&[1, 0], 101), 54);
        assert_eq!(reduce_digest(&[0xff; 4], 1 << 40), 0xff_ff_ff_ff);
    }

    #[test]
    fn element_serialization_is_big_endian() {
        assert_eq!(
            element_bytes(&[1, 0x0102030405060708]),
            vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }
}
