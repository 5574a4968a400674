// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! SHA-256 Merkle commitments over ordered byte-string leaves.
//!
//! Prover and verifier must agree on this tree bit-for-bit, so the shape
//! rules are fixed:
//!
//! * leaf digest: `SHA-256(leaf bytes)`;
//! * inner node: `SHA-256(left || right)`;
//! * a level with an odd node count duplicates its last node;
//! * authentication paths list sibling digests from the leaf level upward.

use sha2::{Digest, Sha256};
use tracing::error;

use crate::errors::{ProofError, Result};

/// Size in bytes of a node digest.
pub const DIGEST_SIZE: usize = 32;

/// A binary hash tree over an ordered list of leaves.
pub struct MerkleTree {
    // levels[0] holds the leaf digests; each level is padded to even
    // length (by duplicating its last node) before the next is derived.
    levels: Vec<Vec<[u8; DIGEST_SIZE]>>,
}

impl MerkleTree {
    /// Commit to `leaves`, in order.
    pub fn new(leaves: &[Vec<u8>]) -> Result<Self> {
        if leaves.is_empty() {
            error!("cannot build a Merkle tree over zero leaves");
            return Err(ProofError::Input("no leaves to commit to"));
        }

        let mut level: Vec<[u8; DIGEST_SIZE]> = leaves.iter().map(|l| hash(l)).collect();
        let mut levels = Vec::new();
        loop {
            if level.len() == 1 {
                levels.push(level);
                break;
            }
            if level.len() % 2 == 1 {
                level.push(*level.last().expect("level is non-empty"));
            }
            let next = level
                .chunks_exact(2)
                .map(|pair| hash_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(level);
            level = next;
        }

        Ok(Self { levels })
    }

    /// The root digest.
    pub fn root(&self) -> [u8; DIGEST_SIZE] {
        self.levels.last().expect("tree has at least one level")[0]
    }

    /// The authentication path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<Vec<[u8; DIGEST_SIZE]>> {
        if index >= self.levels[0].len() {
            error!(index, leaves = self.levels[0].len(), "leaf index out of range");
            return Err(ProofError::InternalInvariant("leaf index out of range"));
        }

        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            path.push(level[idx ^ 1]);
            idx /= 2;
        }
        Ok(path)
    }

    /// Check `path` against `root` for the given leaf bytes and position.
    pub fn verify(
        leaf: &[u8],
        index: usize,
        path: &[[u8; DIGEST_SIZE]],
        root: &[u8; DIGEST_SIZE],
    ) -> bool {
        let mut node = hash(leaf);
        let mut idx = index;
        for sibling in path {
            node = if idx % 2 == 0 {
                hash_pair(&node, sibling)
            } else {
                hash_pair(sibling, &node)
            };
            idx /= 2;
        }
        &node == root
    }
}

fn hash(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(data).into()
}

fn hash_pair(left: &[u8; DIGEST_SIZE], right: &[u8; DIGEST_SIZE]) -> [u8; DIGEST_SIZE] {
    let mut digest = Sha256::new();
    digest.update(left);
    digest.update(right);
    digest.finalize().into()
}
