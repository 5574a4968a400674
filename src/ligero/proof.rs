// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The proof data model.
//!
//! [`Proof`] is the only value that leaves the prover. It is serialized
//! with `serde`; field elements stay 64-bit and every ordering (opened
//! columns, share slots, path nodes) is the order of the containing `Vec`,
//! so both ends of the wire agree on the encoding.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::merkle::DIGEST_SIZE;

/// A secret bit together with its full replicated share list.
///
/// Claims exist only inside the prover; they never cross the wire. The
/// share list always holds exactly `C(N, T)` entries.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Claim {
    /// The secret, in {0, 1}.
    pub secret: u64,
    /// The additive slot values the secret was split into.
    pub shares: Vec<u64>,
}

/// One server's view of the replicated shares of every secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerShares {
    /// Which server this view belongs to, in `[0, N)`.
    pub party_index: usize,
    /// The 1-based share slots this server holds, in increasing order.
    pub slot_indices: Vec<usize>,
    /// One vector per secret, aligned with `slot_indices`.
    pub values: Vec<Vec<u64>>,
}

/// A revealed column of the encoded witness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedColumn {
    /// The column entries, one per witness row.
    pub values: Vec<u64>,
    /// The column's index in the encoded witness.
    pub index: usize,
    /// The nonce folded into this column's Merkle leaf.
    pub merkle_nonce: u64,
    /// This column's entry of the code-test mask row.
    pub code_mask: u64,
    /// This column's entry of the quadratic-test mask row.
    pub quadra_mask: u64,
    /// This column's entry of the linear-test mask row.
    pub linear_mask: u64,
    /// Sibling digests authenticating the column leaf, leaf level upward.
    pub auth_path: Vec<[u8; DIGEST_SIZE]>,
}

/// The proof delivered to one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Root of the commitment to the encoded witness columns.
    pub root: [u8; DIGEST_SIZE],
    /// The columns opened in response to the second challenge.
    pub opened_columns: Vec<OpenedColumn>,
    /// Code-test vector, truncated to its transmitted prefix.
    pub q_code: Vec<u64>,
    /// Quadratic-test vector.
    pub q_quadra: Vec<u64>,
    /// Linear-test vector.
    pub q_linear: Vec<u64>,
    /// The receiving server's replicated-share view.
    pub shares: ServerShares,
    /// Seeds the row-encoding randomness streams were keyed with.
    pub row_seeds: Vec<u64>,
    /// Root of the tree binding every server's view to the transcript.
    pub fst_root: [u8; DIGEST_SIZE],
    /// Authentication path for this server's leaf under `fst_root`.
    pub fst_path: Vec<[u8; DIGEST_SIZE]>,
}
