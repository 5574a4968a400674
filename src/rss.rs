// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Replicated secret sharing over T-subsets of servers.
//!
//! A secret is split additively into `C(N, T)` slots, one per T-subset of
//! the N servers (enumerated in lexicographic order). Server `j` receives
//! exactly the slots whose subset does *not* contain `j`, which is
//! `C(N-1, T)` of them. Any T colluding servers are jointly missing the
//! slot indexed by their own subset, so they learn nothing; any T+1
//! servers jointly hold every slot and can reconstruct by summation.
//!
//! Slot indices are 1-based: the prover aligns slot `s` with row `s` of a
//! witness row-group, whose row 0 is the secret row.

use itertools::Itertools;
use rand::{CryptoRng, Rng, RngCore};

use crate::errors::{ProofError, Result};
use crate::field;

/// One additive share slot held by a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RssShare {
    /// 1-based slot index into the full share list.
    pub index: usize,
    /// The slot value, an element of `[0, q)`.
    pub value: u64,
}

/// Splits single secrets into replicated additive shares.
#[derive(Debug)]
pub struct ReplicatedSecretSharing {
    n_server: usize,
    q: u64,
    // T-subsets of [0, N), lexicographic. Slot s (1-based) belongs to
    // subsets[s - 1].
    subsets: Vec<Vec<usize>>,
}

impl ReplicatedSecretSharing {
    /// Build a scheme for `n_server` servers with collusion threshold `t`.
    pub fn new(n_server: usize, t: usize, q: u64) -> Result<Self> {
        if t < 1 {
            return Err(ProofError::Config("t cannot be less than 1"));
        }
        if 3 * t + 1 > n_server {
            return Err(ProofError::Config("n_server cannot be less than 3t+1"));
        }
        if !field::is_prime(q) {
            return Err(ProofError::Config("q must be a prime number"));
        }

        let subsets = (0..n_server).combinations(t).collect();
        Ok(Self {
            n_server,
            q,
            subsets,
        })
    }

    /// Total number of share slots, `C(N, T)`.
    pub fn n_shares(&self) -> usize {
        self.subsets.len()
    }

    /// Split `secret` into its full slot list and the per-server views.
    ///
    /// The slot list sums to the secret mod q. Each server's view lists its
    /// slots in increasing slot order.
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        secret: u64,
        rng: &mut R,
    ) -> Result<(Vec<u64>, Vec<Vec<RssShare>>)> {
        let n_shares = self.n_shares();
        let mut share_list: Vec<u64> = (0..n_shares - 1)
            .map(|_| rng.gen_range(0..self.q))
            .collect();
        let partial_sum: u128 = share_list.iter().map(|&v| v as u128).sum();
        share_list.push(field::reduce(
            secret as i128 - partial_sum as i128,
            self.q,
        ));

        let views = (0..self.n_server)
            .map(|server| {
                self.subsets
                    .iter()
                    .zip(&share_list)
                    .enumerate()
                    .filter(|(_, (subset, _))| !subset.contains(&server))
                    .map(|(slot, (_, &value))| RssShare {
                        index: slot + 1,
                        value,
                    })
                    .collect()
            })
            .collect();

        Ok((share_list, views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::init_testing;
    use std::collections::HashSet;

    #[test]
    fn share_list_sums_to_the_secret() {
        let mut rng = init_testing();
        let rss = ReplicatedSecretSharing::new(4, 1, 101).unwrap();
        for secret in [0u64, 1, 57, 100] {
            let (share_list, _) = rss.split(secret, &mut rng).unwrap();
            assert_eq!(share_list.len(), 4);
            let sum: u128 = share_list.iter().map(|&v| v as u128).sum();
            assert_eq!((sum % 101) as u64, secret);
        }
    }

    #[test]
    fn each_server_holds_the_slots_excluding_itself() {
        let mut rng = init_testing();
        let rss = ReplicatedSecretSharing::new(7, 2, 101).unwrap();
        let (share_list, views) = rss.split(1, &mut rng).unwrap();
        assert_eq!(share_list.len(), 21); // C(7, 2)

        for (server, view) in views.iter().enumerate() {
            assert_eq!(view.len(), 15); // C(6, 2)
            for share in view {
                let subset = &rss.subsets[share.index - 1];
                assert!(!subset.contains(&server));
                assert_eq!(share.value, share_list[share.index - 1]);
            }
            // Views are listed in increasing slot order.
            assert!(view.windows(2).all(|w| w[0].index < w[1].index));
        }
    }

    #[test]
    fn any_t_colluding_servers_miss_a_slot() {
        let mut rng = init_testing();
        let rss = ReplicatedSecretSharing::new(4, 1, 101).unwrap();
        let (share_list, views) = rss.split(1, &mut rng).unwrap();

        for colluders in (0..4usize).combinations(1) {
            let held: HashSet<usize> = colluders
                .iter()
                .flat_map(|&s| views[s].iter().map(|share| share.index))
                .collect();
            assert!(held.len() < share_list.len());
        }

        // The same holds for the larger scheme, for every pair.
        let rss = ReplicatedSecretSharing::new(7, 2, 101).unwrap();
        let (share_list, views) = rss.split(1, &mut rng).unwrap();
        for colluders in (0..7usize).combinations(2) {
            let held: HashSet<usize> = colluders
                .iter()
                .flat_map(|&s| views[s].iter().map(|share| share.index))
                .collect();
            assert!(held.len() < share_list.len());
        }
    }

    #[test]
    fn subsets_are_lexicographic() {
        let rss = ReplicatedSecretSharing::new(4, 1, 101).unwrap();
        assert_eq!(rss.subsets, vec![vec![0], vec![1], vec![2], vec![3]]);
        let rss = ReplicatedSecretSharing::new(7, 2, 101).unwrap();
        assert_eq!(rss.subsets[0], vec![0, 1]);
        assert_eq!(rss.subsets[1], vec![0, 2]);
        assert_eq!(rss.subsets[20], vec![5, 6]);
    }

    #[test]
    fn constructor_preconditions() {
        assert_eq!(
            ReplicatedSecretSharing::new(3, 1, 101).unwrap_err(),
            ProofError::Config("n_server cannot be less than 3t+1")
        );
        assert_eq!(
            ReplicatedSecretSharing::new(4, 0, 101).unwrap_err(),
            ProofError::Config("t cannot be less than 1")
        );
        assert_eq!(
            ReplicatedSecretSharing::new(4, 1, 15).unwrap_err(),
            ProofError::Config("q must be a prime number")
        );
    }
}
