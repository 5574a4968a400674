// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Packed secret sharing.
//!
//! A vector of `k` secrets is shared at once over a single polynomial of
//! degree `t + k - 1`: the polynomial takes the secret values at the
//! negative x-coordinates `-1, ..., -k` and seeded pseudo-random values at
//! `-k-1, ..., -k-t`, and the `n` shares are its evaluations at
//! `1, ..., n`. Any `t + k` shares reconstruct the secrets; any `t` reveal
//! nothing about them.
//!
//! Splitting is deterministic in `(secrets, seed)`. The randomness at the
//! padding coordinates comes from a seeded stream, so a party holding the
//! seed can re-derive the whole polynomial; the prover relies on this to
//! let each server audit its own row encodings.

use itertools::Itertools;
use tracing::error;

use crate::errors::{ProofError, Result};
use crate::field;
use crate::interpolate::Interpolator;
use crate::prng::SeededPrng;

/// One evaluation of the sharing polynomial, tagged with its x-coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PssShare {
    /// The x-coordinate the polynomial was evaluated at (1-based).
    pub index: u64,
    /// The evaluation, an element of `[0, q)`.
    pub value: u64,
}

/// Shares `k` secrets into `n` points of a degree-`(t + k - 1)` polynomial.
#[derive(Debug)]
pub struct PackedSecretSharing {
    n: usize,
    t: usize,
    k: usize,
    q: u64,
    // Bound to the split sample set {-1, ..., -(k+t)}; reconstruction uses
    // a fresh interpolator since its sample set varies per call.
    interpolator: Interpolator,
}

impl PackedSecretSharing {
    /// Build a sharing scheme for `k` secrets, `n` shares, and privacy
    /// threshold `t` over the prime field `Z_q`.
    pub fn new(n: usize, t: usize, k: usize, q: u64) -> Result<Self> {
        if t + k > n {
            return Err(ProofError::Config("n cannot be less than t+k"));
        }
        if k < 1 {
            return Err(ProofError::Config("k must be at least 1"));
        }
        if !field::is_prime(q) {
            return Err(ProofError::Config("q must be a prime number"));
        }

        let x_samples = (1..=(k + t) as i128)
            .map(|i| field::reduce(-i, q))
            .collect();

        Ok(Self {
            n,
            t,
            k,
            q,
            interpolator: Interpolator::new(x_samples, q),
        })
    }

    /// Split `secrets` into `n` shares, drawing the `t` padding values from
    /// the deterministic stream fixed by `seed`.
    pub fn split(&self, secrets: &[u64], seed: u64) -> Result<Vec<PssShare>> {
        if secrets.is_empty() {
            return Err(ProofError::Input("cannot split an empty secret"));
        }
        if secrets.len() != self.k {
            error!(expected = self.k, got = secrets.len(), "wrong secret count");
            return Err(ProofError::Input("wrong number of secrets to split"));
        }

        let mut y_samples = Vec::with_capacity(self.k + self.t);
        y_samples.extend_from_slice(secrets);
        let mut prng = SeededPrng::new(seed, 0);
        for _ in 0..self.t {
            y_samples.push(prng.next(self.q));
        }

        let mut shares = Vec::with_capacity(self.n);
        for idx in 1..=self.n as u64 {
            let value = self
                .interpolator
                .eval(&y_samples, field::reduce(idx as i128, self.q))?;
            shares.push(PssShare { index: idx, value });
        }
        Ok(shares)
    }

    /// Recover the `k` secrets from at least `t + k` shares.
    pub fn reconstruct(&self, parts: &[PssShare]) -> Result<Vec<u64>> {
        if parts.len() < self.t + self.k {
            return Err(ProofError::Input(
                "cannot reconstruct, as number of shares less than t+k",
            ));
        }
        if parts.len() > self.n {
            return Err(ProofError::Input(
                "cannot reconstruct, as number of shares more than n",
            ));
        }
        if !parts.iter().map(|p| p.index).all_unique() {
            return Err(ProofError::Input("duplicate share index"));
        }

        let x_samples: Vec<u64> = parts
            .iter()
            .map(|p| field::reduce(p.index as i128, self.q))
            .collect();
        let y_samples: Vec<u64> = parts.iter().map(|p| p.value).collect();
        let interpolator = Interpolator::new(x_samples, self.q);

        (1..=self.k as i128)
            .map(|i| interpolator.eval(&y_samples, field::reduce(-i, self.q)))
            .collect()
    }

    /// Number of secrets packed per polynomial.
    pub fn secrets_per_split(&self) -> usize {
        self.k
    }
}
