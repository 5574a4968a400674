// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Lagrange interpolation with memoized per-sample-set constants.
//!
//! Evaluating a polynomial given as `(x, y)` sample pairs at a target `x`
//! costs two products per sample point once the Lagrange constants are
//! known. An [`Interpolator`] is bound to one sample-point set for its
//! whole lifetime, which lets it split the constants into
//!
//! * denominators `D_i = prod_{j != i} (x_j - x_i)^-1`, which depend only
//!   on the sample set and are computed once, and
//! * numerators `N_{x,i} = (prod_j (x_j - x)) * (x_i - x)^-1`, which are
//!   cached per target `x`.
//!
//! The caches are append-only and safe to share across worker threads: the
//! denominators sit behind a `OnceCell`, the numerators behind an `RwLock`.
//! Interpolators are owned by a single prover instance and never shared
//! between instances.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::OnceCell;
use tracing::error;

use crate::errors::{ProofError, Result};
use crate::field;

#[derive(Debug)]
pub(crate) struct Interpolator {
    x_samples: Vec<u64>,
    q: u64,
    denominators: OnceCell<Vec<u64>>,
    numerators: RwLock<HashMap<u64, Vec<u64>>>,
}

impl Interpolator {
    /// Bind an interpolator to a fixed set of sample x-coordinates, each
    /// reduced into `[0, q)`.
    pub(crate) fn new(x_samples: Vec<u64>, q: u64) -> Self {
        Self {
            x_samples,
            q,
            denominators: OnceCell::new(),
            numerators: RwLock::new(HashMap::new()),
        }
    }

    /// Evaluate the polynomial through `(x_samples, y_samples)` at `x`.
    ///
    /// If `x` is itself a sample point its `y` is returned directly.
    pub(crate) fn eval(&self, y_samples: &[u64], x: u64) -> Result<u64> {
        if y_samples.len() != self.x_samples.len() {
            error!(
                expected = self.x_samples.len(),
                got = y_samples.len(),
                "x_samples and y_samples length are different"
            );
            return Err(ProofError::Input(
                "x_samples and y_samples length are different",
            ));
        }

        if let Some(pos) = self.x_samples.iter().position(|&xs| xs == x) {
            return Ok(y_samples[pos] % self.q);
        }

        let denominators = self.denominators()?;
        let numerators = self.numerators_for(x)?;

        let mut y = 0u64;
        for (i, &yi) in y_samples.iter().enumerate() {
            let term = field::mul_mod(field::mul_mod(yi, denominators[i], self.q), numerators[i], self.q);
            y = field::add_mod(y, term, self.q);
        }
        Ok(y)
    }

    fn denominators(&self) -> Result<&[u64]> {
        self.denominators
            .get_or_try_init(|| {
                let q = self.q;
                let mut constants = Vec::with_capacity(self.x_samples.len());
                for (i, &xi) in self.x_samples.iter().enumerate() {
                    let mut denom = 1u64;
                    for (j, &xj) in self.x_samples.iter().enumerate() {
                        if j != i {
                            denom = field::mul_mod(denom, field::reduce(xj as i128 - xi as i128, q), q);
                        }
                    }
                    constants.push(field::inverse(denom as i128, q)?);
                }
                Ok(constants)
            })
            .map(Vec::as_slice)
    }

    fn numerators_for(&self, x: u64) -> Result<Vec<u64>> {
        if let Some(cached) = self.numerators.read().expect("lock poisoned").get(&x) {
            return Ok(cached.clone());
        }

        let q = self.q;
        let mut num = 1u64;
        for &xj in &self.x_samples {
            // The caller already matched x against the sample set, so the
            // product cannot vanish unless the sample set is inconsistent.
            if xj == x {
                error!("target x collides with a sample point; numerator would vanish");
                return Err(ProofError::InternalInvariant(
                    "interpolation target equals a sample point",
                ));
            }
            num = field::mul_mod(num, field::reduce(xj as i128 - x as i128, q), q);
        }

        let mut constants = Vec::with_capacity(self.x_samples.len());
        for &xi in &self.x_samples {
            let inv = field::inverse(xi as i128 - x as i128, q)?;
            constants.push(field::mul_mod(inv, num, q));
        }

        let mut cache = self.numerators.write().expect("lock poisoned");
        let entry = cache.entry(x).or_insert(constants);
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::reduce;

    // Samples of p(x) = 3x^2 + 2x + 5 over Z_101.
    fn poly(x: i128) -> u64 {
        reduce(3 * x * x + 2 * x + 5, 101)
    }

    fn samples() -> (Vec<u64>, Vec<u64>) {
        let xs: Vec<i128> = vec![-1, -2, -3];
        let x_samples: Vec<u64> = xs.iter().map(|&x| reduce(x, 101)).collect();
        let y_samples: Vec<u64> = xs.iter().map(|&x| poly(x)).collect();
        (x_samples, y_samples)
    }

    #[test]
    fn evaluates_a_known_polynomial() {
        let (x_samples, y_samples) = samples();
        let interp = Interpolator::new(x_samples, 101);
        for x in 1..20i128 {
            assert_eq!(interp.eval(&y_samples, reduce(x, 101)).unwrap(), poly(x));
        }
    }

    #[test]
    fn sample_hit_returns_the_sample() {
        let (x_samples, y_samples) = samples();
        let interp = Interpolator::new(x_samples.clone(), 101);
        for (x, y) in x_samples.iter().zip(&y_samples) {
            assert_eq!(interp.eval(&y_samples, *x).unwrap(), *y);
        }
    }

    #[test]
    fn repeated_targets_reuse_the_cache() {
        let (x_samples, y_samples) = samples();
        let interp = Interpolator::new(x_samples, 101);
        let first = interp.eval(&y_samples, 7).unwrap();
        // Second evaluation goes through the cached numerators.
        assert_eq!(interp.eval(&y_samples, 7).unwrap(), first);
        assert_eq!(interp.numerators.read().unwrap().len(), 1);
    }

    #[test]
    fn one_interpolator_serves_many_polynomials() {
        let (x_samples, _) = samples();
        let interp = Interpolator::new(x_samples, 101);
        // q(x) = x + 1 through the same sample points.
        let ys: Vec<u64> = [-1i128, -2, -3].iter().map(|&x| reduce(x + 1, 101)).collect();
        assert_eq!(interp.eval(&ys, 4).unwrap(), 5);
    }

    #[test]
    fn mismatched_sample_lengths_are_rejected() {
        let (x_samples, y_samples) = samples();
        let interp = Interpolator::new(x_samples, 101);
        assert!(interp.eval(&y_samples[..2], 7).is_err());
    }
}
