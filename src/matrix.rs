// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Dense matrix algebra over `Z_q`.
//!
//! The matrices involved in proof generation are small (a single row times
//! the encoded witness is the largest product), so the naive algorithms are
//! sufficient. Shapes are established by the orchestrator before these
//! helpers run; a mismatch here is a prover bug, not a caller mistake.

use tracing::error;

use crate::errors::{ProofError, Result};
use crate::field;

/// Element-wise `(a + b) mod q`.
pub(crate) fn add(a: &[Vec<u64>], b: &[Vec<u64>], q: u64) -> Result<Vec<Vec<u64>>> {
    check_same_shape(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(ra, rb)| {
            ra.iter()
                .zip(rb)
                .map(|(&x, &y)| field::add_mod(x % q, y % q, q))
                .collect()
        })
        .collect())
}

/// Element-wise `(a - b) mod q`.
pub(crate) fn sub(a: &[Vec<u64>], b: &[Vec<u64>], q: u64) -> Result<Vec<Vec<u64>>> {
    check_same_shape(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(ra, rb)| {
            ra.iter()
                .zip(rb)
                .map(|(&x, &y)| field::reduce(x as i128 - y as i128, q))
                .collect()
        })
        .collect())
}

/// Naive matrix product `(a * b) mod q`.
pub(crate) fn mul(a: &[Vec<u64>], b: &[Vec<u64>], q: u64) -> Result<Vec<Vec<u64>>> {
    if a.is_empty() || b.is_empty() || a[0].len() != b.len() {
        error!(
            "matrix product shape mismatch: {}x{} times {}x{}",
            a.len(),
            a.first().map_or(0, Vec::len),
            b.len(),
            b.first().map_or(0, Vec::len),
        );
        return Err(ProofError::InternalInvariant(
            "matrix product shape mismatch",
        ));
    }

    let cols2 = b[0].len();
    let mut result = vec![vec![0u64; cols2]; a.len()];
    for (i, row) in a.iter().enumerate() {
        for j in 0..cols2 {
            let mut acc = 0u64;
            for (k, &aik) in row.iter().enumerate() {
                acc = field::add_mod(acc, field::mul_mod(aik, b[k][j], q), q);
            }
            result[i][j] = acc;
        }
    }
    Ok(result)
}

/// Swap rows and columns.
pub(crate) fn transpose(m: &[Vec<u64>]) -> Vec<Vec<u64>> {
    if m.is_empty() {
        return Vec::new();
    }
    let cols = m[0].len();
    (0..cols)
        .map(|c| m.iter().map(|row| row[c]).collect())
        .collect()
}

fn check_same_shape(a: &[Vec<u64>], b: &[Vec<u64>]) -> Result<()> {
    let same = a.len() == b.len() && a.iter().zip(b).all(|(ra, rb)| ra.len() == rb.len());
    if !same {
        error!("element-wise matrix op on mismatched shapes");
        return Err(ProofError::InternalInvariant(
            "element-wise matrix op on mismatched shapes",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_sub_reduce_mod_q() {
        let a = vec![vec![100u64, 1], vec![50, 0]];
        let b = vec![vec![2u64, 3], vec![60, 1]];
        assert_eq!(add(&a, &b, 101).unwrap(), vec![vec![1, 4], vec![9, 1]]);
        assert_eq!(
            sub(&a, &b, 101).unwrap(),
            vec![vec![98, 99], vec![91, 100]]
        );
    }

    #[test]
    fn mul_matches_hand_computation() {
        let a = vec![vec![1u64, 2, 3]];
        let b = vec![vec![4u64, 5], vec![6, 7], vec![8, 9]];
        // [1*4+2*6+3*8, 1*5+2*7+3*9] = [40, 46]
        assert_eq!(mul(&a, &b, 101).unwrap(), vec![vec![40, 46]]);
        assert_eq!(mul(&a, &b, 7).unwrap(), vec![vec![5, 4]]);
    }

    #[test]
    fn mul_rejects_mismatched_shapes() {
        let a = vec![vec![1u64, 2]];
        let b = vec![vec![1u64]];
        assert!(mul(&a, &b, 101).is_err());
    }

    #[test]
    fn add_rejects_mismatched_shapes() {
        let a = vec![vec![1u64, 2]];
        let b = vec![vec![1u64]];
        assert!(add(&a, &b, 101).is_err());
    }

    #[test]
    fn transpose_round_trips() {
        let m = vec![vec![1u64, 2, 3], vec![4, 5, 6]];
        let t = transpose(&m);
        assert_eq!(t, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(transpose(&t), m);
    }
}
