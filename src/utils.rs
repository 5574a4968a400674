// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use rand::{CryptoRng, Rng, RngCore};
use tracing::error;

use crate::errors::{ProofError, Result};

/// Maximum number of rejection-sampling attempts per drawn value before we
/// declare the random source broken.
pub(crate) const CRYPTOGRAPHIC_RETRY_MAX: usize = 500;

/// `C(n, k)`, or `None` when the count overflows `usize`.
pub(crate) fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.checked_mul((n - i) as u128)? / (i + 1) as u128;
    }
    usize::try_from(acc).ok()
}

/// Draw `count` *distinct* field elements uniformly from `[0, q)`.
///
/// Distinctness is enforced by rejection sampling, so the caller must have
/// checked `count <= q`; each draw is capped at
/// [`CRYPTOGRAPHIC_RETRY_MAX`] attempts.
pub(crate) fn distinct_field_elements<R: RngCore + CryptoRng>(
    count: usize,
    q: u64,
    rng: &mut R,
) -> Result<Vec<u64>> {
    let mut drawn = Vec::with_capacity(count);
    for _ in 0..count {
        let fresh = std::iter::repeat_with(|| rng.gen_range(0..q))
            .take(CRYPTOGRAPHIC_RETRY_MAX)
            .find(|candidate| !drawn.contains(candidate))
            .ok_or_else(|| {
                error!(count, q, "rejection sampling exhausted its retry limit");
                ProofError::Crypto("could not sample distinct field elements")
            })?;
        drawn.push(fresh);
    }
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::init_testing;
    use std::collections::HashSet;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(4, 1), Some(4));
        assert_eq!(binomial(4, 2), Some(6));
        assert_eq!(binomial(7, 2), Some(21));
        assert_eq!(binomial(10, 10), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
        assert_eq!(binomial(0, 0), Some(1));
    }

    #[test]
    fn distinct_sampling_yields_distinct_bounded_values() {
        let mut rng = init_testing();
        let drawn = distinct_field_elements(50, 101, &mut rng).unwrap();
        assert_eq!(drawn.len(), 50);
        assert!(drawn.iter().all(|&v| v < 101));
        let unique: HashSet<u64> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn sampling_the_whole_field_still_terminates() {
        // q = 2 and count = 2 forces the sampler to reject until it has
        // seen both field elements.
        let mut rng = init_testing();
        let mut drawn = distinct_field_elements(2, 2, &mut rng).unwrap();
        drawn.sort_unstable();
        assert_eq!(drawn, vec![0, 1]);
    }
}

////////////////////////////
// Test Utility Functions //
////////////////////////////

/// Returns an rng to be used for testing. This will print the rng seed
/// to stderr so that if a test fails, the failing seed can be recovered
/// and used for debugging.
#[cfg(test)]
pub(crate) mod testing {
    use rand::{
        rngs::{OsRng, StdRng},
        Rng, SeedableRng,
    };
    use tracing_subscriber::{
        filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    };

    /// Initialize any fields necessary for our tests. This should be called
    /// at the top of all our tests. This function is idempotent.
    ///
    /// This will print the rng seed to stderr so that if a test fails, the
    /// failing seed can be recovered and used for debugging.
    pub(crate) fn init_testing() -> StdRng {
        let mut seeder = OsRng;
        let seed = seeder.gen();
        eprintln!(
            "To re-run test with the same randomness, use init_testing_with_seed() with the following seed:"
        );
        eprintln!("\t{seed:?}");
        StdRng::from_seed(seed)
    }

    /// A seeded version of [`init_testing`]. This function can be used when
    /// a test fails unexpectedly, and you want to reproduce the run using a
    /// specific RNG seed.
    ///
    /// **Additionally, turns on logging by default.**
    ///
    /// This function should only be called when debugging. Avoid calling as
    /// part of a normal unit test execution, as it turns on logging for all
    /// tests and error-path tests deliberately trigger logging events.
    #[allow(unused)]
    pub(crate) fn init_testing_with_seed(seed: [u8; 32]) -> StdRng {
        let logging_level = EnvFilter::from_default_env()
            .max_level_hint()
            .unwrap()
            .into_level()
            .unwrap();

        // Only capture logging events from this crate.
        let targets = Targets::new().with_target("ligero_smc", logging_level);
        let stdout_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_filter(targets);

        // It's okay if this fails. It just means logging has already been
        // set up for this thread.
        let _ = tracing_subscriber::registry().with(stdout_layer).try_init();

        // Return RNG
        StdRng::from_seed(seed)
    }
}
