// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! A Ligero-style zero-knowledge prover for secure multi-party computation
//! clients.
//!
//! A client contributes secret *bits* to an N-server computation by
//! replicated secret sharing. Before the servers accept the shares, each
//! expects a proof that the client played fair. This crate builds those
//! proofs: [`LigeroProver::generate_proof`] takes the secret bits and
//! returns one [`Proof`] per server attesting that
//!
//! 1. every secret is in {0, 1},
//! 2. the shares distributed to the servers are consistent replicated
//!    shares of those bits, and
//! 3. all shared data was correctly encoded into a linear code.
//!
//! Proofs are non-interactive: every challenge is derived from the
//! transcript with the Fiat-Shamir transform (SHA-256). Transport of the
//! proofs, persistence, and verification live in companion components;
//! their only contract with this crate is that [`Proof`] is a stable
//! serde-serializable value delivered to servers `0..N-1` in order.
//!
//! # Example
//!
//! ```
//! use ligero_smc::LigeroProver;
//! use rand::rngs::OsRng;
//!
//! # fn main() -> ligero_smc::Result<()> {
//! // 4 secret bits, arranged 2x2, for 4 servers with collusion
//! // threshold 1, over Z_101, opening 2 columns per proof.
//! let prover = LigeroProver::new(4, 2, 4, 1, 101, 2)?;
//! let proofs = prover.generate_proof(&[1, 0, 1, 0], &mut OsRng)?;
//! assert_eq!(proofs.len(), prover.n_server());
//! # Ok(())
//! # }
//! ```
//!
//! # Randomness
//!
//! All non-deterministic sampling (replicated shares, row-encoding seeds,
//! column nonces, mask seeds) draws from a caller-supplied
//! [`CryptoRng`](rand::CryptoRng). Production callers should pass
//! [`OsRng`](rand::rngs::OsRng); a seeded RNG reproduces a proof run
//! byte for byte.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod errors;
mod field;
mod interpolate;
pub mod ligero;
mod matrix;
pub mod merkle;
mod prng;
pub mod pss;
pub mod rss;
pub mod transcript;
mod utils;

pub use errors::{ProofError, Result};
pub use ligero::{Claim, LigeroProver, OpenedColumn, Proof, ServerShares};
