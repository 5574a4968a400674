// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Error types for the prover.
//!
//! Everything fallible in this crate returns [`Result`]. Errors are not
//! recoverable inside the core: they bubble up to the
//! [`generate_proof`](crate::ligero::LigeroProver::generate_proof) caller,
//! which decides how to surface them (typically by aborting the client
//! round). No code path retries internally.

use thiserror::Error;

/// The set of errors the prover can produce.
///
/// The four variants are deliberately coarse: they tell the calling
/// application *whose* fault a failure is, not how to fix it. Details go to
/// the log at the point of detection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A constructor precondition on the prover parameters was violated.
    #[error("invalid configuration: {0}")]
    Config(&'static str),

    /// The caller handed the prover malformed input (wrong secret count,
    /// values outside {0, 1}, malformed shares).
    #[error("invalid input: {0}")]
    Input(&'static str),

    /// The random source or hash backend failed. With a healthy OS RNG this
    /// should never fire.
    #[error("cryptographic backend failure: {0}")]
    Crypto(&'static str),

    /// An internal consistency check failed. This is a bug in the prover,
    /// not a caller mistake.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ProofError>;
