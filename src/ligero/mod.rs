// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The proving protocol.
//!
//! A client holds `n_secret` bits destined for N computation servers. For
//! every secret the prover builds replicated shares, arranges secrets and
//! shares into the extended witness, encodes each witness row into a
//! Reed-Solomon style codeword by packed secret sharing, and commits to
//! the codeword columns in a Merkle tree. Three sublinear tests then
//! convince a verifier, given a handful of opened columns, that
//!
//! * every row is a valid codeword (code test),
//! * every secret is a bit (quadratic test), and
//! * every secret row equals the sum of its share rows (linear test).
//!
//! All challenges are derived from the transcript by Fiat-Shamir, so
//! proving is non-interactive. A second Merkle tree over the per-server
//! share views (with the row-encoding seeds) ties each server's private
//! view into the same transcript; its root and per-server paths ship in
//! the proofs. [`LigeroProver::generate_proof`] returns one [`Proof`] per
//! server, in server order.
//!
//! # Protocol flow
//!
//! ```text
//! secrets --RSS--> claims, per-server views
//!        claims --arrange--> extended witness W   (m groups of 1+n_shares rows)
//!             W --row-wise PSS--> encoded witness E
//!             E --columns + nonces--> Merkle tree, root1
//!       SHA-256(root1) --expand--> r1, r2, r3
//!     r1*E + mask, quadratic(E), linear(E) --> q_code, q_quadra, q_linear
//!  server views + row seeds --> FST tree, root2
//!  SHA-256(H1 || root2 || tests) --expand--> opened column indices
//! ```

mod proof;

pub use proof::{Claim, OpenedColumn, Proof, ServerShares};

use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use tracing::{error, info, instrument};

use crate::errors::{ProofError, Result};
use crate::field;
use crate::interpolate::Interpolator;
use crate::matrix;
use crate::merkle::MerkleTree;
use crate::prng::SeededPrng;
use crate::pss::PackedSecretSharing;
use crate::rss::ReplicatedSecretSharing;
use crate::transcript;
use crate::utils;

// Mask polynomials only need to align degrees between the test vectors and
// honest codewords, so their pseudo-random padding stream is pinned to a
// fixed, publicly known seed.
const MASK_STREAM_SEED: u64 = 1;

/// Produces the per-server proofs for one client's secret bits.
///
/// A prover instance is immutable after construction and holds no state
/// across [`generate_proof`](Self::generate_proof) calls other than its
/// interpolation caches, which are keyed by evaluation point only.
#[derive(Debug)]
pub struct LigeroProver {
    /// Number of secret bits per proof session.
    n_secret: usize,
    /// Share slots per secret, `C(n_server, t)`.
    n_shares: usize,
    /// Row groups in the witness arrangement.
    m: usize,
    /// Columns in the witness arrangement, `ceil(n_secret / m)`.
    l: usize,
    /// Number of computation servers.
    n_server: usize,
    /// Collusion threshold.
    t: usize,
    /// The prime modulus.
    q: u64,
    /// Codeword length, `6 * n_open_col + 6 * l + 1`.
    n_encode: usize,
    /// Number of columns opened per proof.
    n_open_col: usize,
    pss: PackedSecretSharing,
    rss: ReplicatedSecretSharing,
    // Interpolates transmitted code-test prefixes (sample points 1..=t+l).
    // The companion verifier extends prefixes to opened columns with this;
    // the proving path never touches it.
    code_interpolator: Interpolator,
}

impl LigeroProver {
    /// Build a prover for `n_secret` bits shared to `n_server` servers
    /// with collusion threshold `t`, witness arranged in `m` row groups,
    /// over the prime field `Z_q`, opening `n_open_col` columns.
    pub fn new(
        n_secret: usize,
        m: usize,
        n_server: usize,
        t: usize,
        q: u64,
        n_open_col: usize,
    ) -> Result<Self> {
        if m < 1 {
            return Err(ProofError::Config("m cannot be less than 1"));
        }
        if m > n_secret {
            return Err(ProofError::Config("m cannot be larger than n_secrets"));
        }
        if 3 * t + 1 > n_server {
            return Err(ProofError::Config("n_server cannot be less than 3t+1"));
        }
        if n_open_col < 1 {
            return Err(ProofError::Config("n_open cannot be less than 1"));
        }

        let n_shares = utils::binomial(n_server, t)
            .ok_or(ProofError::Config("share count per secret overflows"))?;
        let l = n_secret.div_ceil(m);
        let n_encode = 6 * n_open_col + 6 * l + 1;

        // Row seeds and column nonces are drawn *distinct* from [0, q) by
        // rejection sampling; q must leave that sampling room to finish.
        if (q as u128) <= n_encode.max(n_shares + 1) as u128 {
            return Err(ProofError::Config(
                "q is too small to draw the required distinct seeds",
            ));
        }

        let pss = PackedSecretSharing::new(n_encode, n_open_col, l, q)?;
        let rss = ReplicatedSecretSharing::new(n_server, t, q)?;
        debug_assert_eq!(rss.n_shares(), n_shares);

        let code_interpolator = Interpolator::new(
            (1..=(n_open_col + l) as i128)
                .map(|x| field::reduce(x, q))
                .collect(),
            q,
        );

        Ok(Self {
            n_secret,
            n_shares,
            m,
            l,
            n_server,
            t,
            q,
            n_encode,
            n_open_col,
            pss,
            rss,
            code_interpolator,
        })
    }

    /// Number of servers this prover produces proofs for.
    pub fn n_server(&self) -> usize {
        self.n_server
    }

    /// Share slots each secret is split into.
    pub fn n_shares(&self) -> usize {
        self.n_shares
    }

    /// Prove that `secrets` are bits, correctly shared and correctly
    /// encoded. Returns one proof per server, in server order.
    ///
    /// Any precondition violation is fatal: an error means no server
    /// receives anything.
    #[instrument(skip_all, err(Debug))]
    pub fn generate_proof<R: RngCore + CryptoRng>(
        &self,
        secrets: &[u64],
        rng: &mut R,
    ) -> Result<Vec<Proof>> {
        let (claims, party_shares) = self.preprocess(secrets, rng)?;
        let witness = self.extended_witness(&claims)?;

        let row_seeds = utils::distinct_field_elements(self.n_shares + 1, self.q, rng)?;
        let encoded = self.encode_witness(&witness, &row_seeds)?;
        let columns = matrix::transpose(&encoded);

        // Commit to the codeword columns.
        let nonces = utils::distinct_field_elements(self.n_encode, self.q, rng)?;
        let leaves = column_leaves(&columns, &nonces);
        let tree = MerkleTree::new(&leaves)?;
        let root = tree.root();

        // First challenge: one random vector per sublinear test.
        let h1 = transcript::hash_concat(&[&root]);
        let len1 = self.m * (1 + self.n_shares);
        let challenge = transcript::expand(&h1, len1 + 2 * self.m, self.q);
        let (r1, rest) = challenge.split_at(len1);
        let (r2, r3) = rest.split_at(self.m);

        let code_seeds = utils::distinct_field_elements(self.l, self.q, rng)?;
        let code_mask = self.mask_row(&code_seeds)?;
        let quadra_mask = self.mask_row(&vec![0; self.l])?;
        let linear_mask = self.mask_row(&vec![0; self.l])?;

        let q_code = self.code_test(&encoded, r1, &code_mask)?;
        let q_quadra = self.quadratic_test(&encoded, r2, &quadra_mask)?;
        let q_linear = self.linear_test(&encoded, r3, &linear_mask)?;

        // Bind every server's view and the row seeds to the transcript.
        let fst_leaves = fst_leaves(&party_shares, &row_seeds);
        let fst_tree = MerkleTree::new(&fst_leaves)?;
        let fst_root = fst_tree.root();

        // Second challenge: which columns to open.
        let h2 = transcript::hash_concat(&[
            &h1,
            &fst_root,
            &transcript::element_bytes(&q_code),
            &transcript::element_bytes(&q_quadra),
            &transcript::element_bytes(&q_linear),
        ]);
        let col_indices = transcript::expand(&h2, self.n_open_col, self.n_encode as u64);
        let opened_columns = self.open_columns(
            &tree,
            &columns,
            &col_indices,
            &nonces,
            &code_mask,
            &quadra_mask,
            &linear_mask,
        )?;

        let mut proofs = Vec::with_capacity(self.n_server);
        for (server, shares) in party_shares.into_iter().enumerate() {
            proofs.push(Proof {
                root,
                opened_columns: opened_columns.clone(),
                q_code: q_code.clone(),
                q_quadra: q_quadra.clone(),
                q_linear: q_linear.clone(),
                shares,
                row_seeds: row_seeds.clone(),
                fst_root,
                fst_path: fst_tree.proof(server)?,
            });
        }

        info!(
            n_secret = self.n_secret,
            n_server = self.n_server,
            opened = opened_columns.len(),
            "generated per-server proofs"
        );
        Ok(proofs)
    }

    /// Evaluate the codeword polynomial behind a transmitted code-test
    /// prefix at the column x-coordinate `x`.
    ///
    /// The prefix carries the codeword at x-coordinates `1..=t+l`, which
    /// pins its degree-`(t+l-1)` polynomial; the companion verifier uses
    /// this to extend the prefix to any opened column. The proving path
    /// never calls it.
    pub fn codeword_value_at(&self, prefix: &[u64], x: u64) -> Result<u64> {
        if prefix.len() != self.n_open_col + self.l {
            return Err(ProofError::Input("wrong code-test prefix length"));
        }
        self.code_interpolator
            .eval(prefix, field::reduce(x as i128, self.q))
    }

    /// Split every secret with replicated secret sharing and collect the
    /// per-server views.
    fn preprocess<R: RngCore + CryptoRng>(
        &self,
        secrets: &[u64],
        rng: &mut R,
    ) -> Result<(Vec<Claim>, Vec<ServerShares>)> {
        if secrets.is_empty() || secrets.len() != self.n_secret {
            error!(
                expected = self.n_secret,
                got = secrets.len(),
                "wrong number of secrets"
            );
            return Err(ProofError::Input("wrong number of secrets"));
        }
        if secrets.iter().any(|&s| s > 1) {
            return Err(ProofError::Input("secrets must be elements of {0, 1}"));
        }

        let mut claims = Vec::with_capacity(self.n_secret);
        let mut party_shares: Vec<ServerShares> = Vec::new();

        for (i, &secret) in secrets.iter().enumerate() {
            let (share_list, views) = self.rss.split(secret, rng)?;
            if i == 0 {
                party_shares = views
                    .iter()
                    .enumerate()
                    .map(|(server, view)| ServerShares {
                        party_index: server,
                        slot_indices: view.iter().map(|share| share.index).collect(),
                        values: Vec::with_capacity(self.n_secret),
                    })
                    .collect();
            }
            for (server, view) in views.iter().enumerate() {
                party_shares[server]
                    .values
                    .push(view.iter().map(|share| share.value).collect());
            }
            claims.push(Claim {
                secret,
                shares: share_list,
            });
        }

        Ok((claims, party_shares))
    }

    /// Arrange the claims into the extended witness: `m` row groups of
    /// `1 + n_shares` rows over `l` columns, the secret row first, claims
    /// consumed column by column within each group. Grid slots past the
    /// last claim stay zero.
    fn extended_witness(&self, claims: &[Claim]) -> Result<Vec<Vec<u64>>> {
        if claims.is_empty() {
            return Err(ProofError::InternalInvariant("no claims to arrange"));
        }
        if claims.iter().any(|c| c.shares.len() != self.n_shares) {
            error!("a claim does not carry exactly C(N, T) shares");
            return Err(ProofError::InternalInvariant(
                "claim share count is not C(N, T)",
            ));
        }

        let group = 1 + self.n_shares;
        let mut witness = vec![vec![0u64; self.l]; self.m * group];
        let mut cursor = 0usize;

        for g in 0..self.m {
            let base = g * group;
            for col in 0..self.l {
                if cursor >= claims.len() {
                    break;
                }
                let claim = &claims[cursor];
                witness[base][col] = claim.secret;
                for (slot, &share) in claim.shares.iter().enumerate() {
                    witness[base + 1 + slot][col] = share;
                }
                cursor += 1;
            }
        }

        Ok(witness)
    }

    /// Encode every witness row into an `n_encode`-point codeword.
    ///
    /// Row `i` draws its packing randomness from the stream keyed by
    /// `row_seeds[i mod (1 + n_shares)]` with nonce `i div (1 + n_shares)`,
    /// so a server holding a row's seed can re-derive its encoding. Rows
    /// are independent and encoded in parallel; the collected matrix keeps
    /// row order.
    fn encode_witness(&self, witness: &[Vec<u64>], row_seeds: &[u64]) -> Result<Vec<Vec<u64>>> {
        let group = 1 + self.n_shares;
        let row_rand: Vec<u64> = (0..witness.len())
            .map(|i| SeededPrng::new(row_seeds[i % group], (i / group) as u64).next(self.q))
            .collect();

        witness
            .par_iter()
            .zip(row_rand.par_iter())
            .map(|(row, &rand)| {
                Ok(self
                    .pss
                    .split(row, rand)?
                    .into_iter()
                    .map(|share| share.value)
                    .collect())
            })
            .collect()
    }

    /// A mask row: the codeword of an `l`-vector of mask seeds, packed
    /// with the fixed mask randomness stream.
    fn mask_row(&self, seeds: &[u64]) -> Result<Vec<u64>> {
        Ok(self
            .pss
            .split(seeds, MASK_STREAM_SEED)?
            .into_iter()
            .map(|share| share.value)
            .collect())
    }

    /// Code test: `r1 * E + code_mask`, truncated to the `t + l` entries
    /// that are transmitted.
    fn code_test(&self, encoded: &[Vec<u64>], r1: &[u64], mask: &[u64]) -> Result<Vec<u64>> {
        self.check_encoded_shape(encoded)?;
        let product = matrix::mul(&[r1.to_vec()], encoded, self.q)?;
        let masked = matrix::add(&product, &[mask.to_vec()], self.q)?;
        Ok(masked[0][..self.n_open_col + self.l].to_vec())
    }

    /// Quadratic test: for every secret row `s`,
    /// `q_quadra[c] += r2[g] * E[s][c] * (1 - E[s][c])`, then mask. On an
    /// honest witness the unmasked polynomial vanishes at the secret
    /// points, because there every secret row takes values in {0, 1}.
    fn quadratic_test(&self, encoded: &[Vec<u64>], r2: &[u64], mask: &[u64]) -> Result<Vec<u64>> {
        self.check_encoded_shape(encoded)?;
        let group = 1 + self.n_shares;
        let mut result = vec![0u64; self.n_encode];

        for (g, s) in (0..encoded.len()).step_by(group).enumerate() {
            for (c, acc) in result.iter_mut().enumerate() {
                let e = encoded[s][c];
                let one_minus = field::reduce(1 - e as i128, self.q);
                let term = field::mul_mod(field::mul_mod(r2[g], e, self.q), one_minus, self.q);
                *acc = field::add_mod(*acc, term, self.q);
            }
        }

        for (acc, &m) in result.iter_mut().zip(mask) {
            *acc = field::add_mod(*acc, m, self.q);
        }
        Ok(result)
    }

    /// Linear test: for every row group,
    /// `q_linear[c] += r3[g] * (E[s][c] - sum of the group's share rows)`,
    /// then mask. Vanishes at the secret points when replicated
    /// reconstruction holds row-wise.
    fn linear_test(&self, encoded: &[Vec<u64>], r3: &[u64], mask: &[u64]) -> Result<Vec<u64>> {
        self.check_encoded_shape(encoded)?;
        let group = 1 + self.n_shares;
        let mut result = vec![0u64; self.n_encode];

        for (g, s) in (0..encoded.len()).step_by(group).enumerate() {
            for (c, acc) in result.iter_mut().enumerate() {
                let mut share_sum = 0u64;
                for j in 1..group {
                    share_sum = field::add_mod(share_sum, encoded[s + j][c], self.q);
                }
                let delta = field::reduce(encoded[s][c] as i128 - share_sum as i128, self.q);
                *acc = field::add_mod(*acc, field::mul_mod(r3[g], delta, self.q), self.q);
            }
        }

        for (acc, &m) in result.iter_mut().zip(mask) {
            *acc = field::add_mod(*acc, m, self.q);
        }
        Ok(result)
    }

    /// Open the selected columns with their nonces, mask entries, and
    /// authentication paths. Duplicate selections are opened twice rather
    /// than deduplicated, keeping the transcript-derived order intact.
    #[allow(clippy::too_many_arguments)]
    fn open_columns(
        &self,
        tree: &MerkleTree,
        columns: &[Vec<u64>],
        col_indices: &[u64],
        nonces: &[u64],
        code_mask: &[u64],
        quadra_mask: &[u64],
        linear_mask: &[u64],
    ) -> Result<Vec<OpenedColumn>> {
        col_indices
            .par_iter()
            .map(|&raw| {
                let index = raw as usize;
                let auth_path = tree.proof(index)?;
                Ok(OpenedColumn {
                    values: columns[index].clone(),
                    index,
                    merkle_nonce: nonces[index],
                    code_mask: code_mask[index],
                    quadra_mask: quadra_mask[index],
                    linear_mask: linear_mask[index],
                    auth_path,
                })
            })
            .collect()
    }

    fn check_encoded_shape(&self, encoded: &[Vec<u64>]) -> Result<()> {
        let rows = self.m * (1 + self.n_shares);
        if encoded.len() != rows || encoded.iter().any(|r| r.len() != self.n_encode) {
            error!("encoded witness has the wrong shape");
            return Err(ProofError::InternalInvariant(
                "encoded witness has the wrong shape",
            ));
        }
        Ok(())
    }
}

/// Merkle leaf for one codeword column: the column entries followed by the
/// column nonce, serialized as 64-bit big-endian words.
fn column_leaves(columns: &[Vec<u64>], nonces: &[u64]) -> Vec<Vec<u8>> {
    columns
        .par_iter()
        .zip(nonces.par_iter())
        .map(|(column, &nonce)| {
            let mut elements = Vec::with_capacity(column.len() + 1);
            elements.extend_from_slice(column);
            elements.push(nonce);
            transcript::element_bytes(&elements)
        })
        .collect()
}

/// FST leaf for one server: all of its share values in row-major order,
/// followed by the row seed of every slot it holds.
fn fst_leaves(party_shares: &[ServerShares], row_seeds: &[u64]) -> Vec<Vec<u8>> {
    party_shares
        .iter()
        .map(|view| {
            let slots = view.slot_indices.len();
            let mut elements = Vec::with_capacity(view.values.len() * slots + slots);
            for row in &view.values {
                elements.extend_from_slice(row);
            }
            for &slot in &view.slot_indices {
                elements.push(row_seeds[slot]);
            }
            transcript::element_bytes(&elements)
        })
        .collect()
}
