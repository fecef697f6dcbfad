//! Small, dependency-light [Shamir's Secret Sharing](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing)
//! library crate over the prime field GF(65809).
//!
//! Every byte of the secret is shared independently: it becomes the constant term of a random
//! polynomial of degree `k - 1`, evaluated at `x = 1..=n`. Any `k` of the resulting shares
//! recover the byte by solving the Vandermonde system of their evaluations; fewer reveal
//! nothing about it.
//!
//! # Usage
//! ## (std)
//!
//! ```
//! use prime_sss::SecretSharing;
//!
//! // 5 shares, any 3 of which recover the secret
//! let sss = SecretSharing::new(5, 3).unwrap();
//! let shares = sss.encode(&[1, 2, 3, 4]).unwrap();
//! assert_eq!(shares.len(), 5);
//! // Recover the original secret from shares 1, 3 and 5
//! let subset = [shares[0].clone(), shares[2].clone(), shares[4].clone()];
//! let secret = sss.decode(&subset).unwrap();
//! assert_eq!(secret, vec![1, 2, 3, 4]);
//! ```
//!
//! ## (no std)
//!
//! ```
//! use prime_sss::SecretSharing;
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let sss = SecretSharing::new(4, 2).unwrap();
//! let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
//! let shares = sss.encode_with(&[0, 128, 255], &mut rng).unwrap();
//! let secret = sss.decode(&shares[2..]).unwrap();
//! assert_eq!(secret, vec![0, 128, 255]);
//! ```
//!
//! # Randomness
//!
//! Non-constant coefficients are drawn from a [`ByteSource`], which every `rand::RngCore`
//! implements. [`SecretSharing::encode`] uses `rand::thread_rng`; pick a cryptographically secure
//! generator when calling [`SecretSharing::encode_with`] yourself.
//!
//! # Feature flags
//!
//! - `std` (default) — enables `encode`/`encode_bytes` (thread RNG) and the [`io`] module.
//! - `zeroize_memory` (default) — clears shares and intermediate coefficients from memory.
//! - `fuzzing` — derives `arbitrary::Arbitrary` for [`Share`] and [`Fp`].
//! - `cli` — builds the `prime-sss` command line tool.
//!
//! Serialization format (see [`Share`]): a 4-byte little-endian index followed by one
//! 4-byte little-endian field element per secret byte.
//!
//! API notes:
//! - [`SecretSharing::decode`] knows the threshold and refuses to run with fewer than `k`
//!   distinct shares; extra shares are ignored.
//! - [`recover`] is for callers that do not know `k`: it solves with however many shares it
//!   is given. Any `k` or more distinct shares recover the secret; fewer yield a wrong one.
#![cfg_attr(not(feature = "std"), no_std)]

mod error;
mod field;
mod math;
mod random;
mod share;

#[cfg(feature = "std")]
pub mod io;

extern crate alloc;

use alloc::vec::Vec;
use hashbrown::HashMap;
use log::{debug, warn};

pub use error::Error;
pub use field::{Fp, MUL_SAFE_THRESHOLD, PRIME};
pub use random::ByteSource;
pub use share::{Share, WORD_LEN};

/// Sharing parameters: `n` shares are produced, any `k` of them recover the secret.
///
/// Usage example:
/// ```
/// # use prime_sss::{SecretSharing, Error};
/// let sss = SecretSharing::new(5, 3).unwrap();
/// assert_eq!((sss.shares(), sss.threshold()), (5, 3));
///
/// // The threshold can not exceed the number of shares
/// assert!(matches!(SecretSharing::new(2, 3), Err(Error::InvalidParameters { .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSharing {
    n: u32,
    k: u32,
}

impl SecretSharing {
    /// Validates `1 <= k <= n < PRIME`.
    pub fn new(n: u32, k: u32) -> Result<Self, Error> {
        math::check_parameters(n, k)?;
        Ok(SecretSharing { n, k })
    }

    /// Number of shares produced by each encode.
    pub fn shares(&self) -> u32 {
        self.n
    }

    /// Minimum number of shares needed to decode.
    pub fn threshold(&self) -> u32 {
        self.k
    }

    /// This method is useful when `std` is not available. For typical usage
    /// see the `encode` method.
    ///
    /// Splits `secret` into `n` shares, the i-th carrying index `i + 1`.
    /// Random coefficients come from `source`.
    ///
    /// Example:
    /// ```
    /// # use prime_sss::SecretSharing;
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    /// let sss = SecretSharing::new(3, 2).unwrap();
    /// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
    /// let shares = sss.encode_with(&[1, 2], &mut rng).unwrap();
    /// assert_eq!(shares.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn encode_with<S: ByteSource + ?Sized>(
        &self,
        secret: &[u8],
        source: &mut S,
    ) -> Result<Vec<Share>, Error> {
        debug!(
            "encoding {} byte secret into {} shares, threshold {}",
            secret.len(),
            self.n,
            self.k
        );

        let mut shares: Vec<Share> = (1..=self.n)
            .map(|index| Share {
                index,
                values: Vec::with_capacity(secret.len()),
            })
            .collect();

        for byte in secret {
            let values = math::generate_shares(*byte as u32, self.n, self.k, source)?;
            for (share, value) in shares.iter_mut().zip(values) {
                share.values.push(value);
            }
        }

        Ok(shares)
    }

    /// Splits `secret` into `n` shares using the thread-local random generator.
    ///
    /// Example:
    /// ```
    /// # use prime_sss::SecretSharing;
    /// let sss = SecretSharing::new(4, 4).unwrap();
    /// let shares = sss.encode(b"hello").unwrap();
    /// assert!(shares.iter().all(|s| s.secret_len() == 5));
    /// ```
    #[cfg(feature = "std")]
    pub fn encode(&self, secret: &[u8]) -> Result<Vec<Share>, Error> {
        let mut rng = rand::thread_rng();
        self.encode_with(secret, &mut rng)
    }

    /// Like [`encode_with`](Self::encode_with), but returns the serialized share buffers.
    pub fn encode_bytes_with<S: ByteSource + ?Sized>(
        &self,
        secret: &[u8],
        source: &mut S,
    ) -> Result<Vec<Vec<u8>>, Error> {
        let shares = self.encode_with(secret, source)?;
        Ok(shares.iter().map(Vec::from).collect())
    }

    /// Like [`encode`](Self::encode), but returns the serialized share buffers.
    #[cfg(feature = "std")]
    pub fn encode_bytes(&self, secret: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let mut rng = rand::thread_rng();
        self.encode_bytes_with(secret, &mut rng)
    }

    /// Given a collection of shares, recovers the original secret.
    /// If the number of distinct shares is less than the threshold an `Err` is returned,
    /// otherwise an `Ok` containing the secret. Only the first `k` distinct shares are used.
    ///
    /// Example:
    /// ```
    /// # use prime_sss::{SecretSharing, Error};
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    /// # let sss = SecretSharing::new(5, 3).unwrap();
    /// # let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
    /// let mut shares = sss.encode_with(&[65], &mut rng).unwrap();
    /// // Secret correctly recovered
    /// assert_eq!(sss.decode(&shares).unwrap(), vec![65]);
    /// // Not enough shares to recover secret
    /// shares.truncate(2);
    /// assert!(matches!(sss.decode(&shares), Err(Error::NotEnoughShares { .. })));
    /// ```
    pub fn decode(&self, shares: &[Share]) -> Result<Vec<u8>, Error> {
        let distinct = distinct_shares(shares)?;
        let required = self.k as usize;

        if distinct.len() < required {
            return Err(Error::NotEnoughShares {
                required,
                provided: distinct.len(),
            });
        }

        debug!(
            "decoding {} byte secret from {} of {} shares",
            distinct[0].secret_len(),
            required,
            shares.len()
        );
        interpolate(&distinct[..required])
    }

    /// Like [`decode`](Self::decode), but takes serialized share buffers. Buffers of unequal
    /// length are rejected before any of them is parsed.
    pub fn decode_bytes<B: AsRef<[u8]>>(&self, shares: &[B]) -> Result<Vec<u8>, Error> {
        self.decode(&parse_shares(shares)?)
    }
}

/// Recovers a secret using every supplied share as one equation.
///
/// The share format does not record the threshold, so this cannot check that enough shares were
/// supplied. With `k` or more distinct shares the higher coefficients solve to zero and the
/// secret comes out exact; fewer than `k` produce a wrong secret rather than an error. Prefer
/// [`SecretSharing::decode`] whenever `k` is known.
///
/// Example:
/// ```
/// # use prime_sss::{recover, SecretSharing};
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// let sss = SecretSharing::new(4, 2).unwrap();
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = sss.encode_with(&[0, 128, 255], &mut rng).unwrap();
/// assert_eq!(recover(&shares[1..3]).unwrap(), vec![0, 128, 255]);
/// ```
pub fn recover(shares: &[Share]) -> Result<Vec<u8>, Error> {
    let distinct = distinct_shares(shares)?;
    warn!(
        "recovering from {} shares without a known threshold",
        distinct.len()
    );
    interpolate(&distinct)
}

/// Like [`recover`], but takes serialized share buffers.
pub fn recover_bytes<B: AsRef<[u8]>>(shares: &[B]) -> Result<Vec<u8>, Error> {
    recover(&parse_shares(shares)?)
}

fn parse_shares<B: AsRef<[u8]>>(buffers: &[B]) -> Result<Vec<Share>, Error> {
    let expected = buffers.first().ok_or(Error::NoShares)?.as_ref().len();

    if let Some(found) = buffers
        .iter()
        .map(|b| b.as_ref().len())
        .find(|len| *len != expected)
    {
        return Err(Error::LengthMismatch { expected, found });
    }

    buffers
        .iter()
        .map(|b| Share::try_from(b.as_ref()))
        .collect()
}

// Checks the structure of a share set and drops exact duplicates. Two different shares
// claiming the same index are an error.
fn distinct_shares(shares: &[Share]) -> Result<Vec<&Share>, Error> {
    let expected = shares.first().ok_or(Error::NoShares)?.serialized_len();
    let mut seen: HashMap<u32, &Share> = HashMap::new();
    let mut distinct = Vec::with_capacity(shares.len());

    for share in shares {
        if share.serialized_len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                found: share.serialized_len(),
            });
        }
        if share.index == 0 || share.index >= PRIME {
            return Err(Error::MalformedShare("share index out of range"));
        }

        match seen.get(&share.index) {
            Some(other) if *other == share => continue,
            Some(_) => return Err(Error::DuplicateShare(share.index)),
            None => {
                seen.insert(share.index, share);
                distinct.push(share);
            }
        }
    }

    Ok(distinct)
}

// Solves one linear system per byte position. `shares` is non-empty and structurally checked.
fn interpolate(shares: &[&Share]) -> Result<Vec<u8>, Error> {
    let indices: Vec<Fp> = shares.iter().map(|s| Fp(s.index)).collect();
    let mut values = Vec::with_capacity(shares.len());

    (0..shares[0].secret_len())
        .map(|position| {
            values.clear();
            values.extend(shares.iter().map(|s| s.values[position]));
            // Only a wrong share set can yield an element above 255; keep its low byte.
            math::solve_constant_term(&indices, &values).map(|s| s.value() as u8)
        })
        .collect()
}
