use alloc::vec::Vec;

use super::error::Error;
use super::field::{Fp, PRIME};

#[cfg(feature = "fuzzing")]
use arbitrary::Arbitrary;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

/// Size in bytes of the index header and of every serialized field element.
pub const WORD_LEN: usize = 4;

/// A share used to reconstruct the secret. Can be serialized to and from a byte array.
///
/// Usage example:
/// ```
/// use prime_sss::{SecretSharing, Share};
/// use core::convert::TryFrom;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// # fn send_to_storage(_: Vec<u8>) {}
///
/// let sss = SecretSharing::new(5, 3).unwrap();
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = sss.encode_with(&[1, 2, 3], &mut rng).unwrap();
///
/// // Persist the share bytes
/// let bytes: Vec<Vec<u8>> = shares.iter().map(Vec::from).collect();
/// assert!(bytes.iter().all(|b| b.len() == 4 + 4 * 3));
///
/// // Read them back and recover the secret
/// let shares: Vec<Share> = bytes[2..]
///     .iter()
///     .map(|b| Share::try_from(b.as_slice()).unwrap())
///     .collect();
/// assert_eq!(sss.decode(&shares).unwrap(), vec![1, 2, 3]);
/// # bytes.into_iter().for_each(send_to_storage);
/// ```
///
/// # Serialization format:
/// A 4-byte little-endian share index followed by one 4-byte little-endian
/// field element per byte of the original secret, `4 + 4 * len` bytes in total.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
#[cfg_attr(feature = "zeroize_memory", derive(Zeroize))]
#[cfg_attr(feature = "zeroize_memory", zeroize(drop))]
pub struct Share {
    /// The 1-based evaluation point, shared by every value in the share.
    pub index: u32,
    /// One field element per byte position of the secret.
    pub values: Vec<Fp>,
}

impl Share {
    /// Length of the secret this share belongs to.
    pub fn secret_len(&self) -> usize {
        self.values.len()
    }

    /// Size of the serialized form.
    pub fn serialized_len(&self) -> usize {
        WORD_LEN * (1 + self.values.len())
    }
}

/// Converts a share to its serialized form: index header, then the values.
impl From<&Share> for Vec<u8> {
    fn from(s: &Share) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(s.serialized_len());
        bytes.extend_from_slice(&s.index.to_le_bytes());
        for value in &s.values {
            bytes.extend_from_slice(&value.value().to_le_bytes());
        }
        bytes
    }
}

fn read_word(chunk: &[u8]) -> u32 {
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(chunk);
    u32::from_le_bytes(word)
}

impl core::convert::TryFrom<&[u8]> for Share {
    type Error = Error;

    fn try_from(s: &[u8]) -> Result<Share, Self::Error> {
        if s.len() < WORD_LEN {
            return Err(Error::MalformedShare("a share must be at least 4 bytes long"));
        }
        if s.len() % WORD_LEN != 0 {
            return Err(Error::MalformedShare("share length must be a multiple of 4"));
        }

        let mut words = s.chunks_exact(WORD_LEN).map(read_word);
        let index = words.next().unwrap_or_default();
        if index == 0 || index >= PRIME {
            return Err(Error::MalformedShare("share index out of range"));
        }

        let values = words.map(Fp::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Share { index, values })
    }
}
