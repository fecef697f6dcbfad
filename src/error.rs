//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Reasons share generation or secret recovery can fail.
///
/// Encoding either yields every share or fails with one of these; decoding
/// either yields the complete secret or fails. There is no partial result.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sharing parameters: need 1 <= k <= n < 65809, got n = {n}, k = {k}")]
    InvalidParameters { n: u32, k: u32 },
    #[error("value {0} is not a field element")]
    ElementOutOfRange(u32),
    #[error("no shares provided")]
    NoShares,
    #[error("all shares must have the same length: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("malformed share: {0}")]
    MalformedShare(&'static str),
    #[error("share index {0} supplied more than once")]
    DuplicateShare(u32),
    #[error("not enough shares to recover the secret: required {required}, provided {provided}")]
    NotEnoughShares { required: usize, provided: usize },
    #[error("share indices do not determine a unique polynomial")]
    SingularSystem,
    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
