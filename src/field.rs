// Arithmetic over the prime field GF(65809).
//
// Secret bytes (0..=255) embed directly as field elements. The prime is small
// enough that every element fits a `u32`, but not small enough that every
// product does, so `Mul` only widens to `u64` when it has to.

use core::ops::{Add, Div, Mul, Sub};

#[cfg(feature = "fuzzing")]
use arbitrary::Arbitrary;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

use crate::error::Error;

/// The field modulus.
pub const PRIME: u32 = 65809;

/// Largest `a` for which `a * (PRIME - 1)` still fits in a `u32`.
pub const MUL_SAFE_THRESHOLD: u32 = u32::MAX / (PRIME - 1);

/// An element of GF([`PRIME`]), always kept in `[0, PRIME)`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "zeroize_memory", derive(Zeroize))]
pub struct Fp(pub(crate) u32);

impl Fp {
    pub const ZERO: Fp = Fp(0);
    pub const ONE: Fp = Fp(1);

    /// Reduces `value` into the field.
    pub const fn new(value: u32) -> Self {
        Fp(value % PRIME)
    }

    /// The canonical representative in `[0, PRIME)`.
    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Square-and-multiply exponentiation.
    pub fn pow(self, mut exponent: u32) -> Self {
        let mut result = Fp::ONE;
        let mut base = self;

        while exponent != 0 {
            if exponent & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exponent >>= 1;
        }

        result
    }

    /// Multiplicative inverse via Fermat's little theorem, `a^(p-2)`.
    ///
    /// Zero has no inverse; this returns zero for it, so callers must rule
    /// that case out beforehand.
    pub fn inverse(self) -> Self {
        self.pow(PRIME - 2)
    }
}

impl From<u8> for Fp {
    fn from(byte: u8) -> Self {
        Fp(byte as u32)
    }
}

impl TryFrom<u32> for Fp {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value < PRIME {
            Ok(Fp(value))
        } else {
            Err(Error::ElementOutOfRange(value))
        }
    }
}

impl From<Fp> for u32 {
    fn from(element: Fp) -> u32 {
        element.0
    }
}

impl Add for Fp {
    type Output = Fp;

    fn add(self, other: Self) -> Self::Output {
        Fp((self.0 + other.0) % PRIME)
    }
}

impl Sub for Fp {
    type Output = Fp;

    fn sub(self, other: Self) -> Self::Output {
        Fp((self.0 + PRIME - other.0) % PRIME)
    }
}

impl Mul for Fp {
    type Output = Fp;

    fn mul(self, other: Self) -> Self::Output {
        if self.0 > MUL_SAFE_THRESHOLD || other.0 > MUL_SAFE_THRESHOLD {
            Fp(((self.0 as u64 * other.0 as u64) % PRIME as u64) as u32)
        } else {
            Fp((self.0 * other.0) % PRIME)
        }
    }
}

impl Div for Fp {
    type Output = Fp;

    fn div(self, other: Self) -> Self::Output {
        self * other.inverse()
    }
}

#[cfg(feature = "fuzzing")]
impl<'a> Arbitrary<'a> for Fp {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Fp(u.int_in_range(0..=PRIME - 1)?))
    }
}
