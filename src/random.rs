// Source of the random bytes used for non-constant polynomial coefficients.

/// Anything able to produce one random byte per call.
///
/// No cryptographic guarantee is implied by the trait itself; the strength of
/// the shares is exactly the strength of the source handed to the dealer.
/// Every [`rand::RngCore`] is a `ByteSource`.
pub trait ByteSource {
    fn random_byte(&mut self) -> u8;
}

impl<R: rand::RngCore + ?Sized> ByteSource for R {
    fn random_byte(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        self.fill_bytes(&mut byte);
        byte[0]
    }
}

/// Draws four bytes from `source` and packs them big-endian into a `u32`.
pub(crate) fn random_u32<S: ByteSource + ?Sized>(source: &mut S) -> u32 {
    let mut bytes = [0u8; 4];
    for byte in bytes.iter_mut() {
        *byte = source.random_byte();
    }
    u32::from_be_bytes(bytes)
}
