//! Finite-field and word rotation helpers for the block cipher.
//!
//! AES arithmetic works over GF(2^8) with the reduction polynomial
//! `x^8 + x^4 + x^3 + x + 1` (0x11B).

/// Low byte of the AES reduction polynomial, XORed in on overflow.
const REDUCTION: u8 = 0x1B;

/// Multiplies two elements of GF(2^8).
///
/// Carry-less multiply-and-reduce: for each set bit of `b`, accumulate `a`,
/// then double `a`, reducing by 0x1B when its top bit overflows.
///
/// # Parameters
/// - `a`: First factor.
/// - `b`: Second factor.
///
/// # Returns
/// The product `a · b` in GF(2^8).
pub(crate) fn galois_multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while a != 0 && b != 0 {
        if b & 0x01 != 0 {
            product ^= a;
        }
        b >>= 1;
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= REDUCTION;
        }
    }
    product
}

/// Rotates a 4-byte word left by one byte: `[a, b, c, d]` → `[b, c, d, a]`.
pub(crate) fn rotate_word_left(word: &mut [u8]) {
    word.rotate_left(1);
}

/// Rotates a 4-byte word right by one byte: `[a, b, c, d]` → `[d, a, b, c]`.
pub(crate) fn rotate_word_right(word: &mut [u8]) {
    word.rotate_right(1);
}
