//! Byte packing utilities.
//!
//! Provides the 24-bit big-endian packing used by the arithmetic coder's
//! interval values and the zero-padded 16-byte chunking used by the block
//! cipher envelope.

/// Size of one cipher block in bytes.
pub(crate) const BLOCK_LEN: usize = 16;

/// Splits a 24-bit value into three bytes, most significant first.
///
/// Bits above the low 24 are discarded.
///
/// # Parameters
/// - `value`: The value to split.
///
/// # Returns
/// `[bits 23..16, bits 15..8, bits 7..0]`.
pub(crate) fn u24_to_be_bytes(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Combines three big-endian bytes into a 24-bit value.
pub(crate) fn u24_from_be_bytes(bytes: [u8; 3]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

/// Iterates over `input` in 16-byte blocks, zero-padding the final
/// partial block.
///
/// Empty input yields no blocks, and input whose length is a multiple of
/// 16 yields no extra padding block.
///
/// # Parameters
/// - `input`: The bytes to split.
///
/// # Returns
/// An iterator of `ceil(input.len() / 16)` blocks.
pub(crate) fn padded_blocks(input: &[u8]) -> impl Iterator<Item = [u8; BLOCK_LEN]> + '_ {
    input.chunks(BLOCK_LEN).map(|chunk| {
        let mut block = [0u8; BLOCK_LEN];
        block[..chunk.len()].copy_from_slice(chunk);
        block
    })
}

/// Number of whole 16-byte blocks in `len` bytes.
pub(crate) fn whole_blocks(len: usize) -> usize {
    len / BLOCK_LEN
}
