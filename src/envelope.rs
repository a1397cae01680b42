//! AES file envelope.
//!
//! Layout:
//!
//! ```text
//! AA EE 17 | 16-byte verification block | 16-byte ciphertext blocks...
//! ```
//!
//! The key and the verification block are the first 32 bytes of the
//! password keystream. On decrypt the verification block is recomputed and
//! compared before any ciphertext is touched, so a wrong password is
//! reported instead of producing garbage. The final block is zero-padded
//! and no length is stored.

use tracing::{debug, warn};

use crate::aes::{Aes128, BLOCK_SIZE, KEY_SIZE};
use crate::error::{CodecError, Result};
use crate::random::keystream::{KeyStream, PasswordStream};
use crate::utils::buffer::try_with_capacity;
use crate::utils::converter::{padded_blocks, whole_blocks};

/// Magic bytes opening an encrypted file.
pub const AES_MAGIC: [u8; 3] = [0xAA, 0xEE, 0x17];

/// Length of the password verification block.
pub const VERIFICATION_LEN: usize = 16;

/// Offset of the first ciphertext block.
pub const HEADER_LEN: usize = AES_MAGIC.len() + VERIFICATION_LEN;

/// Key and verification block derived from one keystream.
pub struct KeyMaterial {
    key: [u8; KEY_SIZE],
    verification: [u8; VERIFICATION_LEN],
}

impl KeyMaterial {
    /// Derives key material from a password.
    ///
    /// # Examples
    ///
    /// ```
    /// use braidcodec::envelope::KeyMaterial;
    ///
    /// let a = KeyMaterial::derive("secret");
    /// let b = KeyMaterial::derive("secret");
    /// assert_eq!(a.verification(), b.verification());
    /// ```
    pub fn derive(password: &str) -> Self {
        Self::from_stream(&mut PasswordStream::new(password))
    }

    /// Pulls the key, then the verification block, from `stream`.
    pub fn from_stream<S: KeyStream + ?Sized>(stream: &mut S) -> Self {
        let key = stream.next_block();
        let verification = stream.next_block();
        KeyMaterial { key, verification }
    }

    /// The verification block stored after the magic header.
    pub fn verification(&self) -> &[u8; VERIFICATION_LEN] {
        &self.verification
    }

    /// Compares `stored` against the verification block without exiting
    /// early on the first differing byte.
    fn verifies(&self, stored: &[u8]) -> bool {
        stored.len() == VERIFICATION_LEN
            && stored
                .iter()
                .zip(&self.verification)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl Drop for KeyMaterial {
    /// Clears the key and verification block on drop.
    fn drop(&mut self) {
        self.key.fill(0);
        self.verification.fill(0);
    }
}

/// Returns `true` if `bytes` opens with the AES magic header.
pub fn is_encrypted(bytes: &[u8]) -> bool {
    bytes.starts_with(&AES_MAGIC)
}

/// Encrypts `plain` into a complete envelope.
///
/// The final partial block is zero-padded; empty input produces a header
/// with no blocks.
///
/// # Errors
/// Returns [`CodecError::AllocationFailure`] if the output buffer cannot be
/// allocated.
pub fn encrypt(plain: &[u8], keys: &KeyMaterial) -> Result<Vec<u8>> {
    let block_count = plain.len().div_ceil(BLOCK_SIZE);
    let mut out = try_with_capacity(HEADER_LEN + block_count * BLOCK_SIZE)?;
    out.extend_from_slice(&AES_MAGIC);
    out.extend_from_slice(&keys.verification);

    let cipher = Aes128::new(&keys.key);
    for block in padded_blocks(plain) {
        out.extend_from_slice(&cipher.encrypt_block(&block));
    }

    debug!(
        plain_bytes = plain.len(),
        blocks = block_count,
        "encrypted envelope"
    );
    Ok(out)
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// The result keeps the final block's zero padding.
///
/// # Errors
/// - [`CodecError::FormatMismatch`] if the magic header is absent.
/// - [`CodecError::StreamTooShort`] if `file` is shorter than the header.
/// - [`CodecError::WrongPassword`] if the verification block differs.
pub fn decrypt(file: &[u8], keys: &KeyMaterial) -> Result<Vec<u8>> {
    if !is_encrypted(file) {
        return Err(CodecError::FormatMismatch { expected: "AES" });
    }
    if file.len() < HEADER_LEN {
        return Err(CodecError::StreamTooShort {
            stage: "AES",
            len: file.len(),
            min: HEADER_LEN,
        });
    }
    if !keys.verifies(&file[AES_MAGIC.len()..HEADER_LEN]) {
        warn!("password verification failed");
        return Err(CodecError::WrongPassword);
    }

    let body = &file[HEADER_LEN..];
    let block_count = whole_blocks(body.len());
    let trailing = body.len() - block_count * BLOCK_SIZE;
    if trailing != 0 {
        warn!(trailing, "ignoring bytes after the last whole block");
    }

    let cipher = Aes128::new(&keys.key);
    let mut out = try_with_capacity(block_count * BLOCK_SIZE)?;
    for chunk in body.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        out.extend_from_slice(&cipher.decrypt_block(&block));
    }

    debug!(blocks = block_count, "decrypted envelope");
    Ok(out)
}

/// Removes the zero padding of the final block.
///
/// Strips at most `BLOCK_SIZE - 1` trailing zero bytes, and only from a
/// buffer whose length is a whole number of blocks. Plaintext that itself
/// ended in zero bytes loses them; with the compression stage present this
/// is never needed, since the DMC stream carries its own end marker.
pub fn strip_padding(buf: &mut Vec<u8>) {
    if buf.is_empty() || !buf.len().is_multiple_of(BLOCK_SIZE) {
        return;
    }
    let zeros = buf
        .iter()
        .rev()
        .take(BLOCK_SIZE - 1)
        .take_while(|&&b| b == 0)
        .count();
    buf.truncate(buf.len() - zeros);
}
