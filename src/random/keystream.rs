//! Password-seeded keystream for key derivation.
//!
//! A [`KeyStream`] yields a deterministic sequence of bytes. The file
//! envelope pulls the AES key and the password verification block from one
//! stream, in that order.

use super::isaac::Isaac;

/// A deterministic source of key bytes.
///
/// Implementations must return the same sequence for the same seed. The
/// envelope consumes 32 bytes per file: 16 key bytes followed by 16
/// verification bytes.
pub trait KeyStream {
    /// Returns the next byte of the stream.
    fn next_byte(&mut self) -> u8;

    /// Returns the next 16 bytes of the stream.
    fn next_block(&mut self) -> [u8; 16] {
        let mut block = [0u8; 16];
        for byte in block.iter_mut() {
            *byte = self.next_byte();
        }
        block
    }
}

/// Keystream seeded from a password string.
///
/// Each byte is the low-order byte of the next ISAAC output word.
///
/// # Examples
///
/// ```
/// use braidcodec::random::keystream::{KeyStream, PasswordStream};
///
/// let mut a = PasswordStream::new("secret");
/// let mut b = PasswordStream::new("secret");
/// assert_eq!(a.next_block(), b.next_block());
/// ```
pub struct PasswordStream {
    rng: Isaac,
    consumed: usize,
}

impl PasswordStream {
    /// Creates a fresh stream for `password`.
    ///
    /// # Parameters
    /// - `password`: The password; its UTF-8 bytes seed the generator.
    pub fn new(password: &str) -> Self {
        PasswordStream {
            rng: Isaac::from_seed(password.as_bytes()),
            consumed: 0,
        }
    }

    /// Number of bytes pulled from the stream so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Position of the underlying generator within its current pass.
    pub fn generator_position(&self) -> usize {
        self.rng.position()
    }
}

impl KeyStream for PasswordStream {
    fn next_byte(&mut self) -> u8 {
        self.consumed += 1;
        (self.rng.next_word() & 0xFF) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed byte sequence.
    struct FixedStream(std::vec::IntoIter<u8>);

    impl KeyStream for FixedStream {
        fn next_byte(&mut self) -> u8 {
            self.0.next().unwrap_or(0)
        }
    }

    #[test]
    fn test_next_block_reads_in_order() {
        let mut stream = FixedStream((0u8..32).collect::<Vec<_>>().into_iter());
        let first = stream.next_block();
        let second = stream.next_block();
        assert_eq!(first, core::array::from_fn::<u8, 16, _>(|i| i as u8));
        assert_eq!(second, core::array::from_fn::<u8, 16, _>(|i| i as u8 + 16));
    }

    #[test]
    fn test_password_stream_deterministic() {
        let mut a = PasswordStream::new("correct-password");
        let mut b = PasswordStream::new("correct-password");
        for _ in 0..64 {
            assert_eq!(a.next_byte(), b.next_byte());
        }
    }

    #[test]
    fn test_password_stream_matches_generator_low_bytes() {
        let mut stream = PasswordStream::new("pw");
        let mut rng = Isaac::from_seed(b"pw");
        for _ in 0..32 {
            assert_eq!(stream.next_byte(), rng.next_word() as u8);
        }
    }

    #[test]
    fn test_key_derivation_stays_in_first_pass() {
        let mut stream = PasswordStream::new("a fairly long password for testing");
        stream.next_block();
        stream.next_block();
        assert_eq!(stream.consumed(), 32);
        assert_eq!(stream.generator_position(), 32);
    }

    #[test]
    fn test_different_passwords_different_blocks() {
        let mut a = PasswordStream::new("correct-password");
        let mut b = PasswordStream::new("wrong-password");
        assert_ne!(a.next_block(), b.next_block());
    }
}
