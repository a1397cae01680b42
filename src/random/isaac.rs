//! ISAAC-derived pseudo-random word generator.
//!
//! A password-seeded variant of Bob Jenkins' ISAAC: 256 words of internal
//! state, 256 result words and three accumulators. Output is fully
//! deterministic for a given seed.

/// Words of internal state and of output per generation pass.
pub const ISAAC_WORDS: usize = 256;

/// Golden ratio constant that primes the eight mixing words.
const GOLDEN_RATIO: u32 = 0x9E37_79B9;

/// ISAAC generator state.
///
/// `rsl` holds the seed during initialisation and the generated results
/// afterwards; [`next_word`](Self::next_word) reads it in order.
pub struct Isaac {
    mm: [u32; ISAAC_WORDS],
    rsl: [u32; ISAAC_WORDS],
    aa: u32,
    bb: u32,
    cc: u32,
    pos: usize,
}

impl Isaac {
    /// Creates a generator seeded from `seed`.
    ///
    /// At most the first 256 bytes are used, stopping at the first NUL.
    /// Bytes widen into seed words as signed chars, so `0x80..=0xFF`
    /// become `0xFFFF_FF80..=0xFFFF_FFFF`.
    ///
    /// # Parameters
    /// - `seed`: Seed bytes, typically a password.
    ///
    /// # Returns
    /// A generator with its first 256 result words ready.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut state = Isaac {
            mm: [0; ISAAC_WORDS],
            rsl: Self::seed_words(seed),
            aa: 0,
            bb: 0,
            cc: 0,
            pos: 0,
        };

        let mut val = [GOLDEN_RATIO; 8];
        for _ in 0..4 {
            Self::mix(&mut val);
        }

        for i in (0..ISAAC_WORDS).step_by(8) {
            for (v, &seed_word) in val.iter_mut().zip(&state.rsl[i..i + 8]) {
                *v = v.wrapping_add(seed_word);
            }
            Self::mix(&mut val);
            state.mm[i..i + 8].copy_from_slice(&val);
        }

        for i in (0..ISAAC_WORDS).step_by(8) {
            for (v, &word) in val.iter_mut().zip(&state.mm[i..i + 8]) {
                *v = v.wrapping_add(word);
            }
            Self::mix(&mut val);
            for (word, &v) in state.mm[i..i + 8].iter_mut().zip(&val) {
                *word = word.wrapping_add(v);
            }
        }

        state.generate();
        state
    }

    /// Widens seed bytes into the initial result array.
    fn seed_words(seed: &[u8]) -> [u32; ISAAC_WORDS] {
        let mut words = [0u32; ISAAC_WORDS];
        for (slot, &byte) in words.iter_mut().zip(seed.iter().take_while(|&&b| b != 0)) {
            *slot = byte as i8 as i32 as u32;
        }
        words
    }

    /// Returns the next output word, generating a fresh pass of 256 words
    /// when the current one is used up.
    pub fn next_word(&mut self) -> u32 {
        if self.pos >= ISAAC_WORDS {
            self.generate();
        }
        let word = self.rsl[self.pos];
        self.pos += 1;
        word
    }

    /// Number of words consumed from the current generation pass.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Runs one generation pass, refilling all 256 result words.
    fn generate(&mut self) {
        self.cc = self.cc.wrapping_add(1);
        self.bb = self.bb.wrapping_add(self.cc);

        for i in 0..ISAAC_WORDS {
            let x = self.mm[i];
            match i % 4 {
                0 => self.aa ^= self.aa << 13,
                1 => self.aa ^= self.aa >> 6,
                2 => self.aa ^= self.aa << 2,
                _ => self.aa ^= self.aa >> 16,
            }
            self.aa = self.aa.wrapping_add(self.mm[(i + 128) % ISAAC_WORDS]);
            self.mm[i] = self.mm[(x >> 2) as usize % ISAAC_WORDS]
                .wrapping_add(self.aa)
                .wrapping_add(self.bb);
            self.bb = self.mm[(self.mm[i] >> 10) as usize % ISAAC_WORDS].wrapping_add(x);
            self.rsl[i] = self.bb;
        }
        self.pos = 0;
    }

    /// Scrambles the eight working words (shifts and additions).
    fn mix(v: &mut [u32; 8]) {
        v[0] ^= v[1] << 11;
        v[3] = v[3].wrapping_add(v[0]);
        v[1] = v[1].wrapping_add(v[2]);
        v[1] ^= v[2] >> 2;
        v[4] = v[4].wrapping_add(v[1]);
        v[2] = v[2].wrapping_add(v[3]);
        v[2] ^= v[3] << 8;
        v[5] = v[5].wrapping_add(v[2]);
        v[3] = v[3].wrapping_add(v[4]);
        v[3] ^= v[4] >> 16;
        v[6] = v[6].wrapping_add(v[3]);
        v[4] = v[4].wrapping_add(v[5]);
        v[4] ^= v[5] << 10;
        v[7] = v[7].wrapping_add(v[4]);
        v[5] = v[5].wrapping_add(v[6]);
        v[5] ^= v[6] >> 4;
        v[0] = v[0].wrapping_add(v[5]);
        v[6] = v[6].wrapping_add(v[7]);
        v[6] ^= v[7] << 8;
        v[1] = v[1].wrapping_add(v[6]);
        v[7] = v[7].wrapping_add(v[0]);
        v[7] ^= v[0] >> 9;
        v[2] = v[2].wrapping_add(v[7]);
        v[0] = v[0].wrapping_add(v[1]);
    }
}

impl Drop for Isaac {
    /// Clears generator state derived from the seed.
    fn drop(&mut self) {
        self.mm.fill(0);
        self.rsl.fill(0);
        self.aa = 0;
        self.bb = 0;
        self.cc = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_words(seed: &[u8], n: usize) -> Vec<u32> {
        let mut rng = Isaac::from_seed(seed);
        (0..n).map(|_| rng.next_word()).collect()
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        assert_eq!(first_words(b"password", 64), first_words(b"password", 64));
    }

    #[test]
    fn test_different_seeds_diverge_in_first_word() {
        let a = first_words(b"correct-password", 1);
        let b = first_words(b"wrong-password", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seed_stops_at_nul() {
        assert_eq!(first_words(b"abc\0def", 16), first_words(b"abc", 16));
    }

    #[test]
    fn test_seed_uses_at_most_256_bytes() {
        let mut long = vec![b'x'; 256];
        let base = first_words(&long, 8);
        long.extend_from_slice(b"ignored tail");
        assert_eq!(first_words(&long, 8), base);
    }

    #[test]
    fn test_high_bytes_sign_extend() {
        let words = Isaac::seed_words(&[0x41, 0x7F, 0x80, 0xFF]);
        assert_eq!(&words[..5], &[0x41, 0x7F, 0xFFFF_FF80, 0xFFFF_FFFF, 0]);
    }

    #[test]
    fn test_empty_seed_is_valid() {
        let words = first_words(b"", 4);
        assert_eq!(words, first_words(&[0u8; 8], 4));
    }

    #[test]
    fn test_position_advances() {
        let mut rng = Isaac::from_seed(b"seed");
        assert_eq!(rng.position(), 0);
        for _ in 0..32 {
            rng.next_word();
        }
        assert_eq!(rng.position(), 32);
    }

    #[test]
    fn test_regenerates_after_256_words() {
        let mut rng = Isaac::from_seed(b"seed");
        let first_pass: Vec<u32> = (0..ISAAC_WORDS).map(|_| rng.next_word()).collect();
        let next = rng.next_word();
        assert_eq!(rng.position(), 1);
        // A second pass is not a replay of the first.
        assert_ne!(next, first_pass[0]);
    }
}
