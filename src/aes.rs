//! AES-128 block cipher.
//!
//! Key schedule expansion and single-block encryption/decryption using the
//! FIPS-197 substitution-permutation rounds. The 16-byte state is a 4×4
//! row-major matrix: input byte `n` lands at row `n % 4`, column `n / 4`.

use crate::utils::bits::{galois_multiply, rotate_word_left, rotate_word_right};

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Root key size in bytes.
pub const KEY_SIZE: usize = 16;

/// Number of rounds for a 128-bit key.
pub const ROUNDS: usize = 10;

/// Size of the fully expanded key in bytes.
pub const EXPANDED_KEY_SIZE: usize = BLOCK_SIZE * (ROUNDS + 1);

#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0x63, 0x7C, 0x77, 0x7B, 0xF2, 0x6B, 0x6F, 0xC5, 0x30, 0x01, 0x67, 0x2B, 0xFE, 0xD7, 0xAB, 0x76,
    0xCA, 0x82, 0xC9, 0x7D, 0xFA, 0x59, 0x47, 0xF0, 0xAD, 0xD4, 0xA2, 0xAF, 0x9C, 0xA4, 0x72, 0xC0,
    0xB7, 0xFD, 0x93, 0x26, 0x36, 0x3F, 0xF7, 0xCC, 0x34, 0xA5, 0xE5, 0xF1, 0x71, 0xD8, 0x31, 0x15,
    0x04, 0xC7, 0x23, 0xC3, 0x18, 0x96, 0x05, 0x9A, 0x07, 0x12, 0x80, 0xE2, 0xEB, 0x27, 0xB2, 0x75,
    0x09, 0x83, 0x2C, 0x1A, 0x1B, 0x6E, 0x5A, 0xA0, 0x52, 0x3B, 0xD6, 0xB3, 0x29, 0xE3, 0x2F, 0x84,
    0x53, 0xD1, 0x00, 0xED, 0x20, 0xFC, 0xB1, 0x5B, 0x6A, 0xCB, 0xBE, 0x39, 0x4A, 0x4C, 0x58, 0xCF,
    0xD0, 0xEF, 0xAA, 0xFB, 0x43, 0x4D, 0x33, 0x85, 0x45, 0xF9, 0x02, 0x7F, 0x50, 0x3C, 0x9F, 0xA8,
    0x51, 0xA3, 0x40, 0x8F, 0x92, 0x9D, 0x38, 0xF5, 0xBC, 0xB6, 0xDA, 0x21, 0x10, 0xFF, 0xF3, 0xD2,
    0xCD, 0x0C, 0x13, 0xEC, 0x5F, 0x97, 0x44, 0x17, 0xC4, 0xA7, 0x7E, 0x3D, 0x64, 0x5D, 0x19, 0x73,
    0x60, 0x81, 0x4F, 0xDC, 0x22, 0x2A, 0x90, 0x88, 0x46, 0xEE, 0xB8, 0x14, 0xDE, 0x5E, 0x0B, 0xDB,
    0xE0, 0x32, 0x3A, 0x0A, 0x49, 0x06, 0x24, 0x5C, 0xC2, 0xD3, 0xAC, 0x62, 0x91, 0x95, 0xE4, 0x79,
    0xE7, 0xC8, 0x37, 0x6D, 0x8D, 0xD5, 0x4E, 0xA9, 0x6C, 0x56, 0xF4, 0xEA, 0x65, 0x7A, 0xAE, 0x08,
    0xBA, 0x78, 0x25, 0x2E, 0x1C, 0xA6, 0xB4, 0xC6, 0xE8, 0xDD, 0x74, 0x1F, 0x4B, 0xBD, 0x8B, 0x8A,
    0x70, 0x3E, 0xB5, 0x66, 0x48, 0x03, 0xF6, 0x0E, 0x61, 0x35, 0x57, 0xB9, 0x86, 0xC1, 0x1D, 0x9E,
    0xE1, 0xF8, 0x98, 0x11, 0x69, 0xD9, 0x8E, 0x94, 0x9B, 0x1E, 0x87, 0xE9, 0xCE, 0x55, 0x28, 0xDF,
    0x8C, 0xA1, 0x89, 0x0D, 0xBF, 0xE6, 0x42, 0x68, 0x41, 0x99, 0x2D, 0x0F, 0xB0, 0x54, 0xBB, 0x16,
];

#[rustfmt::skip]
const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6A, 0xD5, 0x30, 0x36, 0xA5, 0x38, 0xBF, 0x40, 0xA3, 0x9E, 0x81, 0xF3, 0xD7, 0xFB,
    0x7C, 0xE3, 0x39, 0x82, 0x9B, 0x2F, 0xFF, 0x87, 0x34, 0x8E, 0x43, 0x44, 0xC4, 0xDE, 0xE9, 0xCB,
    0x54, 0x7B, 0x94, 0x32, 0xA6, 0xC2, 0x23, 0x3D, 0xEE, 0x4C, 0x95, 0x0B, 0x42, 0xFA, 0xC3, 0x4E,
    0x08, 0x2E, 0xA1, 0x66, 0x28, 0xD9, 0x24, 0xB2, 0x76, 0x5B, 0xA2, 0x49, 0x6D, 0x8B, 0xD1, 0x25,
    0x72, 0xF8, 0xF6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xD4, 0xA4, 0x5C, 0xCC, 0x5D, 0x65, 0xB6, 0x92,
    0x6C, 0x70, 0x48, 0x50, 0xFD, 0xED, 0xB9, 0xDA, 0x5E, 0x15, 0x46, 0x57, 0xA7, 0x8D, 0x9D, 0x84,
    0x90, 0xD8, 0xAB, 0x00, 0x8C, 0xBC, 0xD3, 0x0A, 0xF7, 0xE4, 0x58, 0x05, 0xB8, 0xB3, 0x45, 0x06,
    0xD0, 0x2C, 0x1E, 0x8F, 0xCA, 0x3F, 0x0F, 0x02, 0xC1, 0xAF, 0xBD, 0x03, 0x01, 0x13, 0x8A, 0x6B,
    0x3A, 0x91, 0x11, 0x41, 0x4F, 0x67, 0xDC, 0xEA, 0x97, 0xF2, 0xCF, 0xCE, 0xF0, 0xB4, 0xE6, 0x73,
    0x96, 0xAC, 0x74, 0x22, 0xE7, 0xAD, 0x35, 0x85, 0xE2, 0xF9, 0x37, 0xE8, 0x1C, 0x75, 0xDF, 0x6E,
    0x47, 0xF1, 0x1A, 0x71, 0x1D, 0x29, 0xC5, 0x89, 0x6F, 0xB7, 0x62, 0x0E, 0xAA, 0x18, 0xBE, 0x1B,
    0xFC, 0x56, 0x3E, 0x4B, 0xC6, 0xD2, 0x79, 0x20, 0x9A, 0xDB, 0xC0, 0xFE, 0x78, 0xCD, 0x5A, 0xF4,
    0x1F, 0xDD, 0xA8, 0x33, 0x88, 0x07, 0xC7, 0x31, 0xB1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xEC, 0x5F,
    0x60, 0x51, 0x7F, 0xA9, 0x19, 0xB5, 0x4A, 0x0D, 0x2D, 0xE5, 0x7A, 0x9F, 0x93, 0xC9, 0x9C, 0xEF,
    0xA0, 0xE0, 0x3B, 0x4D, 0xAE, 0x2A, 0xF5, 0xB0, 0xC8, 0xEB, 0xBB, 0x3C, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2B, 0x04, 0x7E, 0xBA, 0x77, 0xD6, 0x26, 0xE1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0C, 0x7D,
];

/// Round constants; index 0 is unused.
const RCON: [u8; ROUNDS + 1] = [
    0x8D, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36,
];

/// First row of the MixColumns matrix; each later row is this one
/// rotated right.
const MIX_VECTOR: [u8; 4] = [2, 3, 1, 1];

/// First row of the InvMixColumns matrix.
const INV_MIX_VECTOR: [u8; 4] = [14, 11, 13, 9];

type State = [u8; BLOCK_SIZE];

/// Expanded AES-128 key: 11 round keys stored in state order.
///
/// Immutable after expansion; cleared on drop.
pub struct KeySchedule {
    round_keys: [State; ROUNDS + 1],
}

impl KeySchedule {
    /// Expands a 16-byte root key into 11 round keys.
    ///
    /// Round 0 is the root key itself. Each later 4-byte word is the
    /// previous word XORed with the word 16 bytes back; at the start of
    /// every round the previous word is first rotated left one byte,
    /// passed through the S-box and its first byte XORed with the round
    /// constant.
    ///
    /// # Parameters
    /// - `key`: The root key.
    ///
    /// # Returns
    /// The expanded key schedule.
    pub fn expand(key: &[u8; KEY_SIZE]) -> Self {
        let mut expanded = [0u8; EXPANDED_KEY_SIZE];
        expanded[..KEY_SIZE].copy_from_slice(key);

        let mut rcon_index = 1;
        for pos in (KEY_SIZE..EXPANDED_KEY_SIZE).step_by(4) {
            let mut word = [0u8; 4];
            word.copy_from_slice(&expanded[pos - 4..pos]);

            if pos.is_multiple_of(KEY_SIZE) {
                rotate_word_left(&mut word);
                for byte in word.iter_mut() {
                    *byte = SBOX[*byte as usize];
                }
                word[0] ^= RCON[rcon_index];
                rcon_index += 1;
            }

            for (i, byte) in word.iter().enumerate() {
                expanded[pos + i] = expanded[pos + i - KEY_SIZE] ^ byte;
            }
        }

        let mut round_keys = [[0u8; BLOCK_SIZE]; ROUNDS + 1];
        for (round, round_key) in round_keys.iter_mut().enumerate() {
            let section = &expanded[round * BLOCK_SIZE..(round + 1) * BLOCK_SIZE];
            *round_key = to_state(section);
        }
        expanded.fill(0);

        KeySchedule { round_keys }
    }

    /// Returns round key `round` (0..=10) in the cipher's input byte order.
    ///
    /// # Panics
    /// Panics if `round > 10`.
    pub fn round_key(&self, round: usize) -> [u8; BLOCK_SIZE] {
        from_state(&self.round_keys[round])
    }
}

impl Drop for KeySchedule {
    /// Clears the round keys on drop.
    fn drop(&mut self) {
        for round_key in self.round_keys.iter_mut() {
            round_key.fill(0);
        }
    }
}

/// AES-128 cipher bound to one key.
///
/// # Examples
///
/// ```
/// use braidcodec::aes::Aes128;
///
/// let cipher = Aes128::new(&[0x2B; 16]);
/// let block = *b"sixteen byte msg";
/// let encrypted = cipher.encrypt_block(&block);
/// assert_ne!(encrypted, block);
/// assert_eq!(cipher.decrypt_block(&encrypted), block);
/// ```
pub struct Aes128 {
    schedule: KeySchedule,
}

impl Aes128 {
    /// Creates a cipher, expanding `key` once.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Aes128 {
            schedule: KeySchedule::expand(key),
        }
    }

    /// Returns the expanded key schedule.
    pub fn schedule(&self) -> &KeySchedule {
        &self.schedule
    }

    /// Encrypts one 16-byte block.
    ///
    /// AddRoundKey with round 0, then rounds 1..=9 of SubBytes, ShiftRows,
    /// MixColumns and AddRoundKey; the final round omits MixColumns.
    pub fn encrypt_block(&self, input: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        let keys = &self.schedule.round_keys;
        let mut state = to_state(input);

        add_round_key(&mut state, &keys[0]);
        for round_key in &keys[1..ROUNDS] {
            substitute_bytes(&mut state, &SBOX);
            shift_rows_left(&mut state);
            mix_columns(&mut state, &MIX_VECTOR);
            add_round_key(&mut state, round_key);
        }
        substitute_bytes(&mut state, &SBOX);
        shift_rows_left(&mut state);
        add_round_key(&mut state, &keys[ROUNDS]);

        from_state(&state)
    }

    /// Decrypts one 16-byte block, inverting [`encrypt_block`](Self::encrypt_block).
    pub fn decrypt_block(&self, input: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        let keys = &self.schedule.round_keys;
        let mut state = to_state(input);

        add_round_key(&mut state, &keys[ROUNDS]);
        for round_key in keys[1..ROUNDS].iter().rev() {
            shift_rows_right(&mut state);
            substitute_bytes(&mut state, &INV_SBOX);
            add_round_key(&mut state, round_key);
            mix_columns(&mut state, &INV_MIX_VECTOR);
        }
        shift_rows_right(&mut state);
        substitute_bytes(&mut state, &INV_SBOX);
        add_round_key(&mut state, &keys[0]);

        from_state(&state)
    }
}

/// Loads 16 bytes in input order into the row-major state.
fn to_state(bytes: &[u8]) -> State {
    let mut state = [0u8; BLOCK_SIZE];
    for col in 0..4 {
        for row in 0..4 {
            state[row * 4 + col] = bytes[col * 4 + row];
        }
    }
    state
}

/// Converts the row-major state back to input byte order.
fn from_state(state: &State) -> [u8; BLOCK_SIZE] {
    let mut bytes = [0u8; BLOCK_SIZE];
    for col in 0..4 {
        for row in 0..4 {
            bytes[col * 4 + row] = state[row * 4 + col];
        }
    }
    bytes
}

fn substitute_bytes(state: &mut State, sbox: &[u8; 256]) {
    for byte in state.iter_mut() {
        *byte = sbox[*byte as usize];
    }
}

/// Rotates row `i` left by `i` positions. Row 0 is never shifted.
fn shift_rows_left(state: &mut State) {
    for (i, row) in state.chunks_exact_mut(4).enumerate().skip(1) {
        for _ in 0..i {
            rotate_word_left(row);
        }
    }
}

/// Rotates row `i` right by `i` positions.
fn shift_rows_right(state: &mut State) {
    for (i, row) in state.chunks_exact_mut(4).enumerate().skip(1) {
        for _ in 0..i {
            rotate_word_right(row);
        }
    }
}

fn add_round_key(state: &mut State, round_key: &State) {
    for (byte, key) in state.iter_mut().zip(round_key) {
        *byte ^= key;
    }
}

/// Multiplies every column by the circulant matrix whose first row is
/// `vector`.
fn mix_columns(state: &mut State, vector: &[u8; 4]) {
    for col in 0..4 {
        let column: [u8; 4] = core::array::from_fn(|row| state[row * 4 + col]);
        let mixed: [u8; 4] = core::array::from_fn(|row| {
            vector.iter().enumerate().fold(0, |acc, (k, &factor)| {
                acc ^ galois_multiply(column[(row + k) % 4], factor)
            })
        });
        for (row, byte) in mixed.into_iter().enumerate() {
            state[row * 4 + col] = byte;
        }
    }
}
