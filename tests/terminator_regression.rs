//! Regression tests for end-of-stream detection in the DMC decoder.
//!
//! A stream whose last coded bits needed no renormalization used to end
//! exactly where the decoder expected more input, and inputs such as a
//! single `0xFF` decoded as empty. The decoder now stops only on the
//! terminator written by the encoder, never on input exhaustion.

use braidcodec::dmc::{compress, decompress};
use braidcodec::envelope::{self, KeyMaterial};
use braidcodec::{CodecError, FileCodec, FileType};

/// Inputs whose final bits are all ones or all zeros.
const EDGE_INPUTS: [&[u8]; 6] = [
    &[0xFF],
    &[0xFF, 0xFF],
    &[0x00],
    &[0x00, 0x00, 0x00],
    b"ends with ones \xFF\xFF\xFF",
    b"ends with nul \0\0\0",
];

// ═══════════════════════════════════════════════════════════════════════
// Core regression: exact length for inputs ending in extreme bytes
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn terminator_edge_inputs_roundtrip() {
    for (i, &input) in EDGE_INPUTS.iter().enumerate() {
        let packed = compress(input).unwrap();
        assert_eq!(decompress(&packed).unwrap(), input, "input[{}]", i);
    }
}

/// Long runs of one byte value end on a byte boundary with nothing left
/// to renormalize.
#[test]
fn terminator_long_runs() {
    for value in [0x00u8, 0x7F, 0x80, 0xFF] {
        for len in [1usize, 7, 255, 256, 257, 4096] {
            let input = vec![value; len];
            let packed = compress(&input).unwrap();
            assert_eq!(
                decompress(&packed).unwrap().len(),
                len,
                "value {:#04x} len {}",
                value,
                len
            );
        }
    }
}

/// Cipher padding after the terminator is never read as data.
#[test]
fn terminator_survives_cipher_padding() {
    let keys = KeyMaterial::derive("pw");
    for &input in EDGE_INPUTS.iter() {
        let stored = envelope::encrypt(&compress(input).unwrap(), &keys).unwrap();
        let padded = envelope::decrypt(&stored, &keys).unwrap();
        assert_eq!(decompress(&padded).unwrap(), input);
    }
}

/// Plain text ending in NUL keeps its NULs when compressed before
/// encryption.
#[test]
fn terminator_preserves_trailing_nul_through_codec() {
    let mut codec = FileCodec::new();
    codec.set_password("pw");
    let both = FileType::COMPRESSED | FileType::ENCRYPTED;
    let input = b"ends with nul \0\0\0";
    let stored = codec.encode(both, input).unwrap();
    assert_eq!(codec.decode(&stored).unwrap().1, input);
}

/// Without its terminator a stream is an error, not a shorter result.
#[test]
fn terminator_missing_is_an_error() {
    let packed = compress(b"hello world").unwrap();
    let cut = &packed[..packed.len() - 3];
    assert!(matches!(
        decompress(cut),
        Err(CodecError::BufferExhaustion { .. })
    ));
}
