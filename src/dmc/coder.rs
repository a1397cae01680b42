//! Binary arithmetic coder driven by the DMC predictor.
//!
//! Stream layout:
//!
//! ```text
//! DD 17 CC | coded bytes... | 3-byte terminator (most significant first)
//! ```
//!
//! The coder keeps a 24-bit interval `[min, max)`. Each bit splits it at a
//! point given by the predictor; the side matching the bit is kept. Once
//! the interval is narrower than 256, its top byte is settled and shifted
//! out. Bytes are coded most significant bit first.
//!
//! Before each byte both sides give up the interval's top code point. The
//! encoder ends the stream by writing exactly that point, so the decoder
//! knows the stream is over when its value lands there at a byte boundary.
//!
//! Reserving that point changes every coded byte, so these streams are not
//! interchangeable with DMC files from coders that stop on input exhaustion
//! instead. Neither side can decode the other's files despite the shared
//! magic header.

use tracing::debug;

use super::predictor::Predictor;
use crate::config::DmcConfig;
use crate::error::{CodecError, Result};
use crate::utils::buffer::{reserve, try_with_capacity};
use crate::utils::converter::{u24_from_be_bytes, u24_to_be_bytes};

/// Magic bytes opening a compressed stream.
pub const DMC_MAGIC: [u8; 3] = [0xDD, 0x17, 0xCC];

/// Shortest well-formed stream: magic plus the 24-bit terminator.
pub const MIN_STREAM_LEN: usize = DMC_MAGIC.len() + 3;

/// Exclusive upper end of the coding interval.
const TOP: u32 = 0x100_0000;

/// Width below which the interval is renormalized.
const RENORM_WIDTH: u32 = 0x100;

/// Bits kept when shifting the interval by one byte.
const WINDOW_MASK: u32 = 0xFF_FF00;

/// Coded bytes between two checks of the flush throttle.
const FLUSH_PERIOD: usize = 0x100;

/// Returns `true` if `bytes` opens with the DMC magic header.
pub fn is_compressed(bytes: &[u8]) -> bool {
    bytes.starts_with(&DMC_MAGIC)
}

/// The coding interval shared by encoder and decoder.
struct Interval {
    min: u32,
    max: u32,
}

impl Interval {
    fn new() -> Self {
        Interval { min: 0, max: TOP }
    }

    /// Split point for a bit whose probability of being 0 is `p`.
    ///
    /// Always strictly inside the interval so both halves are non-empty.
    fn split(&self, p: f32) -> u32 {
        let width = (self.max - self.min - 1) as f32;
        let mut mid = (self.min as f32 + width * p) as u32;
        if mid == self.min {
            mid += 1;
        }
        if mid == self.max - 1 {
            mid -= 1;
        }
        mid
    }

    fn narrow(&mut self, bit: bool, mid: u32) {
        if bit {
            self.min = mid;
        } else {
            self.max = mid;
        }
    }

    fn needs_renorm(&self) -> bool {
        self.max - self.min < RENORM_WIDTH
    }

    /// Shifts the interval one byte left and returns the settled byte.
    fn shift(&mut self, bit: bool) -> u8 {
        if bit {
            self.max -= 1;
        }
        let settled = (self.min >> 16) as u8;
        self.min = (self.min << 8) & WINDOW_MASK;
        self.max = (self.max << 8) & WINDOW_MASK;
        if self.min >= self.max {
            self.max = TOP;
        }
        settled
    }

    /// The top code point, used as the end-of-stream marker.
    fn terminator(&self) -> u32 {
        self.max - 1
    }

    /// Removes the terminator from the interval before coding a byte.
    fn reserve_terminator(&mut self) {
        self.max -= 1;
    }
}

/// Forces a braid rebuild when the compressed side grows too fast.
struct FlushThrottle {
    window: usize,
    coded: usize,
    checkpoint: usize,
}

impl FlushThrottle {
    fn new(window: usize) -> Self {
        FlushThrottle {
            window,
            coded: 0,
            checkpoint: DMC_MAGIC.len(),
        }
    }

    /// Called after each plain byte with the running compressed size.
    fn byte_done(&mut self, compressed: usize, model: &mut Predictor) {
        self.coded += 1;
        if !self.coded.is_multiple_of(FLUSH_PERIOD) {
            return;
        }
        if compressed - self.checkpoint > self.window {
            debug!(
                coded = self.coded,
                compressed, "model not keeping up, rebuilding braid"
            );
            model.reset();
        }
        self.checkpoint = compressed;
    }
}

/// Compresses `plain` with the default configuration.
///
/// # Examples
///
/// ```
/// use braidcodec::dmc::{compress, decompress};
///
/// let packed = compress(b"hello world").unwrap();
/// assert_eq!(decompress(&packed).unwrap(), b"hello world");
/// ```
pub fn compress(plain: &[u8]) -> Result<Vec<u8>> {
    compress_with(plain, &DmcConfig::default())
}

/// Compresses `plain` into a complete DMC stream.
///
/// # Errors
/// Returns [`CodecError::AllocationFailure`] if the model or the output
/// cannot be allocated.
pub fn compress_with(plain: &[u8], config: &DmcConfig) -> Result<Vec<u8>> {
    encode(plain, config).map(|(packed, _)| packed)
}

/// Encodes `plain` and reports how many times the model was rebuilt.
fn encode(plain: &[u8], config: &DmcConfig) -> Result<(Vec<u8>, usize)> {
    let mut model = Predictor::new(config)?;
    let mut out = try_with_capacity(MIN_STREAM_LEN + plain.len() / 2)?;
    out.extend_from_slice(&DMC_MAGIC);

    let mut interval = Interval::new();
    let mut throttle = FlushThrottle::new(config.flush_window());

    for &byte in plain {
        interval.reserve_terminator();
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            let mid = interval.split(model.predict());
            model.update(bit);
            interval.narrow(bit, mid);
            while interval.needs_renorm() {
                let settled = interval.shift(bit);
                reserve(&mut out, 1)?;
                out.push(settled);
            }
        }
        throttle.byte_done(out.len(), &mut model);
    }

    reserve(&mut out, 3)?;
    out.extend_from_slice(&u24_to_be_bytes(interval.terminator()));

    debug!(
        plain_bytes = plain.len(),
        packed_bytes = out.len(),
        resets = model.resets(),
        "compressed stream"
    );
    Ok((out, model.resets()))
}

/// Decompresses a stream with the default configuration.
pub fn decompress(packed: &[u8]) -> Result<Vec<u8>> {
    decompress_with(packed, &DmcConfig::default())
}

/// Decompresses a stream produced by [`compress_with`] under the same
/// configuration.
///
/// Bytes after the terminator are ignored, so the zero padding left by the
/// cipher stage is harmless.
///
/// # Errors
/// - [`CodecError::FormatMismatch`] if the magic header is absent.
/// - [`CodecError::StreamTooShort`] if `packed` is shorter than
///   [`MIN_STREAM_LEN`].
/// - [`CodecError::BufferExhaustion`] if the stream ends before its
///   terminator.
/// - [`CodecError::AllocationFailure`] if the model or output cannot be
///   allocated.
pub fn decompress_with(packed: &[u8], config: &DmcConfig) -> Result<Vec<u8>> {
    decode(packed, config).map(|(plain, _)| plain)
}

/// Decodes `packed` and reports how many times the model was rebuilt.
fn decode(packed: &[u8], config: &DmcConfig) -> Result<(Vec<u8>, usize)> {
    if !is_compressed(packed) {
        return Err(CodecError::FormatMismatch { expected: "DMC" });
    }
    if packed.len() < MIN_STREAM_LEN {
        return Err(CodecError::StreamTooShort {
            stage: "DMC",
            len: packed.len(),
            min: MIN_STREAM_LEN,
        });
    }

    let mut model = Predictor::new(config)?;
    let mut out = try_with_capacity(packed.len() * 2)?;
    let mut reader = ByteReader::new(packed, DMC_MAGIC.len());
    let mut value = u24_from_be_bytes([reader.pull()?, reader.pull()?, reader.pull()?]);

    let mut interval = Interval::new();
    let mut throttle = FlushThrottle::new(config.flush_window());

    while value != interval.terminator() {
        interval.reserve_terminator();
        let mut byte = 0u8;
        for _ in 0..8 {
            let mid = interval.split(model.predict());
            let bit = value >= mid;
            model.update(bit);
            interval.narrow(bit, mid);
            byte = (byte << 1) | u8::from(bit);
            while interval.needs_renorm() {
                interval.shift(bit);
                value = ((value << 8) & WINDOW_MASK) | u32::from(reader.pull()?);
            }
        }
        reserve(&mut out, 1)?;
        out.push(byte);
        // The reader has consumed exactly what the encoder had written at
        // this point, minus the three bytes held in `value`.
        throttle.byte_done(reader.offset() - 3, &mut model);
    }

    debug!(
        packed_bytes = reader.offset(),
        plain_bytes = out.len(),
        resets = model.resets(),
        "decompressed stream"
    );
    Ok((out, model.resets()))
}

/// Bounds-checked cursor over the compressed input.
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8], offset: usize) -> Self {
        ByteReader { bytes, offset }
    }

    fn pull(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or(CodecError::BufferExhaustion {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    fn offset(&self) -> usize {
        self.offset
    }
}
