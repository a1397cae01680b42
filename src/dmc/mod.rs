//! Dynamic Markov Compression.
//!
//! [`predictor`] holds the adaptive bit model, [`coder`] the arithmetic
//! coder that turns its predictions into a byte stream.

pub mod coder;
pub mod predictor;

pub use coder::{
    compress, compress_with, decompress, decompress_with, is_compressed, DMC_MAGIC, MIN_STREAM_LEN,
};
pub use predictor::Predictor;
