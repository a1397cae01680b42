//! Error types for the braidcodec library.

use thiserror::Error;

/// Errors produced while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A transform was requested but its magic header is missing.
    #[error("expected {expected} header, found none")]
    FormatMismatch { expected: &'static str },

    /// The stored verification block does not match the password.
    #[error("password does not match the file's verification block")]
    WrongPassword,

    /// An encrypted file was opened or saved with no password set.
    #[error("no password has been set")]
    PasswordNotSet,

    /// A buffer or the predictor arena could not be allocated.
    #[error("failed to allocate {requested} elements")]
    AllocationFailure { requested: usize },

    /// The decoder tried to read past the end of its input.
    #[error("read past end of stream at offset {offset}")]
    BufferExhaustion { offset: usize },

    /// The stream is shorter than the smallest valid stream for its stage.
    #[error("{stage} stream is {len} bytes, need at least {min}")]
    StreamTooShort {
        stage: &'static str,
        len: usize,
        min: usize,
    },

    /// Codec tuning parameters are inconsistent.
    #[error("invalid codec configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Returns `true` when the caller should re-prompt for a password
    /// rather than treat the file as corrupt.
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, CodecError::WrongPassword)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;
