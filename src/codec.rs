//! File codec orchestrator.
//!
//! Chains the stages in a fixed order:
//!
//! ```text
//! save: plain ──► [DMC compress] ──► [AES encrypt] ──► file
//! open: file ──► [AES decrypt] ──► [DMC decompress] ──► plain
//! ```
//!
//! Every call builds its own predictor, cipher and keystream and drops them
//! before returning. The only state kept between calls is the password and
//! the DMC configuration held by [`FileCodec`].

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::DmcConfig;
use crate::dmc::{compress_with, decompress_with, is_compressed};
use crate::envelope::{self, KeyMaterial};
use crate::error::{CodecError, Result};
use crate::file_type::FileType;
use crate::utils::buffer::try_with_capacity;

/// Longest password kept, in bytes.
pub const MAX_PASSWORD_LEN: usize = 64;

/// Bytes read by [`FileCodec::probe`] to identify a file.
const PROBE_LEN: u64 = 3;

/// A decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    /// Where the file was read from.
    pub path: PathBuf,
    /// Layers that were removed while opening.
    pub file_type: FileType,
    /// The plain text.
    pub contents: Vec<u8>,
}

/// Opens and saves files through the compression and encryption stages.
///
/// # Examples
///
/// ```
/// use braidcodec::{FileCodec, FileType};
///
/// let mut codec = FileCodec::new();
/// codec.set_password("secret");
///
/// let both = FileType::COMPRESSED | FileType::ENCRYPTED;
/// let stored = codec.encode(both, b"hello world").unwrap();
/// let (found, plain) = codec.decode(&stored).unwrap();
/// assert_eq!(found, both);
/// assert_eq!(plain, b"hello world");
/// ```
#[derive(Default)]
pub struct FileCodec {
    password: Option<String>,
    dmc: DmcConfig,
}

impl FileCodec {
    /// Creates a codec with no password and the default DMC configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with a custom DMC configuration.
    ///
    /// Files compressed under one configuration only decompress under the
    /// same configuration.
    pub fn with_config(dmc: DmcConfig) -> Self {
        FileCodec {
            password: None,
            dmc,
        }
    }

    /// The DMC configuration in use.
    pub fn config(&self) -> &DmcConfig {
        &self.dmc
    }

    /// Sets the password used by the encryption stage.
    ///
    /// Passwords longer than [`MAX_PASSWORD_LEN`] bytes are cut at the last
    /// character boundary within the limit. Key derivation reads the
    /// password only up to its first NUL.
    ///
    /// # Parameters
    /// - `password`: The new password; replaces any previous one.
    pub fn set_password(&mut self, password: &str) {
        let mut end = password.len().min(MAX_PASSWORD_LEN);
        while !password.is_char_boundary(end) {
            end -= 1;
        }
        self.clear_password();
        self.password = Some(password[..end].to_owned());
    }

    /// Forgets the password, overwriting its bytes.
    pub fn clear_password(&mut self) {
        if let Some(old) = self.password.take() {
            let mut bytes = old.into_bytes();
            bytes.fill(0);
        }
    }

    /// Whether a password is set.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    fn keys(&self) -> Result<KeyMaterial> {
        self.password
            .as_deref()
            .map(KeyMaterial::derive)
            .ok_or(CodecError::PasswordNotSet)
    }

    /// Applies the layers in `file_type` to `plain`.
    ///
    /// # Errors
    /// - [`CodecError::PasswordNotSet`] if encryption is requested without
    ///   a password.
    /// - [`CodecError::AllocationFailure`] if a stage runs out of memory.
    pub fn encode(&self, file_type: FileType, plain: &[u8]) -> Result<Vec<u8>> {
        let keys = if file_type.contains(FileType::ENCRYPTED) {
            Some(self.keys()?)
        } else {
            None
        };

        let mut current = if file_type.contains(FileType::COMPRESSED) {
            compress_with(plain, &self.dmc)?
        } else {
            let mut copy = try_with_capacity(plain.len())?;
            copy.extend_from_slice(plain);
            copy
        };

        if let Some(keys) = keys {
            current = envelope::encrypt(&current, &keys)?;
        }
        Ok(current)
    }

    /// Removes every layer found in `bytes`, detected from magic headers.
    ///
    /// A buffer with no known header is returned as plain text. Once a
    /// header has been recognized its stage must succeed; there is no
    /// fallback to treating the bytes as plain.
    ///
    /// # Returns
    /// The layers that were removed and the plain text.
    ///
    /// # Errors
    /// Any error of the stages involved, or
    /// [`CodecError::PasswordNotSet`] for an encrypted buffer without a
    /// password.
    pub fn decode(&self, bytes: &[u8]) -> Result<(FileType, Vec<u8>)> {
        let outer = FileType::detect(bytes);
        self.unwrap_layers(outer, bytes)
    }

    /// Removes the layers in `file_type` from `bytes`.
    ///
    /// Each requested layer must be present. After decryption a compressed
    /// payload is decompressed even if compression was not requested, and
    /// the returned type says so.
    ///
    /// # Errors
    /// [`CodecError::FormatMismatch`] if a requested layer's header is
    /// missing, plus the errors of [`decode`](Self::decode).
    pub fn decode_as(&self, file_type: FileType, bytes: &[u8]) -> Result<(FileType, Vec<u8>)> {
        self.unwrap_layers(file_type, bytes)
    }

    fn unwrap_layers(&self, requested: FileType, bytes: &[u8]) -> Result<(FileType, Vec<u8>)> {
        let mut file_type = requested;
        let mut current = if file_type.contains(FileType::ENCRYPTED) {
            let plain = envelope::decrypt(bytes, &self.keys()?)?;
            if is_compressed(&plain) {
                file_type |= FileType::COMPRESSED;
            }
            plain
        } else {
            let mut copy = try_with_capacity(bytes.len())?;
            copy.extend_from_slice(bytes);
            copy
        };

        if file_type.contains(FileType::COMPRESSED) {
            current = decompress_with(&current, &self.dmc)?;
        } else if file_type.contains(FileType::ENCRYPTED) {
            envelope::strip_padding(&mut current);
        }
        Ok((file_type, current))
    }

    /// Reads `path` and removes the layers in `file_type`.
    ///
    /// # Errors
    /// [`CodecError::Io`] if the file cannot be read, plus the errors of
    /// [`decode_as`](Self::decode_as).
    pub fn open(&self, path: impl AsRef<Path>, file_type: FileType) -> Result<FileDetails> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (file_type, contents) = self.decode_as(file_type, &bytes)?;
        info!(path = %path.display(), %file_type, bytes = contents.len(), "opened file");
        Ok(FileDetails {
            path: path.to_path_buf(),
            file_type,
            contents,
        })
    }

    /// Reads `path` and removes whatever layers its headers announce.
    ///
    /// # Errors
    /// [`CodecError::Io`] if the file cannot be read, plus the errors of
    /// [`decode`](Self::decode).
    pub fn open_detect(&self, path: impl AsRef<Path>) -> Result<FileDetails> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (file_type, contents) = self.decode(&bytes)?;
        info!(path = %path.display(), %file_type, bytes = contents.len(), "opened file");
        Ok(FileDetails {
            path: path.to_path_buf(),
            file_type,
            contents,
        })
    }

    /// Writes `plain` to `path` with the layers in `file_type`.
    ///
    /// Encoding runs before the destination is touched, so an encoding
    /// error leaves any existing file as it was. If writing fails the
    /// destination is truncated to zero length, so no partial output is
    /// left behind.
    ///
    /// # Errors
    /// [`CodecError::Io`] if the file cannot be created or written, plus
    /// the errors of [`encode`](Self::encode).
    pub fn save(&self, path: impl AsRef<Path>, file_type: FileType, plain: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let encoded = self.encode(file_type, plain)?;
        let mut file = File::create(path)?;

        if let Err(err) = file.write_all(&encoded) {
            warn!(path = %path.display(), error = %err, "save failed, truncating output");
            if let Err(trunc_err) = file.set_len(0) {
                warn!(path = %path.display(), error = %trunc_err, "could not truncate output");
            }
            return Err(err.into());
        }

        info!(path = %path.display(), %file_type, bytes = plain.len(), "saved file");
        Ok(())
    }

    /// Identifies the outermost layer of the file at `path` from its header.
    ///
    /// # Errors
    /// [`CodecError::Io`] if the file cannot be read.
    pub fn probe(path: impl AsRef<Path>) -> Result<FileType> {
        let mut header = Vec::new();
        File::open(path)?.take(PROBE_LEN).read_to_end(&mut header)?;
        Ok(FileType::detect(&header))
    }
}

impl Drop for FileCodec {
    /// Overwrites the password on drop.
    fn drop(&mut self) {
        self.clear_password();
    }
}

/// Whether `path` names an existing regular file.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}
