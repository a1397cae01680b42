//! braidcodec: layered file codec with DMC compression and AES-128
//! encryption.
//!
//! A document is stored as plain text with up to two reversible layers on
//! top: Dynamic Markov Compression, then AES-128 under a password-derived
//! key. Each layer announces itself with a three-byte magic header, so a
//! file can be opened without knowing how it was saved.
//!
//! # Architecture
//!
//! ```text
//! Isaac / PasswordStream   (password-seeded keystream: key + verification)
//!     ↓
//! Aes128 / envelope        (AA EE 17 | verification | 16-byte blocks)
//!
//! Predictor                (braid of 256×256 nodes + clone arena)
//!     ↓
//! coder                    (DD 17 CC | arithmetic-coded bits | terminator)
//!
//! FileCodec                (orchestrator: compress, then encrypt)
//! ```
//!
//! # Examples
//!
//! Compress and encrypt a buffer, then restore it:
//!
//! ```
//! use braidcodec::{FileCodec, FileType};
//!
//! let mut codec = FileCodec::new();
//! codec.set_password("my_secret_password");
//!
//! let file_type = FileType::COMPRESSED | FileType::ENCRYPTED;
//! let stored = codec.encode(file_type, b"hello world").unwrap();
//!
//! let (found, plain) = codec.decode(&stored).unwrap();
//! assert_eq!(found, file_type);
//! assert_eq!(plain, b"hello world");
//! ```
//!
//! Pick the layers from a file name:
//!
//! ```
//! use braidcodec::{extension_for, type_for, FileType};
//!
//! let t = type_for("notes.dmc.aes");
//! assert_eq!(t, FileType::COMPRESSED | FileType::ENCRYPTED);
//! assert_eq!(extension_for(t), ".dmc.aes");
//! ```

#![deny(clippy::all)]

pub mod aes;
pub mod codec;
pub mod config;
pub mod dmc;
pub mod envelope;
pub mod error;
pub mod file_type;
pub mod random;
pub(crate) mod utils;

pub use codec::{file_exists, FileCodec, FileDetails, MAX_PASSWORD_LEN};
pub use config::DmcConfig;
pub use error::{CodecError, Result};
pub use file_type::{extension_for, file_name, type_for, FileType};
