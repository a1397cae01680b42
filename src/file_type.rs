//! File type mask and extension mapping.
//!
//! A file is plain text with zero or more layers applied: compression,
//! encryption, or both (compressed first, then encrypted).

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::dmc::is_compressed;
use crate::envelope::is_encrypted;

/// Extension for plain files.
pub const PLAIN_EXTENSION: &str = ".txt";

/// Extension for compressed files.
pub const DMC_EXTENSION: &str = ".dmc";

/// Extension for encrypted files.
pub const AES_EXTENSION: &str = ".aes";

/// Extension for files that are compressed, then encrypted.
pub const DMC_AES_EXTENSION: &str = ".dmc.aes";

/// Layers applied to a file, as a bit mask.
///
/// # Examples
///
/// ```
/// use braidcodec::FileType;
///
/// let t = FileType::COMPRESSED | FileType::ENCRYPTED;
/// assert!(t.contains(FileType::ENCRYPTED));
/// assert_eq!(t.extension(), ".dmc.aes");
/// assert_eq!(FileType::from_extension("notes.dmc.aes"), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileType(u8);

impl FileType {
    /// No layers.
    pub const PLAIN: FileType = FileType(0x00);
    /// DMC compression.
    pub const COMPRESSED: FileType = FileType(0x01);
    /// AES-128 encryption.
    pub const ENCRYPTED: FileType = FileType(0x02);

    const ALL_BITS: u8 = 0x03;

    /// Raw bit value.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Builds a mask from raw bits, rejecting unknown ones.
    pub fn from_bits(bits: u8) -> Option<FileType> {
        (bits & !Self::ALL_BITS == 0).then_some(FileType(bits))
    }

    /// Every valid mask, from plain to compressed and encrypted.
    pub fn all() -> [FileType; 4] {
        [
            FileType::PLAIN,
            FileType::COMPRESSED,
            FileType::ENCRYPTED,
            FileType::COMPRESSED | FileType::ENCRYPTED,
        ]
    }

    /// Whether every layer in `other` is present in `self`.
    pub fn contains(self, other: FileType) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no layer is set.
    pub fn is_plain(self) -> bool {
        self.0 == 0
    }

    /// The file extension for this mask, including the leading dot.
    pub fn extension(self) -> &'static str {
        match (
            self.contains(FileType::COMPRESSED),
            self.contains(FileType::ENCRYPTED),
        ) {
            (false, false) => PLAIN_EXTENSION,
            (true, false) => DMC_EXTENSION,
            (false, true) => AES_EXTENSION,
            (true, true) => DMC_AES_EXTENSION,
        }
    }

    /// Infers the mask from the last two extensions of a file name.
    ///
    /// Accepts a bare extension (`".dmc"`), a file name or a path using
    /// either `/` or `\` separators. Matching ignores ASCII case; unknown
    /// extensions contribute nothing.
    pub fn from_extension(name: &str) -> FileType {
        let file = file_name(name);
        // The part before the first dot is the stem, never an extension.
        let Some(dot) = file.find('.') else {
            return FileType::PLAIN;
        };
        file[dot + 1..]
            .rsplit('.')
            .take(2)
            .fold(FileType::PLAIN, |found, ext| found | Self::layer_for(ext))
    }

    fn layer_for(ext: &str) -> FileType {
        if ext.eq_ignore_ascii_case("dmc") {
            FileType::COMPRESSED
        } else if ext.eq_ignore_ascii_case("aes") {
            FileType::ENCRYPTED
        } else {
            FileType::PLAIN
        }
    }

    /// Identifies the outermost layer from a buffer's magic header.
    ///
    /// At most one layer is reported: an encrypted file hides whether its
    /// content is compressed.
    pub fn detect(bytes: &[u8]) -> FileType {
        if is_compressed(bytes) {
            FileType::COMPRESSED
        } else if is_encrypted(bytes) {
            FileType::ENCRYPTED
        } else {
            FileType::PLAIN
        }
    }
}

impl BitOr for FileType {
    type Output = FileType;

    fn bitor(self, rhs: FileType) -> FileType {
        FileType(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileType {
    fn bitor_assign(&mut self, rhs: FileType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (
            self.contains(FileType::COMPRESSED),
            self.contains(FileType::ENCRYPTED),
        ) {
            (false, false) => "plain",
            (true, false) => "compressed",
            (false, true) => "encrypted",
            (true, true) => "compressed+encrypted",
        };
        f.write_str(name)
    }
}

/// The extension for `file_type`, e.g. `".dmc.aes"`.
pub fn extension_for(file_type: FileType) -> &'static str {
    file_type.extension()
}

/// The file type implied by a name, path or extension.
pub fn type_for(name: &str) -> FileType {
    FileType::from_extension(name)
}

/// The final component of a path, splitting on `/` and `\`.
///
/// # Examples
///
/// ```
/// use braidcodec::file_type::file_name;
///
/// assert_eq!(file_name(r"C:\docs\notes.dmc"), "notes.dmc");
/// assert_eq!(file_name("docs/notes.txt"), "notes.txt");
/// assert_eq!(file_name("notes"), "notes");
/// ```
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
