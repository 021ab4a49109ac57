//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// directory file is not a valid vpk
    #[error("directory file is not a valid vpk")]
    Format(#[from] FormatError),

    /// entry declares both preload bytes and an archive payload
    #[error("entry {name} declares {preload_bytes} preload bytes and a {payload_length} byte payload")]
    #[diagnostic(help("entries must keep their content either in the directory file or in an archive shard, not both"))]
    UnsupportedEntry {
        /// Full path of the offending entry
        name: String,
        /// Declared preload byte count
        preload_bytes: i16,
        /// Declared archive payload length
        payload_length: u32,
    },

    /// directory file name cannot be turned into shard names
    #[error("directory file name {0} is not valid unicode")]
    #[diagnostic(help("shard names are derived by editing the directory file name as text"))]
    NonUnicodePath(std::path::PathBuf),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Structural problems found while reading a directory file
#[derive(Error, Diagnostic, Debug)]
pub enum FormatError {
    /// bad signature
    #[error("bad signature")]
    BadSignature,

    /// unsupported version {0}
    #[error("unsupported version {0}")]
    UnsupportedVersion(u32),

    /// entry {name} is missing its terminator
    #[error("missing entry terminator for {name}, found {found:#06x}")]
    MissingTerminator {
        /// Name of the entry whose record was corrupt
        name: String,
        /// Value read where the terminator was expected
        found: u16,
    },

    /// directory file ended in the middle of a record
    #[error("directory file ended in the middle of a record")]
    Truncated,
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value.root_cause() {
            binrw::Error::BadMagic { .. } => Error::Format(FormatError::BadSignature),
            _ => Error::BinRWError(value),
        }
    }
}

impl Error {
    /// Turn an early end of stream into [`FormatError::Truncated`].
    ///
    /// Used while parsing the directory tree, where every read is required.
    pub(crate) fn truncated_on_eof(self) -> Self {
        match self {
            Error::IOError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Error::Format(FormatError::Truncated)
            }
            Error::BinRWError(e) if e.is_eof() => Error::Format(FormatError::Truncated),
            other => other,
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::io::{Error as IoError, ErrorKind};

    use crate::error::{Error, FormatError};

    #[test]
    fn eof_becomes_truncated() {
        let err = Error::from(IoError::from(ErrorKind::UnexpectedEof)).truncated_on_eof();
        assert!(matches!(err, Error::Format(FormatError::Truncated)));
    }

    #[test]
    fn other_io_errors_are_kept() {
        let err = Error::from(IoError::from(ErrorKind::PermissionDenied)).truncated_on_eof();
        assert!(matches!(err, Error::IOError(e) if e.kind() == ErrorKind::PermissionDenied));
    }

    #[test]
    fn binrw_eof_becomes_truncated() {
        let err = Error::from(binrw::Error::Io(IoError::from(ErrorKind::UnexpectedEof)))
            .truncated_on_eof();
        assert!(matches!(err, Error::Format(FormatError::Truncated)));
    }

    #[test]
    fn bad_magic_becomes_bad_signature() {
        let err = Error::from(binrw::Error::BadMagic {
            pos: 0,
            found: Box::new(0u32),
        });
        assert!(matches!(err, Error::Format(FormatError::BadSignature)));
    }
}
