//! Bundle error types.

use std::path::PathBuf;

use crate::codec::CodecError;
use crate::encoder::CursorError;

/// Errors that can occur while building or loading a bundle.
///
/// Every variant is fatal for the whole operation: a build never writes a
/// partial container and a load never exposes a partial [`ModuleTable`].
///
/// [`ModuleTable`]: crate::ModuleTable
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// File I/O error
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing or wrong magic tag
    #[error("malformed header")]
    MalformedHeader,

    /// Container written by a different format version
    #[error("unsupported version {major}.{minor} (runtime reads {}.{})", crate::VERSION_MAJOR, crate::VERSION_MINOR)]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Entry record ends before its declared fields
    #[error("entry {index} is truncated: {source}")]
    TruncatedEntry {
        index: usize,
        #[source]
        source: CursorError,
    },

    /// Stored entry name is empty or not UTF-8
    #[error("entry {index} has an invalid name {name:?}")]
    MalformedEntryName { index: usize, name: String },

    /// Compression flag byte is neither 0 nor 1
    #[error("entry {index} has invalid compression flag {flag}")]
    InvalidFlag { index: usize, flag: u8 },

    /// Entry payload is not valid base64
    #[error("failed to decode entry {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// Entry payload did not inflate
    #[error("failed to decompress entry {index}: {source}")]
    Decompress {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// Entry payload could not be deflated
    #[error("failed to compress entry '{name}': {source}")]
    Compress {
        name: String,
        #[source]
        source: CodecError,
    },

    /// Entry name given to the writer is empty or contains a NUL byte
    #[error("invalid entry name {0:?}")]
    InvalidEntryName(String),

    /// Two entries share a name
    #[error("duplicate entry '{0}'")]
    DuplicateEntry(String),

    /// Entry count does not fit the 16-bit header field
    #[error("too many entries: {0} (at most {max})", max = u16::MAX)]
    TooManyEntries(usize),

    /// Encoded payload does not fit the 32-bit length field
    #[error("entry '{name}' is too large: {len} encoded bytes")]
    PayloadTooLarge { name: String, len: usize },
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}
