//! Container format
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  "brut"          4 bytes     │
//! │  major           u8          │
//! │  minor           u8          │
//! │  entry count     u16 (LE)    │
//! ├──────────────────────────────┤
//! │  name            NUL-term.   │  ┐
//! │  compressed      u8 (0|1)    │  │ repeated
//! │  payload length  u32 (LE)    │  │ `entry count`
//! │  payload         base64      │  ┘ times
//! └──────────────────────────────┘
//! ```
//!
//! The payload length counts encoded bytes. There is no index; readers walk
//! the records in order.

use crate::encoder::{BundleReader, BundleWriter};
use crate::error::BundleError;

/// Magic bytes identifying a container.
pub const MAGIC: [u8; 4] = *b"brut";

/// Format major version written and accepted by this build.
pub const VERSION_MAJOR: u8 = 1;

/// Format minor version written and accepted by this build.
pub const VERSION_MINOR: u8 = 0;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Conventional container file name.
pub const DEFAULT_BUNDLE_FILE: &str = "brut.dat";

/// Entry run as the program's top-level script.
pub const ENTRY_POINT: &str = "main";

/// Extension of the source files that get bundled.
pub const SOURCE_EXTENSION: &str = "lua";

/// Fixed-size header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    pub major: u8,
    pub minor: u8,
    pub entry_count: u16,
}

impl BundleHeader {
    /// Header for a container of `entry_count` entries at the current version.
    pub fn new(entry_count: u16) -> Self {
        Self {
            major: VERSION_MAJOR,
            minor: VERSION_MINOR,
            entry_count,
        }
    }

    /// Whether this header's version is exactly the compiled version.
    ///
    /// There is no partial compatibility in either direction.
    pub fn is_supported(&self) -> bool {
        self.major == VERSION_MAJOR && self.minor == VERSION_MINOR
    }

    /// Write the header.
    pub fn encode(&self, writer: &mut BundleWriter) {
        writer.emit_bytes(&MAGIC);
        writer.emit_u8(self.major);
        writer.emit_u8(self.minor);
        writer.emit_u16(self.entry_count);
    }

    /// Read and validate the header, leaving the cursor on the first record.
    pub fn decode(reader: &mut BundleReader<'_>) -> Result<Self, BundleError> {
        let magic = reader
            .read_bytes(MAGIC.len())
            .map_err(|_| BundleError::MalformedHeader)?;
        if magic != MAGIC {
            return Err(BundleError::MalformedHeader);
        }

        let major = reader.read_u8().map_err(|_| BundleError::MalformedHeader)?;
        let minor = reader.read_u8().map_err(|_| BundleError::MalformedHeader)?;
        let header = Self {
            major,
            minor,
            entry_count: 0,
        };
        if !header.is_supported() {
            return Err(BundleError::UnsupportedVersion { major, minor });
        }

        let entry_count = reader.read_u16().map_err(|_| BundleError::MalformedHeader)?;
        Ok(Self {
            entry_count,
            ..header
        })
    }
}
