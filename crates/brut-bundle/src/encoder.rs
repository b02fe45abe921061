//! Byte-level encoding and decoding for the container layout
//!
//! The container has no table of contents: record boundaries fall out of
//! advancing a cursor by each field's declared width. [`BundleWriter`] and
//! [`BundleReader`] are the only two places that know those widths.

use thiserror::Error;

/// Errors raised by [`BundleReader`]
#[derive(Debug, Error)]
pub enum CursorError {
    /// Unexpected end of the container
    #[error("unexpected end of data at offset {0}")]
    UnexpectedEnd(usize),

    /// A NUL-terminated field has no terminator
    #[error("unterminated string at offset {0}")]
    Unterminated(usize),
}

/// Little-endian writer over a growable buffer
pub struct BundleWriter {
    buffer: Vec<u8>,
}

impl BundleWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new writer with capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Current offset (number of bytes written)
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    /// Emit a raw byte
    pub fn emit_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Emit a 16-bit unsigned integer (little-endian)
    pub fn emit_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a 32-bit unsigned integer (little-endian)
    pub fn emit_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit raw bytes with no length prefix
    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Emit bytes followed by a NUL terminator.
    ///
    /// The caller guarantees `bytes` holds no NUL of its own.
    pub fn emit_cstr(&mut self, bytes: &[u8]) {
        debug_assert!(!bytes.contains(&0));
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(0);
    }
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward-only reader over a container buffer
pub struct BundleReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BundleReader<'a> {
    /// Create a new reader
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current position in the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Remaining bytes in the buffer
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    /// Read a 16-bit unsigned integer (little-endian)
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a 32-bit unsigned integer (little-endian)
    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read exactly `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(CursorError::UnexpectedEnd(self.position))?;
        let bytes = &self.buffer[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read bytes up to a NUL terminator, consuming the terminator
    pub fn read_cstr(&mut self) -> Result<&'a [u8], CursorError> {
        let rest = &self.buffer[self.position.min(self.buffer.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(CursorError::Unterminated(self.position))?;
        let bytes = &rest[..len];
        self.position += len + 1;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
