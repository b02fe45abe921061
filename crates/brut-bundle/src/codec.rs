//! Payload transforms: conditional compression and text-safe encoding.
//!
//! Build time runs `compress` then `encode`; load time runs `decode` then,
//! when the entry's flag is set, `decompress`. Payloads are always carried as
//! explicit-length byte slices, so embedded zero bytes survive every step.

use std::io::{Read, Write};

use data_encoding::BASE64;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

/// Payloads at or below this size are never compressed.
pub const MIN_COMPRESS_SIZE: usize = 16;

/// Payloads whose worst-case compressed size (1.5x) falls below this floor
/// are never compressed.
pub const MIN_COMPRESS_BUFFER: usize = 66;

/// Compression level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Initial capacity of the inflate buffer, as a multiple of the input length.
pub const DECOMPRESS_CAPACITY_FACTOR: usize = 4;

/// Errors raised by the payload transforms
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload is not valid base64
    #[error("invalid encoding: {0}")]
    Encoding(#[from] data_encoding::DecodeError),

    /// Compressor or decompressor failed
    #[error("{0}")]
    Stream(#[from] std::io::Error),

    /// Decompression produced no output
    #[error("decompressed to zero bytes")]
    Empty,
}

/// Output of [`compress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub payload: Vec<u8>,
    pub compressed: bool,
}

/// Whether a payload of `len` bytes is worth running through the compressor.
pub fn should_compress(len: usize) -> bool {
    if len <= MIN_COMPRESS_SIZE {
        return false;
    }
    len + len / 2 >= MIN_COMPRESS_BUFFER
}

/// Compress `input` when [`should_compress`] allows it.
///
/// A payload that passes the threshold is stored compressed even when the
/// compressor fails to shrink it.
pub fn compress(input: &[u8], level: u32) -> Result<Compressed, CodecError> {
    if !should_compress(input.len()) {
        return Ok(Compressed {
            payload: input.to_vec(),
            compressed: false,
        });
    }

    let capacity = input.len() + input.len() / 2;
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(capacity), Compression::new(level.min(9)));
    encoder.write_all(input)?;
    Ok(Compressed {
        payload: encoder.finish()?,
        compressed: true,
    })
}

/// Inflate a payload produced by [`compress`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(input.len().saturating_mul(DECOMPRESS_CAPACITY_FACTOR));
    ZlibDecoder::new(input).read_to_end(&mut out)?;
    if out.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(out)
}

/// Encode bytes into the container's text-safe alphabet.
pub fn encode(input: &[u8]) -> String {
    BASE64.encode(input)
}

/// Reverse [`encode`].
pub fn decode(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    Ok(BASE64.decode(input)?)
}
