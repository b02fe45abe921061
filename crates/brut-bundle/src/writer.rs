//! Bundle writer
//!
//! Turns an ordered list of (name, source) pairs into container bytes:
//! 1. Validate names and count
//! 2. Compress each payload when the size policy allows
//! 3. Encode each payload to the text-safe alphabet
//! 4. Emit header and records
//!
//! The whole container is assembled in memory before anything touches disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{self, DEFAULT_COMPRESSION_LEVEL};
use crate::collect::collect_sources;
use crate::encoder::BundleWriter;
use crate::error::BundleError;
use crate::format::{BundleHeader, HEADER_SIZE, SOURCE_EXTENSION};

/// Build-time settings.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// zlib level (0-9) for payloads that pass the size policy.
    pub compression_level: u32,
    /// Extension of the files picked up by [`bundle_directory`].
    pub extension: String,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Entry names in container order.
    pub entries: Vec<String>,
    /// How many entries were stored compressed.
    pub compressed: usize,
    /// Size of the container in bytes.
    pub size: usize,
}

/// Encode `entries` into container bytes.
///
/// Entries are written in the order given. Names must be unique, non-empty
/// and free of NUL bytes.
pub fn write_bundle<I, N, B>(entries: I, options: &BundleOptions) -> Result<Vec<u8>, BundleError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    encode_bundle(entries, options).map(|(bytes, _)| bytes)
}

/// Encode `entries` and write them to `path`.
///
/// The container is written to a sibling temporary file and renamed into
/// place, so `path` either keeps its previous contents or holds the complete
/// new container.
pub fn write_bundle_file<I, N, B>(
    path: &Path,
    entries: I,
    options: &BundleOptions,
) -> Result<BuildReport, BundleError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let (bytes, report) = encode_bundle(entries, options)?;
    persist(path, &bytes)?;
    info!(
        path = %path.display(),
        entries = report.entries.len(),
        bytes = report.size,
        "wrote bundle"
    );
    Ok(report)
}

/// Bundle every source file in `dir` into a container at `output`.
pub fn bundle_directory(
    dir: &Path,
    output: &Path,
    options: &BundleOptions,
) -> Result<BuildReport, BundleError> {
    let sources = collect_sources(dir, &options.extension)?;
    write_bundle_file(
        output,
        sources.iter().map(|s| (s.name.as_str(), s.contents.as_slice())),
        options,
    )
}

fn encode_bundle<I, N, B>(
    entries: I,
    options: &BundleOptions,
) -> Result<(Vec<u8>, BuildReport), BundleError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let entries: Vec<(N, B)> = entries.into_iter().collect();
    let count = u16::try_from(entries.len()).map_err(|_| BundleError::TooManyEntries(entries.len()))?;

    let mut seen = HashSet::with_capacity(entries.len());
    for (name, _) in &entries {
        let name = name.as_ref();
        validate_name(name)?;
        if !seen.insert(name) {
            return Err(BundleError::DuplicateEntry(name.to_string()));
        }
    }

    let mut writer = BundleWriter::with_capacity(HEADER_SIZE);
    BundleHeader::new(count).encode(&mut writer);

    let mut report = BuildReport {
        entries: Vec::with_capacity(entries.len()),
        compressed: 0,
        size: 0,
    };

    for (name, contents) in &entries {
        let name = name.as_ref();
        let contents = contents.as_ref();

        let compressed = codec::compress(contents, options.compression_level).map_err(|source| {
            BundleError::Compress {
                name: name.to_string(),
                source,
            }
        })?;
        let encoded = codec::encode(&compressed.payload);
        drop(compressed.payload);

        let len = u32::try_from(encoded.len()).map_err(|_| BundleError::PayloadTooLarge {
            name: name.to_string(),
            len: encoded.len(),
        })?;

        debug!(
            name,
            raw = contents.len(),
            encoded = len,
            compressed = compressed.compressed,
            "encoded entry"
        );

        writer.emit_cstr(name.as_bytes());
        writer.emit_u8(compressed.compressed as u8);
        writer.emit_u32(len);
        writer.emit_bytes(encoded.as_bytes());

        if compressed.compressed {
            report.compressed += 1;
        }
        report.entries.push(name.to_string());
    }

    let bytes = writer.into_bytes();
    report.size = bytes.len();
    Ok((bytes, report))
}

fn validate_name(name: &str) -> Result<(), BundleError> {
    if name.is_empty() || name.contains('\0') {
        return Err(BundleError::InvalidEntryName(name.to_string()));
    }
    Ok(())
}

fn persist(path: &Path, bytes: &[u8]) -> Result<(), BundleError> {
    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|e| BundleError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(BundleError::io(path, e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
