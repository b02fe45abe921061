//! Bundle reader
//!
//! Walks a container front to back:
//! 1. Validate magic and version
//! 2. Read the entry count
//! 3. For each record: name, flag, length, payload → decode → inflate
//! 4. Hand back the complete [`ModuleTable`]
//!
//! Any failure discards everything decoded so far.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::codec;
use crate::encoder::BundleReader;
use crate::error::BundleError;
use crate::format::BundleHeader;
use crate::table::ModuleTable;

/// A fully decoded container.
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub header: BundleHeader,
    pub table: ModuleTable,
}

impl LoadedBundle {
    /// The `main` entry, if present.
    ///
    /// A container without one is still valid; whether that is fatal is up
    /// to the caller.
    pub fn entry_point(&self) -> Option<&[u8]> {
        self.table.entry_point()
    }

    /// Consume the bundle and keep only its table.
    pub fn into_table(self) -> ModuleTable {
        self.table
    }
}

/// Decode container bytes.
pub fn read_bundle(data: &[u8]) -> Result<LoadedBundle, BundleError> {
    let mut reader = BundleReader::new(data);
    let header = BundleHeader::decode(&mut reader)?;

    let count = usize::from(header.entry_count);
    let mut table = ModuleTable::with_capacity(count);
    for index in 0..count {
        let (name, bytes) = read_entry(&mut reader, index)?;
        table.insert(name, bytes);
    }

    Ok(LoadedBundle { header, table })
}

/// Read and decode the container at `path`.
pub fn load_bundle_file(path: &Path) -> Result<LoadedBundle, BundleError> {
    let data = fs::read(path).map_err(|e| BundleError::io(path, e))?;
    let bundle = read_bundle(&data)?;
    info!(
        path = %path.display(),
        entries = bundle.table.len(),
        "loaded bundle"
    );
    Ok(bundle)
}

fn read_entry(reader: &mut BundleReader<'_>, index: usize) -> Result<(String, Vec<u8>), BundleError> {
    let truncated = |source| BundleError::TruncatedEntry { index, source };

    let raw_name = reader.read_cstr().map_err(truncated)?;
    let name = std::str::from_utf8(raw_name)
        .ok()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BundleError::MalformedEntryName {
            index,
            name: String::from_utf8_lossy(raw_name).into_owned(),
        })?
        .to_string();

    let compressed = match reader.read_u8().map_err(truncated)? {
        0 => false,
        1 => true,
        flag => return Err(BundleError::InvalidFlag { index, flag }),
    };
    let len = reader.read_u32().map_err(truncated)? as usize;
    let encoded = reader.read_bytes(len).map_err(truncated)?;

    let decoded = codec::decode(encoded).map_err(|source| BundleError::Decode { index, source })?;
    let bytes = if compressed {
        codec::decompress(&decoded).map_err(|source| BundleError::Decompress { index, source })?
    } else {
        decoded
    };

    debug!(index, name = %name, encoded = len, bytes = bytes.len(), compressed, "decoded entry");
    Ok((name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::BundleWriter;
    use crate::writer::{write_bundle, BundleOptions};

    fn raw_entry(writer: &mut BundleWriter, name: &str, compressed: bool, payload: &[u8]) {
        writer.emit_cstr(name.as_bytes());
        writer.emit_u8(compressed as u8);
        writer.emit_u32(payload.len() as u32);
        writer.emit_bytes(payload);
    }

    #[test]
    fn test_read_written_bundle() {
        let bytes = write_bundle(
            [("a", b"x=1".as_slice()), ("main", b"print(1)".as_slice())],
            &BundleOptions::default(),
        )
        .unwrap();

        let bundle = read_bundle(&bytes).unwrap();
        assert_eq!(bundle.header.entry_count, 2);
        assert_eq!(bundle.table.lookup("a"), Some(&b"x=1"[..]));
        assert_eq!(bundle.entry_point(), Some(&b"print(1)"[..]));
    }

    #[test]
    fn test_decode_failure_reports_index() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(2).encode(&mut writer);
        raw_entry(&mut writer, "ok", false, codec::encode(b"fine").as_bytes());
        raw_entry(&mut writer, "bad", false, b"!!not base64!!");

        match read_bundle(writer.buffer()) {
            Err(BundleError::Decode { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decompress_failure_reports_index() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(1).encode(&mut writer);
        raw_entry(&mut writer, "main", true, codec::encode(b"not zlib at all").as_bytes());

        match read_bundle(writer.buffer()) {
            Err(BundleError::Decompress { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected Decompress error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_payload() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(1).encode(&mut writer);
        writer.emit_cstr(b"main");
        writer.emit_u8(0);
        writer.emit_u32(100);
        writer.emit_bytes(b"cHJp");

        assert!(matches!(
            read_bundle(writer.buffer()),
            Err(BundleError::TruncatedEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_count_exceeds_records() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(3).encode(&mut writer);
        raw_entry(&mut writer, "main", false, codec::encode(b"print(1)").as_bytes());

        assert!(matches!(
            read_bundle(writer.buffer()),
            Err(BundleError::TruncatedEntry { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_name_reports_index() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(2).encode(&mut writer);
        raw_entry(&mut writer, "main", false, codec::encode(b"print(1)").as_bytes());
        raw_entry(&mut writer, "", false, b"");

        assert!(matches!(
            read_bundle(writer.buffer()),
            Err(BundleError::MalformedEntryName { index: 1, .. })
        ));
    }

    #[test]
    fn test_non_utf8_name_reports_index() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(1).encode(&mut writer);
        writer.emit_cstr(&[0xff, 0xfe]);
        writer.emit_u8(0);
        writer.emit_u32(0);

        assert!(matches!(
            read_bundle(writer.buffer()),
            Err(BundleError::MalformedEntryName { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let mut writer = BundleWriter::new();
        BundleHeader::new(2).encode(&mut writer);
        raw_entry(&mut writer, "a", false, codec::encode(b"x=1").as_bytes());
        writer.emit_cstr(b"main");
        writer.emit_u8(2);
        let payload = codec::encode(b"print(1)");
        writer.emit_u32(payload.len() as u32);
        writer.emit_bytes(payload.as_bytes());

        match read_bundle(writer.buffer()) {
            Err(BundleError::InvalidFlag { index, flag }) => assert_eq!((index, flag), (1, 2)),
            other => panic!("expected InvalidFlag, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_main_is_not_an_error() {
        let bytes = write_bundle([("lib", b"return 1".as_slice())], &BundleOptions::default()).unwrap();
        let bundle = read_bundle(&bytes).unwrap();
        assert!(bundle.entry_point().is_none());
        assert_eq!(bundle.into_table().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_bundle_file(&dir.path().join("brut.dat")),
            Err(BundleError::Io { .. })
        ));
    }
}
