//! Source collection for bundling.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BundleError;

/// A source file picked up for bundling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Entry name: the file name minus its extension.
    pub name: String,
    /// Where the file was read from.
    pub path: PathBuf,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

/// Collect every regular file in `dir` ending in `.{extension}`.
///
/// Only `dir` itself is scanned, not its subdirectories. Files come back in
/// directory listing order, which is platform dependent. Any matched file
/// that cannot be read fails the whole collection.
pub fn collect_sources(dir: &Path, extension: &str) -> Result<Vec<SourceFile>, BundleError> {
    let suffix = format!(".{}", extension);
    let listing = fs::read_dir(dir).map_err(|e| BundleError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|e| BundleError::io(dir, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| BundleError::io(&path, e))?;
        if file_type.is_dir() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        let Some(name) = entry_name(&file_name, &suffix) else {
            continue;
        };
        if name.is_empty() {
            warn!(path = %path.display(), "skipping file with empty name");
            continue;
        }

        let contents = fs::read(&path).map_err(|e| BundleError::io(&path, e))?;
        debug!(name, bytes = contents.len(), "collected source");
        sources.push(SourceFile {
            name: name.to_string(),
            path,
            contents,
        });
    }

    Ok(sources)
}

/// Strip exactly one trailing `suffix` from `file_name`.
fn entry_name<'a>(file_name: &'a str, suffix: &str) -> Option<&'a str> {
    file_name.strip_suffix(suffix)
}
