//! Brut bundle format
//!
//! Packs a directory of script sources into one container file and decodes
//! it back into a [`ModuleTable`]:
//! - **collect**: pick source files out of a directory
//! - **codec**: size-gated compression and base64 encoding of payloads
//! - **format**: header layout, magic and version constants
//! - **writer** / **reader**: container assembly and the sequential decoder
//! - **table**: the in-memory name → bytes table served to the interpreter

pub mod codec;
pub mod collect;
pub mod encoder;
pub mod error;
pub mod format;
pub mod reader;
pub mod table;
pub mod writer;

pub use codec::DEFAULT_COMPRESSION_LEVEL;
pub use collect::{collect_sources, SourceFile};
pub use error::BundleError;
pub use format::{
    BundleHeader, DEFAULT_BUNDLE_FILE, ENTRY_POINT, HEADER_SIZE, MAGIC, SOURCE_EXTENSION,
    VERSION_MAJOR, VERSION_MINOR,
};
pub use reader::{load_bundle_file, read_bundle, LoadedBundle};
pub use table::ModuleTable;
pub use writer::{bundle_directory, write_bundle, write_bundle_file, BuildReport, BundleOptions};
