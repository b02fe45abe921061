//! Runtime error types.

use std::path::PathBuf;

use brut_bundle::BundleError;

/// Errors that can occur while loading or running a program.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Container present but unreadable or invalid
    #[error("{0}")]
    Bundle(#[from] BundleError),

    /// File I/O error
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Interpreter setup failed
    #[error("Host error: {0}")]
    Host(String),

    /// Chunk failed to compile
    #[error("failed to load '{name}': {message}")]
    Load { name: String, message: String },

    /// Chunk raised an error while running
    #[error("{0}")]
    Script(String),

    /// Neither a container nor the fallback source exists
    #[error("no {bundle} or {fallback} found in {}", dir.display())]
    NothingToRun {
        dir: PathBuf,
        bundle: String,
        fallback: String,
    },
}

impl RuntimeError {
    pub(crate) fn host(e: mlua::Error) -> Self {
        RuntimeError::Host(e.to_string())
    }
}
