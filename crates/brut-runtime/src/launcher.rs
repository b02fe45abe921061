//! Program launcher
//!
//! Decides how a program runs from what sits in its directory:
//! - a container → load it, install the resolver, run its `main` entry
//! - no container → run the loose fallback source file
//!
//! A container that exists but fails to load is an error, never a reason to
//! fall back to loose files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use brut_bundle::{load_bundle_file, DEFAULT_BUNDLE_FILE, ENTRY_POINT, SOURCE_EXTENSION};
use tracing::{debug, info};

use crate::error::RuntimeError;
use crate::host::{Host, HostConfig};
use crate::resolver::BundleResolver;

/// Where and what to run.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Directory holding the container or loose sources.
    pub base_dir: PathBuf,
    /// Container file name inside `base_dir`.
    pub bundle_file: String,
    /// Loose entry file run when no container exists.
    pub fallback_file: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            bundle_file: DEFAULT_BUNDLE_FILE.to_string(),
            fallback_file: format!("{}.{}", ENTRY_POINT, SOURCE_EXTENSION),
        }
    }
}

/// How a successful run went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Ran `main` from a container holding `modules` entries.
    Bundled { modules: usize },
    /// Ran the loose fallback file.
    Loose,
    /// The container loaded but has no (or an empty) `main` entry.
    NoEntryPoint,
}

/// Runs a program according to [`RuntimeOptions`].
pub struct Launcher {
    options: RuntimeOptions,
}

impl Launcher {
    pub fn new(options: RuntimeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Path of the container this launcher looks for.
    pub fn bundle_path(&self) -> PathBuf {
        self.options.base_dir.join(&self.options.bundle_file)
    }

    /// Path of the loose fallback file.
    pub fn fallback_path(&self) -> PathBuf {
        self.options.base_dir.join(&self.options.fallback_file)
    }

    /// Whether anything sits at the container path.
    ///
    /// Only a missing entry counts as "no container". A directory or a
    /// dangling symlink under that name is present and fails when loaded.
    pub fn is_bundled(&self) -> Result<bool, RuntimeError> {
        let path = self.bundle_path();
        match fs::symlink_metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(RuntimeError::Io { path, source }),
        }
    }

    /// Run the program, passing `args` to its entry chunk.
    pub fn run(&self, args: &[String]) -> Result<RunOutcome, RuntimeError> {
        let bundle_path = self.bundle_path();
        if self.is_bundled()? {
            self.run_bundle(&bundle_path, args)
        } else {
            debug!(path = %bundle_path.display(), "no bundle, using loose sources");
            self.run_loose(args)
        }
    }

    fn run_bundle(&self, path: &Path, args: &[String]) -> Result<RunOutcome, RuntimeError> {
        let table = Rc::new(load_bundle_file(path)?.into_table());

        let host = Host::new(&HostConfig { bundled: true })?;
        host.add_search_dir(&self.options.base_dir)?;
        BundleResolver::new(Rc::clone(&table)).install(&host)?;

        match table.entry_point() {
            Some(main) if !main.is_empty() => {
                info!(modules = table.len(), "running bundled program");
                host.exec(ENTRY_POINT, main, args)?;
                Ok(RunOutcome::Bundled {
                    modules: table.len(),
                })
            }
            _ => {
                info!(path = %path.display(), "bundle has no entry point");
                Ok(RunOutcome::NoEntryPoint)
            }
        }
    }

    fn run_loose(&self, args: &[String]) -> Result<RunOutcome, RuntimeError> {
        let path = self.fallback_path();
        let source = match fs::read(&path) {
            Ok(source) if !source.is_empty() => source,
            Ok(_) => return Err(self.nothing_to_run()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.nothing_to_run()),
            Err(source) => return Err(RuntimeError::Io { path, source }),
        };

        let host = Host::new(&HostConfig { bundled: false })?;
        host.add_search_dir(&self.options.base_dir)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(ENTRY_POINT);
        info!(path = %path.display(), "running loose program");
        host.exec(name, &source, args)?;
        Ok(RunOutcome::Loose)
    }

    fn nothing_to_run(&self) -> RuntimeError {
        RuntimeError::NothingToRun {
            dir: self.options.base_dir.clone(),
            bundle: self.options.bundle_file.clone(),
            fallback: self.options.fallback_file.clone(),
        }
    }
}
