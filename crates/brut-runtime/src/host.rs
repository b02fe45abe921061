//! Embedded Lua host.
//!
//! Owns the interpreter state for one program run. Module caching lives in
//! the interpreter (`package.loaded`); the host only compiles and calls
//! chunks.

use std::path::Path;

use mlua::{Function, Lua, Table, Variadic};
use tracing::debug;

use crate::error::RuntimeError;
use crate::platform;

/// Interpreter settings.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Whether modules are being served from a container.
    pub bundled: bool,
}

/// A Lua state with the safe standard library and `platform` loaded.
pub struct Host {
    lua: Lua,
}

impl Host {
    /// Create a new host.
    pub fn new(config: &HostConfig) -> Result<Self, RuntimeError> {
        let lua = Lua::new();
        platform::open(&lua, config.bundled).map_err(RuntimeError::host)?;
        Ok(Self { lua })
    }

    /// The underlying interpreter.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Prepend `<dir>/?.lua` to `package.path`.
    pub fn add_search_dir(&self, dir: &Path) -> Result<(), RuntimeError> {
        let package: Table = self.lua.globals().get("package").map_err(RuntimeError::host)?;
        let current: String = package.get("path").map_err(RuntimeError::host)?;

        let template = dir.join("?.lua");
        let path = format!("{};{}", template.to_string_lossy(), current);
        debug!(path = %path, "package.path");
        package.set("path", path).map_err(RuntimeError::host)
    }

    /// Compile a chunk without running it.
    pub fn compile(&self, name: &str, source: &[u8]) -> Result<Function, RuntimeError> {
        self.lua
            .load(source)
            .set_name(chunk_name(name))
            .into_function()
            .map_err(|e| RuntimeError::Load {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Check that `source` compiles.
    pub fn check_syntax(&self, name: &str, source: &[u8]) -> Result<(), RuntimeError> {
        self.compile(name, source).map(|_| ())
    }

    /// Compile and run a chunk, passing `args` as its varargs.
    pub fn exec(&self, name: &str, source: &[u8], args: &[String]) -> Result<(), RuntimeError> {
        let chunk = self.compile(name, source)?;
        debug!(name, args = args.len(), "running chunk");
        chunk
            .call::<()>(Variadic::from_iter(args.iter().cloned()))
            .map_err(|e| RuntimeError::Script(e.to_string()))
    }
}

/// Chunk name used in tracebacks: `main` reports as `main.lua`.
pub(crate) fn chunk_name(module: &str) -> String {
    format!("@{}.{}", module, brut_bundle::SOURCE_EXTENSION)
}
