//! Module resolver hook
//!
//! Serves `require` from a [`ModuleTable`] by registering a native searcher
//! in `package.searchers`. Lookup order for `require(name)`:
//! 1. `package.loaded` (the interpreter's own cache)
//! 2. `package.preload`
//! 3. the bundle
//! 4. `package.path` on disk, then any remaining searchers
//!
//! Names the table does not hold fall through to step 4 untouched.

use std::rc::Rc;

use brut_bundle::ModuleTable;
use mlua::{IntoLuaMulti, Table};
use tracing::debug;

use crate::error::RuntimeError;
use crate::host::{chunk_name, Host};

/// Position of the standard preload searcher in `package.searchers`.
const PRELOAD_SEARCHER: i64 = 1;

/// Outcome of looking a module name up in the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The bundle holds this module.
    Bundled(&'a [u8]),
    /// Not bundled; defer to the interpreter's default search.
    Fallback,
}

/// Resolves module names against a shared [`ModuleTable`].
#[derive(Debug, Clone)]
pub struct BundleResolver {
    table: Rc<ModuleTable>,
}

impl BundleResolver {
    pub fn new(table: Rc<ModuleTable>) -> Self {
        Self { table }
    }

    /// Look `name` up in the table.
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        match self.table.lookup(name) {
            Some(bytes) => Resolution::Bundled(bytes),
            None => Resolution::Fallback,
        }
    }

    /// Register this resolver with `host`'s `require`.
    pub fn install(self, host: &Host) -> Result<(), RuntimeError> {
        let lua = host.lua();

        let searcher = lua
            .create_function(move |lua, name: String| match self.resolve(&name) {
                Resolution::Bundled(bytes) => {
                    debug!(module = %name, bytes = bytes.len(), "serving bundled module");
                    let loader = lua.load(bytes).set_name(chunk_name(&name)).into_function()?;
                    (loader, format!("bundle:{}", name)).into_lua_multi(lua)
                }
                Resolution::Fallback => format!("no entry '{}' in bundle", name).into_lua_multi(lua),
            })
            .map_err(RuntimeError::host)?;

        let package: Table = lua.globals().get("package").map_err(RuntimeError::host)?;
        let searchers: Table = package.get("searchers").map_err(RuntimeError::host)?;
        searchers
            .raw_insert(PRELOAD_SEARCHER + 1, searcher)
            .map_err(RuntimeError::host)?;

        debug!(searchers = searchers.raw_len(), "installed bundle searcher");
        Ok(())
    }
}
