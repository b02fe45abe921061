//! The `platform` library exposed to scripts.
//!
//! ```lua
//! platform.os       -- "windows" | "darwin" | "unix"
//! platform.arch     -- "x86-64" | "x86" | "arm32" | "arm64" | ...
//! platform.bundle   -- true when modules are served from a container
//! platform.readall(path) -- file contents, or nil
//! ```

use mlua::{Lua, Table};

/// Operating system name as seen by scripts.
pub fn os_name() -> &'static str {
    if cfg!(windows) {
        "windows"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        "unix"
    }
}

/// Architecture name as seen by scripts.
pub fn arch_name() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x86-64",
        "x86" => "x86",
        "arm" => "arm32",
        "aarch64" => "arm64",
        other => other,
    }
}

/// Register `platform` as a global and in `package.loaded`.
pub fn open(lua: &Lua, bundled: bool) -> mlua::Result<()> {
    let platform = lua.create_table()?;

    platform.set(
        "readall",
        lua.create_function(|lua, path: String| match std::fs::read(&path) {
            Ok(data) => lua.create_string(&data).map(Some),
            Err(_) => Ok(None),
        })?,
    )?;
    platform.set("os", os_name())?;
    platform.set("arch", arch_name())?;
    platform.set("bundle", bundled)?;

    let globals = lua.globals();
    let package: Table = globals.get("package")?;
    let loaded: Table = package.get("loaded")?;
    loaded.set("platform", platform.clone())?;
    globals.set("platform", platform)?;
    Ok(())
}
