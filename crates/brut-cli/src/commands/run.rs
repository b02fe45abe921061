//! `brutus run`: run the bundled program, or the loose `main.lua`.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use brut_runtime::{Launcher, RunOutcome, RuntimeOptions};
use tracing::debug;

pub struct RunArgs {
    /// Program directory; defaults to the directory holding the executable.
    pub dir: Option<PathBuf>,
    /// Arguments passed through to the entry chunk.
    pub args: Vec<String>,
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let base_dir = match args.dir {
        Some(dir) => dir,
        None => exe_dir()?,
    };
    // Absolute before the chdir below, so the launcher sees the same directory.
    let base_dir = std::fs::canonicalize(&base_dir)
        .with_context(|| format!("unable to resolve program directory {}", base_dir.display()))?;

    // Scripts resolve relative paths against the program directory.
    std::env::set_current_dir(&base_dir)
        .with_context(|| format!("unable to set working directory to {}", base_dir.display()))?;

    let launcher = Launcher::new(RuntimeOptions {
        base_dir: base_dir.clone(),
        ..RuntimeOptions::default()
    });

    match launcher.run(&args.args)? {
        RunOutcome::Bundled { modules } => debug!(modules, "program finished"),
        RunOutcome::Loose => debug!("program finished"),
        RunOutcome::NoEntryPoint => debug!(dir = %base_dir.display(), "bundle has no main entry"),
    }
    Ok(())
}

fn exe_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to locate executable")?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow!("executable path {} has no parent", exe.display()))
}
