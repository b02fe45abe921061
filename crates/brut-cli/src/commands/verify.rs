//! `brutus verify`: check that containers load and have an entry point.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use brut_bundle::load_bundle_file;

use crate::output::StyledOutput;

/// Extension of container files picked up from directories.
const BUNDLE_EXTENSION: &str = "dat";

pub fn execute(paths: &[PathBuf], out: &mut StyledOutput) -> anyhow::Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(bundles_in(path)?);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        bail!("no bundles found");
    }

    out.line(&format!("running {} check(s)...", files.len()));

    let mut passed = 0;
    for file in &files {
        match check(file) {
            Ok(modules) => {
                passed += 1;
                out.pass(&format!("{} ({} modules)", file.display(), modules));
            }
            Err(reason) => out.fail(&format!("{}: {}", file.display(), reason)),
        }
    }

    out.line(&format!("{}/{} ok", passed, files.len()));
    if passed != files.len() {
        bail!("{} of {} bundle(s) failed", files.len() - passed, files.len());
    }
    Ok(())
}

/// Load one container; it passes when it decodes and has a non-empty `main`.
fn check(path: &Path) -> Result<usize, String> {
    let bundle = load_bundle_file(path).map_err(|e| e.to_string())?;
    match bundle.entry_point() {
        Some(main) if !main.is_empty() => Ok(bundle.table.len()),
        _ => Err("no entry point".to_string()),
    }
}

fn bundles_in(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let listing = std::fs::read_dir(dir).with_context(|| format!("unable to list {}", dir.display()))?;
    for entry in listing {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == BUNDLE_EXTENSION) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
