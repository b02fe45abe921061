//! `brutus ship`: bundle a directory of sources into a container.

use std::path::PathBuf;

use anyhow::Context;
use brut_bundle::{collect_sources, write_bundle_file, BundleOptions, DEFAULT_BUNDLE_FILE, ENTRY_POINT};
use brut_runtime::{Host, HostConfig};

use crate::output::StyledOutput;

pub struct ShipArgs {
    pub dir: PathBuf,
    pub output: Option<PathBuf>,
    pub level: u32,
    pub check: bool,
}

pub fn execute(args: ShipArgs, out: &mut StyledOutput) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| args.dir.join(DEFAULT_BUNDLE_FILE));
    let options = BundleOptions {
        compression_level: args.level,
        ..BundleOptions::default()
    };

    let sources = collect_sources(&args.dir, &options.extension)
        .with_context(|| format!("unable to create {}", output.display()))?;

    // A script that does not compile aborts the build before anything is written.
    if args.check {
        let host = Host::new(&HostConfig::default())?;
        for source in &sources {
            host.check_syntax(&source.name, &source.contents)
                .with_context(|| format!("unable to add '{}' to {}", source.path.display(), output.display()))?;
        }
    }

    for source in &sources {
        out.status("Processing", &format!("{}.{}", source.name, options.extension));
    }
    if !sources.iter().any(|s| s.name == ENTRY_POINT) {
        out.warning(&format!(
            "no {}.{} in {}; the bundle has no entry point",
            ENTRY_POINT,
            options.extension,
            args.dir.display()
        ));
    }

    let report = write_bundle_file(
        &output,
        sources.iter().map(|s| (s.name.as_str(), s.contents.as_slice())),
        &options,
    )
    .with_context(|| format!("unable to create {}", output.display()))?;

    out.status("Wrote", &output.display().to_string());
    out.detail(&format!(
        "{} entries, {} compressed, {} bytes",
        report.entries.len(),
        report.compressed,
        report.size
    ));
    Ok(())
}
