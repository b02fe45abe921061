//! Brutus command-line tool
//!
//! Ships a directory of Lua sources into a `brut` container and runs
//! programs from a container or from loose `main.lua`.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use brut_runtime::RuntimeError;
use clap::{ArgAction, Parser, Subcommand};
use output::{ColorWhen, StyledOutput};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "BRUT_LOG";

/// Exit status for usage errors, invalid containers, missing programs and
/// failed verification.
const EXIT_FAILURE: u8 = 1;
/// Exit status when `ship` cannot write the container.
const EXIT_BUILD: u8 = 2;
/// Exit status for scripts that fail to load or raise at run time.
const EXIT_SCRIPT: u8 = 2;

#[derive(Parser)]
#[command(name = "brutus")]
#[command(about = "Bundle and run Lua programs", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (bundle format 1.0)"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Program directory when no subcommand is given
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Arguments passed to the program when no subcommand is given
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle every source file in a directory into a container
    Ship {
        /// Directory holding the sources
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Output container path (defaults to <dir>/brut.dat)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// zlib compression level, 0-9
        #[arg(long, default_value_t = brut_bundle::DEFAULT_COMPRESSION_LEVEL,
              value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
        /// Skip the syntax check of every source
        #[arg(long)]
        no_check: bool,
    },

    /// Run the program in a directory (the default command)
    Run {
        /// Program directory (defaults to the executable's directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Arguments to pass to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Check that containers load and have an entry point
    Verify {
        /// Container files, or directories to scan for *.dat
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors must not share the script-error status.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    let mut out = StyledOutput::new(cli.color.choice());

    let (result, failure) = match cli.command {
        Some(Commands::Ship {
            dir,
            output,
            level,
            no_check,
        }) => (
            commands::ship::execute(
                commands::ship::ShipArgs {
                    dir,
                    output,
                    level,
                    check: !no_check,
                },
                &mut out,
            ),
            EXIT_BUILD,
        ),
        Some(Commands::Run { dir, args }) => (
            commands::run::execute(commands::run::RunArgs { dir, args }),
            EXIT_FAILURE,
        ),
        Some(Commands::Verify { paths }) => (commands::verify::execute(&paths, &mut out), EXIT_FAILURE),
        None => (
            commands::run::execute(commands::run::RunArgs {
                dir: cli.dir,
                args: cli.args,
            }),
            EXIT_FAILURE,
        ),
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out.error(&format!("{:#}", e));
            ExitCode::from(exit_status(&e, failure))
        }
    };
    out.flush();
    code
}

/// Status for a failed command; `failure` applies unless a script failed.
fn exit_status(error: &anyhow::Error, failure: u8) -> u8 {
    match error.downcast_ref::<RuntimeError>() {
        Some(RuntimeError::Load { .. }) | Some(RuntimeError::Script(_)) => EXIT_SCRIPT,
        _ => failure,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
