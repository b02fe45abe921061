//! Brut runtime
//!
//! Binds the bundle reader to an embedded Lua interpreter: loads a container
//! (or a loose entry file), registers a `require` searcher that serves
//! bundled modules, and runs the program's `main` chunk.

pub mod error;
pub mod host;
pub mod launcher;
pub mod platform;
pub mod resolver;

pub use error::RuntimeError;
pub use host::{Host, HostConfig};
pub use launcher::{Launcher, RunOutcome, RuntimeOptions};
pub use resolver::{BundleResolver, Resolution};
