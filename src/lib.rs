//! `fnr` walks a directory tree and performs regex find/replace in the files it selects.
//!
//! The pipeline is linear and single-threaded:
//!
//! - `config`: merges command-line/environment input with an optional YAML file
//!   into validated `Settings`.
//! - `walker`: lists the files whose relative path passes the include/exclude filter.
//! - `replacer`: applies each find/replace rule across the file list, rewriting
//!   files whose content changed, and counts the modifications.
//! - `output`: publishes the count in the GitHub Actions output format.

pub mod cli;
pub mod config;
pub mod errors;
pub mod output;
pub mod replacer;
pub mod walker;

pub use config::Settings;
pub use errors::{Error, Result};
pub use replacer::{Replacer, Rule, RunSummary};
pub use walker::{FileFilter, list_files};

/// Runs a full find/replace pass for the given settings.
pub fn run(settings: Settings) -> Result<RunSummary> {
    let files = list_files(&settings.dir, &settings.filter)?;
    tracing::debug!("{} files selected under {}", files.len(), settings.dir.display());
    Replacer::new(settings.rules).run(&files)
}
