//! The main entry point for the `fnr` command-line application.
//!
//! Parses arguments, runs one find/replace pass and reports the number of
//! modified files. Any error ends the process with exit code 1 and no count.

use fnr::cli::{self, Args};
use fnr::errors::Result;
use fnr::{Settings, output};
use std::process;
use tracing::Level;

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::resolve(args)?;
    let summary = fnr::run(settings)?;
    tracing::debug!("{} files considered per rule", summary.files);
    output::emit(summary.modified())
}
