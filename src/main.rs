//! dirtree entry point.
//!
//! Parses the command line, renders the tree and delivers it.
//!
//! # Exit codes
//!
//! - `0`: success
//! - `1`: invalid arguments or option values
//! - `2`: unusable root directory
//! - `3`: output could not be written

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::io;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dirtree::cli::Args;
use dirtree::error::{CliError, DirtreeError, DirtreeResult, OutputError};
use dirtree::output::execute_output;
use dirtree::render::render;
use dirtree::scan::StdFileSystem;

const EXIT_SUCCESS: u8 = 0;
const EXIT_CLI_ERROR: u8 = 1;
const EXIT_SCAN_ERROR: u8 = 2;
const EXIT_OUTPUT_ERROR: u8 = 3;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            print_error(&e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

fn run() -> DirtreeResult<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().map_err(OutputError::from)?;
            return Ok(());
        }
        Err(e) => return Err(CliError::from(e).into()),
    };

    init_tracing(args.log_level());

    let config = args.into_config()?;
    debug!(root = %config.root_path.display(), "configuration resolved");

    let result = render(&config.root_path, &config.traversal, &StdFileSystem);
    execute_output(&result.content, &config.output)?;
    Ok(())
}

/// Logs go to stderr so stdout carries only the tree.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn error_to_exit_code(err: &DirtreeError) -> u8 {
    match err {
        DirtreeError::Cli(_) | DirtreeError::Config(_) => EXIT_CLI_ERROR,
        DirtreeError::Scan(_) => EXIT_SCAN_ERROR,
        DirtreeError::Output(_) => EXIT_OUTPUT_ERROR,
    }
}

fn print_error(err: &DirtreeError) {
    let prefix = match err {
        DirtreeError::Cli(_) => "CLI error",
        DirtreeError::Config(_) => "Config error",
        DirtreeError::Scan(_) => "Scan error",
        DirtreeError::Output(_) => "Output error",
    };

    eprintln!("dirtree: {prefix}: {err}");

    if matches!(err, DirtreeError::Cli(_)) {
        eprintln!("Hint: run `dirtree --help` to list available options");
    }
}
