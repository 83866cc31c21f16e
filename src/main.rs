//! # plugin-publish CLI
//!
//! Binary entry point: parses arguments with `clap` and runs a release.
//! The release logic lives in the library crate; this binary only wires up
//! logging and turns the publish report into an exit status.

mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    cli.execute()
}
