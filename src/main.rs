//! # Repo Editor CLI
//!
//! This is the binary entry point for the `repo-editor` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Executing the selected command and turning errors into exit code 1.
//!
//! All edit logic lives in the `repo_editor` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
