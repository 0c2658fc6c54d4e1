//! # CLI Command Implementations
//!
//! Each subcommand of `repo-editor` lives in its own file with:
//! - An `Args` struct deriving `clap::Args`.
//! - An `execute` function taking the parsed `Args` and the global
//!   `--color` value.
//!
//! The commands are thin: they load the configuration, call into the
//! `repo_editor` library, and print a human-readable result.

pub mod apply;
pub mod ls;
pub mod validate;

use anyhow::{Context, Result};
use repo_editor::config::{self, EditorConfig};
use std::path::Path;

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}
