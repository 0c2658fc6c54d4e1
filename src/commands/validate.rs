//! # Validate Command Implementation
//!
//! Parses and validates a `repo-editor.yaml` configuration file without
//! contacting the remote host, then prints what a run would target.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_editor::config::{self, ProjectFilter, DEFAULT_CONFIG_FILENAME};
use repo_editor::output::{Marker, OutputConfig};

/// Validate a repo-editor configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate.
    #[arg(short, long, value_name = "FILE", env = "REPO_EDITOR_CONFIG", default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = &args.config;

    let config = match config::from_file(config_path) {
        Ok(config) => {
            println!(
                "{} Configuration is valid: {}",
                out.marker(Marker::Ok),
                config_path.display()
            );
            config
        }
        Err(e) => {
            println!("{} Configuration is invalid: {}", out.marker(Marker::Error), e);
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    let filter = match config.project_filter() {
        ProjectFilter::All => "all repositories",
        ProjectFilter::TestOnly => "test repositories only",
        ProjectFilter::CodeOnly => "code repositories only",
    };

    println!("\n{} Configuration Summary:", out.marker(Marker::Info));
    println!(
        "   Groups: {}",
        config
            .group_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("   Targets: {}", filter);
    println!("   Branch: {}", config.branch);
    println!("   Commit message: {}", config.commit_message);
    println!("   Asset root: {}", config.asset_root.display());

    if !config.asset_root.is_dir() {
        println!(
            "{} Asset root {} does not exist (relative to the working directory)",
            out.marker(Marker::Warn),
            config.asset_root.display()
        );
    }
    if config.test_run {
        println!(
            "{} testRun is set; apply will only print the plan",
            out.marker(Marker::Info)
        );
    }
    Ok(())
}
