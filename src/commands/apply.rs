//! Apply command implementation
//!
//! The apply command runs the whole edit pipeline:
//! 1. Load and validate the configuration
//! 2. Discover and classify the assets
//! 3. Verify the configured groups and resolve the target repositories
//! 4. Write every applicable asset into every target repository
//!
//! With `--dry-run` (or `testRun: true` in the configuration) step 4 is
//! replaced by printing the edit plan.

use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use repo_editor::asset::AssetCatalog;
use repo_editor::config::DEFAULT_CONFIG_FILENAME;
use repo_editor::gitlab::GitLabClient;
use repo_editor::orchestrator::{CommitOrchestrator, EditPlan, EditSummary};
use repo_editor::output::{Marker, OutputConfig};
use repo_editor::projects::ProjectResolver;

use super::load_config;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "REPO_EDITOR_CONFIG", default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Asset directory, overriding `assetRoot` from the configuration
    #[arg(long, value_name = "DIR")]
    pub asset_root: Option<PathBuf>,

    /// GitLab host, e.g. https://gitlab.example.com
    #[arg(long, value_name = "URL", env = "GITLAB_HOST")]
    pub host: Option<String>,

    /// GitLab private access token
    #[arg(long, value_name = "TOKEN", env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Show what would be written without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors, including info and warning log lines
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, color_flag: &str) -> Result<()> {
    let start_time = Instant::now();
    let out = OutputConfig::from_env_and_flag(color_flag);
    if args.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    let mut config = load_config(&args.config)?;
    if let Some(asset_root) = args.asset_root {
        config.asset_root = asset_root;
    }
    let dry_run = args.dry_run || config.test_run;

    let host = args
        .host
        .ok_or_else(|| anyhow!("No GitLab host given; pass --host or set GITLAB_HOST"))?;
    let token = args
        .token
        .ok_or_else(|| anyhow!("No GitLab token given; pass --token or set GITLAB_TOKEN"))?;

    let catalog = AssetCatalog::discover(&config.asset_root, config.require_category)?;
    let client = GitLabClient::new(&host, token)?;

    if dry_run {
        let targets = ProjectResolver::new(&client, &config).resolve_targets()?;
        let plan = CommitOrchestrator::plan(&catalog, &targets);
        if !args.quiet {
            print_plan(&out, &plan);
        }
        return Ok(());
    }

    let summary = CommitOrchestrator::new(&client, &config).process_edits(&catalog)?;
    if !args.quiet {
        print_summary(&out, &summary, start_time.elapsed().as_secs_f64());
    }
    Ok(())
}

fn print_plan(out: &OutputConfig, plan: &EditPlan<'_>) {
    println!(
        "{} DRY RUN - {} files into {} repositories, nothing is written",
        out.marker(Marker::Plan),
        plan.file_count(),
        plan.repositories.len()
    );
    for edits in &plan.repositories {
        println!();
        println!("{}", out.name(&edits.repository.name));
        if edits.assets.is_empty() {
            println!("   (no applicable assets)");
        }
        for asset in &edits.assets {
            println!("   {}", asset);
        }
    }
}

fn print_summary(out: &OutputConfig, summary: &EditSummary, seconds: f64) {
    let marker = if summary.failed == 0 {
        Marker::Ok
    } else {
        Marker::Warn
    };
    println!(
        "{} Edited {} repositories in {:.2}s",
        out.marker(marker),
        summary.repositories - summary.skipped_repositories,
        seconds
    );
    println!("   {} created", summary.created);
    println!("   {} updated", summary.updated);
    if summary.failed > 0 {
        println!("   {} failed (see log)", summary.failed);
    }
    if summary.skipped_repositories > 0 {
        println!("   {} repositories skipped", summary.skipped_repositories);
    }
}
