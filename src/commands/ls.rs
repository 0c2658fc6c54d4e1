//! # Ls Command Implementation
//!
//! Lists the assets below the asset root as they would be classified by
//! `apply`: shared or project-scoped, and the path each file takes inside a
//! repository. Files that do not fit the layout are reported through the
//! log and left out.
//!
//! This command is read-only and never contacts the remote host.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_editor::asset::{Asset, AssetCatalog};
use repo_editor::config::DEFAULT_CONFIG_FILENAME;
use repo_editor::output::{Marker, OutputConfig};

use super::load_config;

/// List the classified assets
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to the configuration file. Optional; defaults apply when the
    /// default file is absent.
    #[arg(short, long, value_name = "FILE", env = "REPO_EDITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Asset directory, overriding `assetRoot` from the configuration
    #[arg(long, value_name = "DIR")]
    pub asset_root: Option<PathBuf>,

    /// Require an all/code/test directory under the asset root
    #[arg(long)]
    pub require_category: bool,

    /// Only show the assets written into the repository with this name
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Show only the number of assets
    #[arg(long)]
    pub count: bool,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let config_path = args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
        default.exists().then_some(default)
    });
    let (mut asset_root, mut require_category) = match config_path {
        Some(path) => {
            let config = load_config(&path)?;
            (config.asset_root, config.require_category)
        }
        None => (PathBuf::from("assets/input"), false),
    };
    if let Some(root) = args.asset_root {
        asset_root = root;
    }
    require_category |= args.require_category;

    let catalog = AssetCatalog::discover(&asset_root, require_category)?;
    let assets: Vec<&Asset> = match &args.project {
        Some(project) => catalog.applicable_to(project).collect(),
        None => catalog.assets().iter().collect(),
    };

    if args.count {
        println!("{}", assets.len());
        return Ok(());
    }

    if assets.is_empty() {
        println!(
            "{} No assets found below {}",
            out.marker(Marker::Warn),
            asset_root.display()
        );
        return Ok(());
    }

    for asset in &assets {
        let scope = match asset.project_id() {
            Some(project) => out.name(project),
            None => "shared".to_string(),
        };
        println!(
            "{}\t{}\t{}",
            scope,
            asset.repo_path(),
            asset.local_path().display()
        );
    }
    println!();
    println!(
        "{} {} assets ({} shared)",
        out.marker(Marker::Info),
        assets.len(),
        assets.iter().filter(|a| a.is_shared()).count()
    );
    Ok(())
}
