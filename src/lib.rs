//! # Repo Editor Library
//!
//! This library synchronizes a local directory of asset files onto many
//! GitLab repositories. Files are created where missing and overwritten
//! where present. Remote content is never merged.
//!
//! ## Quick Example
//!
//! ```
//! use repo_editor::asset::{AssetCatalog, Layout};
//! use std::path::Path;
//!
//! let layout = Layout::new(Path::new("assets/input"), false);
//! let catalog = AssetCatalog::from_paths(
//!     [
//!         "assets/input/README.md",
//!         "assets/input/ST2M2_group_824e7ace-30a3-4670-ab6c-e56a9a42f2d7/Note.java",
//!     ],
//!     &layout,
//! );
//!
//! let scoped = &catalog.assets()[1];
//! assert_eq!(scoped.repo_path(), "Note.java");
//! assert_eq!(
//!     scoped.project_id(),
//!     Some("ST2M2_group_824e7ace-30a3-4670-ab6c-e56a9a42f2d7")
//! );
//! assert_eq!(catalog.applicable_to("some_other_repo").count(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the `repo-editor.yaml` run configuration.
//! - **Assets (`asset`)**: classification of local paths into shared and
//!   project-scoped assets, and the catalog of one run.
//! - **Remote client (`gitlab`)**: the `RemoteClient` trait and its GitLab
//!   implementation.
//! - **Project resolution (`projects`)**: the repositories of the configured
//!   groups, filtered by name.
//! - **Orchestration (`orchestrator`)**: the per-file create-or-update
//!   protocol across all target repositories.
//!
//! ## Execution Flow
//!
//! 1.  Load and validate the configuration.
//! 2.  Discover and classify the assets below the asset root.
//! 3.  Verify the configured groups and resolve their repositories.
//! 4.  For each repository, write every applicable asset as its own commit.

pub mod asset;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod orchestrator;
pub mod output;
pub mod projects;

#[cfg(test)]
mod asset_proptest;
