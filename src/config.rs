//! # Editor Configuration
//!
//! This module defines `EditorConfig`, the run configuration read from a
//! `repo-editor.yaml` file, and the logic for parsing and validating it.
//!
//! The file is parsed with `serde_yaml`. Since YAML is a superset of JSON,
//! a legacy `editorConfig.json` with the same camelCase keys loads unchanged:
//!
//! ```yaml
//! groupIds: [4711, 4712]
//! onlyUpdateTestProjects: false
//! onlyUpdateCodeProjects: true
//! commitMessage: "Update exercise assets"
//! branch: master
//! assetRoot: assets/input
//! ```
//!
//! The configuration is built once per run and handed by reference to the
//! project resolver and the commit orchestrator.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "repo-editor.yaml";

/// Marker contained in the name of every test repository.
pub const TEST_PROJECT_MARKER: &str = "tests_group";

fn default_commit_message() -> String {
    "Update assets".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets/input")
}

fn default_conflict_marker() -> String {
    "already exists".to_string()
}

/// The run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Ids of the groups whose repositories are edited.
    pub group_ids: Vec<u64>,
    /// Only edit repositories whose name contains [`TEST_PROJECT_MARKER`].
    #[serde(default)]
    pub only_update_test_projects: bool,
    /// Only edit repositories whose name does not contain [`TEST_PROJECT_MARKER`].
    #[serde(default)]
    pub only_update_code_projects: bool,
    /// Message used for every commit.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    /// Branch every commit lands on.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Local directory holding the asset tree.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Require an `all`, `code` or `test` directory directly under the asset root.
    #[serde(default)]
    pub require_category: bool,
    /// Also list projects of nested subgroups.
    #[serde(default)]
    pub include_subgroups: bool,
    /// Substring of a rejected create that marks the file as already present.
    #[serde(default = "default_conflict_marker")]
    pub conflict_marker: String,
    /// Process repositories in parallel. Files within one repository stay sequential.
    #[serde(default)]
    pub parallel_repositories: bool,
    /// Plan only; never write to the remote host.
    #[serde(default)]
    pub test_run: bool,
}

/// Which of the resolved repositories a run edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFilter {
    All,
    TestOnly,
    CodeOnly,
}

impl ProjectFilter {
    /// Whether a repository with the given name passes this filter.
    pub fn accepts(self, name: &str) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::TestOnly => name.contains(TEST_PROJECT_MARKER),
            ProjectFilter::CodeOnly => !name.contains(TEST_PROJECT_MARKER),
        }
    }
}

impl EditorConfig {
    /// Build a configuration for the given groups with every other field defaulted.
    pub fn for_groups(group_ids: Vec<u64>) -> Self {
        Self {
            group_ids,
            only_update_test_projects: false,
            only_update_code_projects: false,
            commit_message: default_commit_message(),
            branch: default_branch(),
            asset_root: default_asset_root(),
            require_category: false,
            include_subgroups: false,
            conflict_marker: default_conflict_marker(),
            parallel_repositories: false,
            test_run: false,
        }
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.group_ids.is_empty() {
            return Err(Error::InvalidConfig {
                message: "'groupIds' must list at least one group".to_string(),
            });
        }
        if self.only_update_test_projects && self.only_update_code_projects {
            return Err(Error::InvalidConfig {
                message: "only one of 'onlyUpdateTestProjects' and 'onlyUpdateCodeProjects' may be true"
                    .to_string(),
            });
        }
        if self.branch.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "'branch' must not be empty".to_string(),
            });
        }
        if self.commit_message.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "'commitMessage' must not be empty".to_string(),
            });
        }
        if self.conflict_marker.is_empty() {
            return Err(Error::InvalidConfig {
                message: "'conflictMarker' must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The repository name filter selected by the two `onlyUpdate*` flags.
    pub fn project_filter(&self) -> ProjectFilter {
        if self.only_update_test_projects {
            ProjectFilter::TestOnly
        } else if self.only_update_code_projects {
            ProjectFilter::CodeOnly
        } else {
            ProjectFilter::All
        }
    }
}

/// Parse and validate a configuration from YAML (or JSON) text.
pub fn parse(content: &str) -> Result<EditorConfig> {
    let config: EditorConfig = serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: e
            .to_string()
            .contains("groupIds")
            .then(|| "list the target groups, e.g. 'groupIds: [4711]'".to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<EditorConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
