//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_minimal_config();
//! fixture.command().arg("validate").assert().success();
//! ```

use assert_fs::prelude::*;
use repo_editor::error::{Error, Result};
use repo_editor::gitlab::{CommitAction, CommitSettings, Group, RemoteClient, TargetRepository};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::{RecordingHost, TestFixture};
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;
}

/// Common configuration snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Minimal valid configuration.
    pub const MINIMAL: &str = "groupIds: [4711]\n";

    /// Legacy JSON configuration.
    pub const LEGACY_JSON: &str = r#"{
  "groupIds": [4711, 4712],
  "onlyUpdateTestProjects": false,
  "onlyUpdateCodeProjects": true,
  "testRun": false
}"#;

    /// Configuration with both filter flags set.
    pub const CONFLICTING_FLAGS: &str = r#"
groupIds: [4711]
onlyUpdateTestProjects: true
onlyUpdateCodeProjects: true
"#;

    /// Configuration requiring all/code/test category directories.
    pub const WITH_CATEGORIES: &str = r#"
groupIds: [4711]
assetRoot: assets
requireCategory: true
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "groupIds: [unclosed";
}

/// Project directory name used across tests.
#[allow(dead_code)]
pub const PROJECT: &str = "ST2M2_tests_group_824e7ace-30a3-4670-ab6c-e56a9a42f2d7";

/// A temporary working directory with an optional config and asset tree.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `repo-editor.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("repo-editor.yaml", content)
    }

    pub fn with_minimal_config(self) -> Self {
        self.with_config(configs::MINIMAL)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an asset below `assets/input`.
    pub fn with_asset(self, path: &str, content: &str) -> Self {
        self.with_file(&format!("assets/input/{}", path), content)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A command for the binary, running in this fixture's directory with a
    /// clean environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repo-editor");
        cmd.current_dir(self.path())
            .env_remove("REPO_EDITOR_CONFIG")
            .env_remove("GITLAB_HOST")
            .env_remove("GITLAB_TOKEN")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One recorded file write.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub repository: String,
    pub verb: &'static str,
    pub path: String,
}

/// An in-memory GitLab stand-in that records every write.
///
/// Creates of existing files are rejected with GitLab's 400 message; the
/// paths in `broken` reject every write with a 500, and listing the projects
/// of a group in `unreachable_groups` fails with a 503.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingHost {
    pub groups: Vec<u64>,
    pub projects: Vec<TargetRepository>,
    pub broken: HashSet<String>,
    pub unreachable_groups: HashSet<u64>,
    files: Mutex<HashSet<(u64, String)>>,
    writes: Mutex<Vec<Write>>,
}

#[allow(dead_code)]
impl RecordingHost {
    pub fn new(groups: &[u64], projects: &[&str]) -> Self {
        Self {
            groups: groups.to_vec(),
            projects: projects
                .iter()
                .enumerate()
                .map(|(i, name)| TargetRepository {
                    id: i as u64 + 1,
                    name: name.to_string(),
                    path_with_namespace: format!("course/{}", name),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

impl RemoteClient for RecordingHost {
    fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self
            .groups
            .iter()
            .map(|&id| Group {
                id,
                name: format!("group-{}", id),
                full_path: format!("course/group-{}", id),
            })
            .collect())
    }

    fn list_group_projects(&self, group_id: u64, _: bool) -> Result<Vec<TargetRepository>> {
        if self.unreachable_groups.contains(&group_id) {
            return Err(Error::Remote {
                url: format!("mock/groups/{}/projects", group_id),
                status: Some(503),
                message: "503 Service Unavailable".to_string(),
            });
        }
        Ok(self.projects.clone())
    }

    fn commit_file(
        &self,
        repository: &TargetRepository,
        _: &CommitSettings,
        action: &CommitAction,
    ) -> Result<()> {
        let path = action.file_path().to_string();
        self.writes.lock().unwrap().push(Write {
            repository: repository.name.clone(),
            verb: action.verb(),
            path: path.clone(),
        });

        let remote_error = |status: u16, message: &str| Error::Remote {
            url: format!("mock/{}/{}", repository.id, path),
            status: Some(status),
            message: message.to_string(),
        };
        if self.broken.contains(&path) {
            return Err(remote_error(500, "500 Internal Server Error"));
        }

        let mut files = self.files.lock().unwrap();
        let key = (repository.id, path.clone());
        match action {
            CommitAction::Create(_) if files.contains(&key) => {
                Err(remote_error(400, "A file with this name already exists"))
            }
            CommitAction::Create(_) => {
                files.insert(key);
                Ok(())
            }
            CommitAction::Update(_) if files.contains(&key) => Ok(()),
            CommitAction::Update(_) => Err(remote_error(400, "A file with this name doesn't exist")),
        }
    }
}
