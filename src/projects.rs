//! Resolution of the repositories a run edits.
//!
//! Every configured group must be visible to the credentials in use. If any
//! is missing, the run edits nothing and fails with [`Error::Discovery`].
//! Otherwise the projects of all configured groups are unioned, in group
//! order, and filtered by name.

use crate::config::{EditorConfig, ProjectFilter};
use crate::error::{Error, Result};
use crate::gitlab::{RemoteClient, TargetRepository};
use log::{error, info};
use std::collections::HashSet;

/// Finds the target repositories for the configured groups.
pub struct ProjectResolver<'a> {
    client: &'a dyn RemoteClient,
    group_ids: &'a [u64],
    filter: ProjectFilter,
    include_subgroups: bool,
}

impl<'a> ProjectResolver<'a> {
    pub fn new(client: &'a dyn RemoteClient, config: &'a EditorConfig) -> Self {
        Self {
            client,
            group_ids: &config.group_ids,
            filter: config.project_filter(),
            include_subgroups: config.include_subgroups,
        }
    }

    /// Resolve the target repositories, in the order the host lists them.
    pub fn resolve_targets(&self) -> Result<Vec<TargetRepository>> {
        self.verify_groups()?;

        let mut seen = HashSet::new();
        let mut projects = Vec::new();
        for &group_id in self.group_ids {
            let group_projects = self
                .client
                .list_group_projects(group_id, self.include_subgroups)
                .map_err(|e| {
                    error!("listing projects of group {} failed: {}", group_id, e);
                    e
                })?;
            info!("group {}: {} projects", group_id, group_projects.len());
            projects.extend(
                group_projects
                    .into_iter()
                    .filter(|project| seen.insert(project.id)),
            );
        }

        let total = projects.len();
        projects.retain(|project| self.filter.accepts(&project.name));
        info!(
            "resolved {} target repositories ({} before {:?} filter)",
            projects.len(),
            total,
            self.filter
        );
        Ok(projects)
    }

    fn verify_groups(&self) -> Result<()> {
        let visible: HashSet<u64> = self
            .client
            .list_groups()
            .map_err(|e| {
                error!("listing groups failed: {}", e);
                e
            })?
            .into_iter()
            .map(|group| group.id)
            .collect();

        let missing: Vec<u64> = self
            .group_ids
            .iter()
            .copied()
            .filter(|id| !visible.contains(id))
            .collect();
        if missing.is_empty() {
            info!("found all {} configured groups", self.group_ids.len());
            return Ok(());
        }

        let error = Error::Discovery {
            expected: self.group_ids.len(),
            found: self.group_ids.len() - missing.len(),
            missing,
        };
        error!("{}", error);
        Err(error)
    }
}
