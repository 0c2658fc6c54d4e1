//! # Commit Orchestrator
//!
//! Writes the asset catalog into every target repository.
//!
//! For each (repository, asset) pair the orchestrator runs a small state
//! machine:
//!
//! 1.  Issue a create. On success the file is done.
//! 2.  If the create is rejected and the [`ConflictPredicate`] recognizes the
//!     rejection as "file already exists", issue one update with the same
//!     path and content.
//! 3.  Any other failure, and any failed update, is logged and ends that
//!     file. It is never retried and never affects sibling files or
//!     repositories.
//!
//! Each file is its own commit. Within a repository the writes are strictly
//! sequential, so the repository history stays linear and the conflict
//! fallback is deterministic. Repositories run in resolver order, or in
//! parallel with `rayon` when `parallelRepositories` is set.
//!
//! Only a failed group discovery is fatal; it is returned before anything is
//! written. Everything after that is absorbed here and reported through the
//! log.

use crate::asset::{Asset, AssetCatalog};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::gitlab::{
    conflict_marker_predicate, CommitAction, CommitSettings, ConflictPredicate, FileChange,
    RemoteClient, TargetRepository,
};
use crate::projects::ProjectResolver;
use log::{debug, error, info, warn};
use rayon::prelude::*;

/// The assets to write into one repository, in catalog order.
#[derive(Debug, Clone)]
pub struct RepositoryEdits<'a> {
    pub repository: &'a TargetRepository,
    pub assets: Vec<&'a Asset>,
}

/// Per-repository edits of one run, in resolver order.
#[derive(Debug, Clone, Default)]
pub struct EditPlan<'a> {
    pub repositories: Vec<RepositoryEdits<'a>>,
}

impl EditPlan<'_> {
    /// Number of file writes the plan will issue.
    pub fn file_count(&self) -> usize {
        self.repositories.iter().map(|r| r.assets.len()).sum()
    }
}

/// Aggregate outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub repositories: usize,
    pub skipped_repositories: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl EditSummary {
    fn merge(self, other: Self) -> Self {
        Self {
            repositories: self.repositories + other.repositories,
            skipped_repositories: self.skipped_repositories + other.skipped_repositories,
            created: self.created + other.created,
            updated: self.updated + other.updated,
            failed: self.failed + other.failed,
        }
    }

    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Created => self.created += 1,
            FileOutcome::Updated => self.updated += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Created,
    Updated,
    Failed,
}

/// Drives the create-or-update protocol against the remote host.
pub struct CommitOrchestrator<'a> {
    client: &'a dyn RemoteClient,
    config: &'a EditorConfig,
    settings: CommitSettings,
    is_conflict: ConflictPredicate,
    parallel: bool,
}

impl<'a> CommitOrchestrator<'a> {
    pub fn new(client: &'a dyn RemoteClient, config: &'a EditorConfig) -> Self {
        Self {
            client,
            config,
            settings: CommitSettings {
                branch: config.branch.clone(),
                message: config.commit_message.clone(),
            },
            is_conflict: conflict_marker_predicate(config.conflict_marker.as_str()),
            parallel: config.parallel_repositories,
        }
    }

    /// Replace the predicate that recognizes an "already exists" rejection.
    pub fn with_conflict_predicate(mut self, predicate: ConflictPredicate) -> Self {
        self.is_conflict = predicate;
        self
    }

    pub fn with_parallel_repositories(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Select, for every target, the shared assets and the ones scoped to it.
    pub fn plan<'p>(catalog: &'p AssetCatalog, targets: &'p [TargetRepository]) -> EditPlan<'p> {
        EditPlan {
            repositories: targets
                .iter()
                .map(|repository| RepositoryEdits {
                    repository,
                    assets: catalog.applicable_to(&repository.name).collect(),
                })
                .collect(),
        }
    }

    /// Resolve the target repositories and write the catalog into them.
    ///
    /// Returns an error only when group discovery fails, in which case no
    /// write has been issued.
    pub fn process_edits(&self, catalog: &AssetCatalog) -> Result<EditSummary> {
        if catalog.is_empty() {
            warn!("no assets to apply, nothing to do");
            return Ok(EditSummary::default());
        }

        let targets = ProjectResolver::new(self.client, self.config).resolve_targets()?;
        if targets.is_empty() {
            warn!("can't find any projects");
            return Ok(EditSummary::default());
        }

        Ok(self.apply(&Self::plan(catalog, &targets)))
    }

    /// Execute a plan. Never fails; outcomes are logged and counted.
    pub fn apply(&self, plan: &EditPlan<'_>) -> EditSummary {
        let summary = if self.parallel {
            plan.repositories
                .par_iter()
                .map(|edits| self.edit_repository(edits))
                .reduce(EditSummary::default, EditSummary::merge)
        } else {
            plan.repositories
                .iter()
                .map(|edits| self.edit_repository(edits))
                .fold(EditSummary::default(), EditSummary::merge)
        };

        info!(
            "finished {} repositories: {} created, {} updated, {} failed, {} skipped",
            summary.repositories,
            summary.created,
            summary.updated,
            summary.failed,
            summary.skipped_repositories
        );
        summary
    }

    fn edit_repository(&self, edits: &RepositoryEdits<'_>) -> EditSummary {
        let repository = edits.repository;
        let mut summary = EditSummary {
            repositories: 1,
            ..EditSummary::default()
        };

        if edits.assets.is_empty() {
            warn!("{}: no applicable assets, skipping", repository.name);
            summary.skipped_repositories = 1;
            return summary;
        }

        info!(
            "{}: writing {} files to branch {}",
            repository.name,
            edits.assets.len(),
            self.settings.branch
        );
        for asset in &edits.assets {
            summary.record(self.write_asset(repository, asset));
        }
        summary
    }

    fn write_asset(&self, repository: &TargetRepository, asset: &Asset) -> FileOutcome {
        let content = match asset.read_content() {
            Ok(content) => content,
            Err(e) => {
                error!(
                    "{}: cannot read {}: {}",
                    repository.name,
                    asset.local_path().display(),
                    e
                );
                return FileOutcome::Failed;
            }
        };

        let action = CommitAction::Create(FileChange::base64(asset.repo_path(), &content));
        match self.client.commit_file(repository, &self.settings, &action) {
            Ok(()) => {
                info!("{}: created {}", repository.name, asset.repo_path());
                FileOutcome::Created
            }
            Err(e) if (self.is_conflict)(&e) => {
                debug!(
                    "{}: {} already exists, updating instead",
                    repository.name,
                    asset.repo_path()
                );
                self.update(repository, action.into_update())
            }
            Err(e) => {
                error!(
                    "{}: create of {} failed: {}",
                    repository.name,
                    asset.repo_path(),
                    e
                );
                FileOutcome::Failed
            }
        }
    }

    fn update(&self, repository: &TargetRepository, action: CommitAction) -> FileOutcome {
        match self.client.commit_file(repository, &self.settings, &action) {
            Ok(()) => {
                info!("{}: updated {}", repository.name, action.file_path());
                FileOutcome::Updated
            }
            Err(e) => {
                error!(
                    "{}: update of {} failed: {}",
                    repository.name,
                    action.file_path(),
                    e
                );
                FileOutcome::Failed
            }
        }
    }
}
