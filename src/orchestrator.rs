//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: discover → sync → detect → parse → resolve → write
//!   → lockfiles → commit/push → summarize
//! - Dry-run mode support (no file, git or lockfile mutation)
//! - Error handling with partial continuation; only discovery is fatal

use crate::config::RunConfig;
use crate::domain::{AppliedUpdate, Dependency, Manager, UpdateSummary};
use crate::error::AppError;
use crate::manifest::{detect_manifests, parse_manifest, ManifestWriter};
use crate::package_manager::{run_lockfiles, LockfileRunner, SystemPackageManager};
use crate::progress::Progress;
use crate::registry::{unique_count, BatchCoordinator, HttpClient};
use crate::repository::{discover_repositories, Repository};
use crate::vcs::{GitRunner, SystemGit};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    config: RunConfig,
    coordinator: BatchCoordinator,
    git: Box<dyn GitRunner>,
    lockfiles: Box<dyn LockfileRunner>,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    pub repositories: Vec<Repository>,
    /// Every parsed dependency, resolved where possible
    pub dependencies: Vec<Dependency>,
    /// Updates written (or that would be written in dry-run mode)
    pub applied: Vec<AppliedUpdate>,
    pub summary: UpdateSummary,
    /// Per-item failures; none of them stopped the run
    pub errors: Vec<String>,
    pub elapsed: Duration,
}

impl Orchestrator {
    /// Orchestrator against the public registries and the system git / package managers
    pub fn new(config: RunConfig) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        Ok(Self::with_components(
            config,
            BatchCoordinator::new(client),
            Box::new(SystemGit::new()),
            Box::new(SystemPackageManager::new()),
        ))
    }

    /// Orchestrator with custom collaborators (for testing)
    pub fn with_components(
        config: RunConfig,
        coordinator: BatchCoordinator,
        git: Box<dyn GitRunner>,
        lockfiles: Box<dyn LockfileRunner>,
    ) -> Self {
        Self {
            config,
            coordinator,
            git,
            lockfiles,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the update workflow
    pub async fn run(&self) -> Result<OrchestratorResult, AppError> {
        self.run_with_progress(self.config.output.show_progress()).await
    }

    /// Run the update workflow with optional progress display
    pub async fn run_with_progress(
        &self,
        show_progress: bool,
    ) -> Result<OrchestratorResult, AppError> {
        let started = Instant::now();
        let mut progress = Progress::new(show_progress);
        let mut errors = Vec::new();

        // Step 1: Discover repositories (the only fatal step)
        progress.phase("Discovering repositories...");
        let repositories =
            discover_repositories(&self.config.base_dir, self.config.target.as_deref())?;
        progress.clear();

        // Step 2: Sync with the remote
        if self.config.should_sync() {
            progress.phase("Syncing repositories...");
            for repo in &repositories {
                if let Err(e) = self.git.sync(&repo.path).await {
                    tracing::warn!(repository = %repo.name, "git sync failed: {}", e);
                    errors.push(format!("{}: {}", repo.name, e));
                }
            }
            progress.clear();
        }

        // Step 3: Detect and parse manifests
        progress.phase("Parsing manifests...");
        let mut dependencies = Vec::new();
        for repo in &repositories {
            for manifest in detect_manifests(&repo.path, &repo.name) {
                dependencies.extend(parse_manifest(&manifest).await);
            }
        }
        progress.clear();
        log_dependency_counts(&dependencies);

        // Step 4: Resolve latest versions
        progress.lookups(unique_count(&dependencies));
        let outcome = self.coordinator.resolve(&mut dependencies, &progress).await;
        progress.clear();
        tracing::info!(
            total = dependencies.len(),
            unique = outcome.unique,
            resolved = outcome.resolved,
            failed = outcome.errors.len(),
            "resolved latest versions"
        );
        errors.extend(outcome.errors);

        // Step 5: Apply eligible updates
        progress.phase("Updating manifests...");
        let writer = ManifestWriter::new(self.config.dry_run, self.config.policy());
        let mut applied = Vec::new();
        for result in writer.apply_all(&dependencies).await {
            if result.has_errors() {
                errors.extend(
                    result
                        .errors
                        .iter()
                        .map(|e| format!("{}: {}", result.path.display(), e)),
                );
            }
            if result.file_modified {
                tracing::debug!(path = %result.path.display(), count = result.applied.len(), "manifest written");
            }
            applied.extend(result.applied);
        }
        progress.clear();

        // Step 6: Regenerate lockfiles
        if self.config.should_install() && !applied.is_empty() {
            progress.phase("Regenerating lockfiles...");
            for result in run_lockfiles(self.lockfiles.as_ref(), &applied).await {
                if !result.success {
                    errors.push(format!(
                        "{}: '{}' failed: {}",
                        result.directory.display(),
                        result.command,
                        result.stderr
                    ));
                }
            }
            progress.clear();
        }

        // Step 7: Commit and push
        if self.config.should_commit() {
            progress.phase("Committing changes...");
            for repo in updated_repositories(&repositories, &applied) {
                if let Err(e) = self.commit_repository(repo).await {
                    tracing::warn!(repository = %repo.name, "{}", e);
                    errors.push(format!("{}: {}", repo.name, e));
                }
            }
            progress.clear();
        }

        let summary = UpdateSummary::build(
            &dependencies,
            &applied,
            self.config.dry_run,
            self.config.unsafe_mode,
            self.config.group_by(),
        );

        Ok(OrchestratorResult {
            repositories,
            dependencies,
            applied,
            summary,
            errors,
            elapsed: started.elapsed(),
        })
    }

    /// Commits (and pushes) one repository if its working tree changed
    async fn commit_repository(&self, repo: &Repository) -> Result<(), AppError> {
        if !self.git.has_changes(&repo.path).await? {
            tracing::debug!(repository = %repo.name, "nothing to commit");
            return Ok(());
        }

        self.git
            .commit(&repo.path, &self.config.commit_command)
            .await?;
        tracing::info!(repository = %repo.name, "committed dependency updates");

        if self.config.should_push() {
            self.git.push(&repo.path).await?;
            tracing::info!(repository = %repo.name, "pushed");
        }
        Ok(())
    }
}

/// Repositories that received at least one applied update, in discovery order
fn updated_repositories<'a>(
    repositories: &'a [Repository],
    applied: &[AppliedUpdate],
) -> Vec<&'a Repository> {
    let touched: BTreeSet<&Path> = applied
        .iter()
        .map(|a| a.dependency.repo_path.as_path())
        .collect();
    repositories
        .iter()
        .filter(|repo| touched.contains(repo.path.as_path()))
        .collect()
}

fn log_dependency_counts(dependencies: &[Dependency]) {
    for manager in Manager::all() {
        let count = dependencies.iter().filter(|d| d.manager == *manager).count();
        tracing::info!(manager = %manager, count, "parsed dependencies");
    }
}
