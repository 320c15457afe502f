//! Lockfile regeneration after manifest rewrites
//!
//! This module provides:
//! - Selection of the lockfile command for each manager from the lockfiles present
//! - Execution of those commands in the directory of each rewritten manifest

use crate::domain::{AppliedUpdate, Manager};
use crate::error::CommandError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Result of one lockfile regeneration
#[derive(Debug, Clone)]
pub struct InstallResult {
    pub manager: Manager,
    pub directory: PathBuf,
    /// The command that was executed
    pub command: String,
    pub success: bool,
    /// Standard error from a failed command
    pub stderr: String,
}

impl InstallResult {
    pub fn success(manager: Manager, directory: impl Into<PathBuf>, command: String) -> Self {
        Self {
            manager,
            directory: directory.into(),
            command,
            success: true,
            stderr: String::new(),
        }
    }

    pub fn failure(
        manager: Manager,
        directory: impl Into<PathBuf>,
        command: String,
        stderr: String,
    ) -> Self {
        Self {
            manager,
            directory: directory.into(),
            command,
            success: false,
            stderr,
        }
    }
}

/// Trait for running lockfile regeneration commands
#[async_trait]
pub trait LockfileRunner: Send + Sync {
    /// Regenerate the lockfile for `manager` in `working_dir`
    async fn regenerate(&self, manager: Manager, working_dir: &Path) -> InstallResult;
}

/// Runs the real package manager CLIs
#[derive(Debug, Default)]
pub struct SystemPackageManager;

impl SystemPackageManager {
    pub fn new() -> Self {
        Self
    }
}

/// Picks the regeneration command for a manager based on the lockfiles present
pub fn lockfile_command(manager: Manager, working_dir: &Path) -> &'static [&'static str] {
    let has = |name: &str| working_dir.join(name).exists();
    match manager {
        Manager::Npm => {
            if has("pnpm-lock.yaml") {
                &["pnpm", "install"]
            } else if has("yarn.lock") {
                &["yarn", "install"]
            } else if has("package-lock.json") {
                &["npm", "install"]
            } else {
                &["bun", "install", "--no-save"]
            }
        }
        Manager::Pypi => {
            if has("poetry.lock") {
                &["poetry", "lock"]
            } else {
                &["uv", "sync"]
            }
        }
        Manager::Rubygems => &["bundle", "update"],
    }
}

/// Runs a command and returns its stdout
pub(crate) async fn run_command(parts: &[&str], working_dir: &Path) -> Result<String, CommandError> {
    let command = parts.join(" ");
    let Some((program, args)) = parts.split_first() else {
        return Err(CommandError::Spawn {
            command,
            dir: working_dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    tracing::debug!(command = %command, dir = %working_dir.display(), "running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .output()
        .await
        .map_err(|source| CommandError::Spawn {
            command: command.clone(),
            dir: working_dir.to_path_buf(),
            source,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(CommandError::Failed {
            command,
            dir: working_dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[async_trait]
impl LockfileRunner for SystemPackageManager {
    async fn regenerate(&self, manager: Manager, working_dir: &Path) -> InstallResult {
        let parts = lockfile_command(manager, working_dir);
        let command = parts.join(" ");

        match run_command(parts, working_dir).await {
            Ok(_) => InstallResult::success(manager, working_dir, command),
            Err(e) => InstallResult::failure(manager, working_dir, command, e.to_string()),
        }
    }
}

/// (directory, manager) pairs that received applied updates, in stable order
pub fn lockfile_targets(applied: &[AppliedUpdate]) -> Vec<(PathBuf, Manager)> {
    applied
        .iter()
        .filter_map(|update| {
            let dep = &update.dependency;
            dep.file_path
                .parent()
                .map(|dir| (dir.to_path_buf(), dep.manager))
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Regenerates lockfiles for every directory whose manifests were rewritten
pub async fn run_lockfiles<R: LockfileRunner + ?Sized>(
    runner: &R,
    applied: &[AppliedUpdate],
) -> Vec<InstallResult> {
    let mut results = Vec::new();
    for (dir, manager) in lockfile_targets(applied) {
        let result = runner.regenerate(manager, &dir).await;
        if result.success {
            tracing::info!(
                manager = %manager,
                dir = %dir.display(),
                command = %result.command,
                "regenerated lockfile"
            );
        } else {
            tracing::warn!(
                manager = %manager,
                dir = %dir.display(),
                "lockfile regeneration failed: {}",
                result.stderr
            );
        }
        results.push(result);
    }
    results
}
