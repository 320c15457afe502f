//! Git collaborator: sync before parsing, commit and push after rewriting

use crate::error::CommandError;
use crate::package_manager::run_command;
use async_trait::async_trait;
use std::path::Path;

const FETCH: &[&str] = &[
    "git",
    "fetch",
    "--all",
    "--prune",
    "--tags",
    "--prune-tags",
    "--recurse-submodules=yes",
];
const PULL: &[&str] = &["git", "pull", "--all", "--prune", "--rebase"];
const STATUS: &[&str] = &["git", "status", "--porcelain"];
const ADD: &[&str] = &["git", "add", "-A", "."];
const PUSH: &[&str] = &["git", "push"];

/// Git operations used by the workflow
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Fetch and rebase onto the remote
    async fn sync(&self, repo: &Path) -> Result<(), CommandError>;

    /// Whether the working tree has uncommitted changes
    async fn has_changes(&self, repo: &Path) -> Result<bool, CommandError>;

    /// Stage everything and run the commit command
    async fn commit(&self, repo: &Path, commit_command: &str) -> Result<(), CommandError>;

    async fn push(&self, repo: &Path) -> Result<(), CommandError>;
}

/// Runs the system `git` binary
#[derive(Debug, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn sync(&self, repo: &Path) -> Result<(), CommandError> {
        run_command(FETCH, repo).await?;
        run_command(PULL, repo).await?;
        Ok(())
    }

    async fn has_changes(&self, repo: &Path) -> Result<bool, CommandError> {
        let status = run_command(STATUS, repo).await?;
        Ok(!status.trim().is_empty())
    }

    async fn commit(&self, repo: &Path, commit_command: &str) -> Result<(), CommandError> {
        run_command(ADD, repo).await?;
        let parts: Vec<&str> = commit_command.split_whitespace().collect();
        run_command(&parts, repo).await?;
        Ok(())
    }

    async fn push(&self, repo: &Path) -> Result<(), CommandError> {
        run_command(PUSH, repo).await?;
        Ok(())
    }
}
