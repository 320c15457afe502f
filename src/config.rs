//! Run configuration derived from the command line

use crate::cli::CliArgs;
use crate::domain::GroupBy;
use crate::output::OutputConfig;
use crate::update::UpdatePolicy;
use std::path::PathBuf;

/// Immutable options for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dry_run: bool,
    pub unsafe_mode: bool,
    pub pull: bool,
    pub install: bool,
    pub commit: bool,
    pub push: bool,
    /// Single repository to process, absolute or relative to `base_dir`
    pub target: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub commit_command: String,
    pub output: OutputConfig,
}

impl RunConfig {
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            dry_run: args.dry_run,
            unsafe_mode: args.unsafe_mode,
            pull: args.pull,
            install: args.install,
            commit: args.commit,
            push: args.push,
            target: args.repo.clone(),
            base_dir: args.base_dir.clone(),
            commit_command: args.commit_command.clone(),
            output: OutputConfig::from_cli(args.json, args.verbose, args.quiet),
        }
    }

    pub fn policy(&self) -> UpdatePolicy {
        UpdatePolicy::new(self.unsafe_mode)
    }

    /// A single target lists dependencies first, a full scan lists repositories first
    pub fn group_by(&self) -> GroupBy {
        if self.target.is_some() {
            GroupBy::Dependency
        } else {
            GroupBy::Repository
        }
    }

    pub fn should_sync(&self) -> bool {
        self.pull && !self.dry_run
    }

    pub fn should_install(&self) -> bool {
        self.install && !self.dry_run
    }

    pub fn should_commit(&self) -> bool {
        self.commit && !self.dry_run
    }

    pub fn should_push(&self) -> bool {
        self.should_commit() && self.push
    }
}
