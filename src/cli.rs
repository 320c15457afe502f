//! CLI argument parsing module for bump

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Default commit message generator invoked after `git add -A`
pub const DEFAULT_COMMIT_COMMAND: &str = "oco --fgm --yes";

/// Bump npm, PyPI and RubyGems dependencies across git repositories
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bump",
    version,
    about = "Bump npm, PyPI and RubyGems dependencies across git repositories"
)]
pub struct CliArgs {
    /// Repository to process (absolute, or relative to the base directory).
    /// Without it, every git repository directly under the base directory is processed
    pub repo: Option<PathBuf>,

    /// Directory whose immediate git repositories are scanned
    #[arg(long, env = "BUMP_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Dry run mode - resolve and report without touching files or git
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Apply major version updates too
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// Skip git fetch/pull before parsing
    #[arg(long = "no-pull", action = ArgAction::SetFalse)]
    pub pull: bool,

    /// Skip lockfile regeneration
    #[arg(long = "no-install", action = ArgAction::SetFalse)]
    pub install: bool,

    /// Skip committing the changes
    #[arg(long = "no-commit", action = ArgAction::SetFalse)]
    pub commit: bool,

    /// Skip pushing the commit
    #[arg(long = "no-push", action = ArgAction::SetFalse)]
    pub push: bool,

    /// Command that writes the commit after staging
    #[arg(long, default_value = DEFAULT_COMMIT_COMMAND)]
    pub commit_command: String,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - counts only, no listing or spinners
    #[arg(short, long)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}
