//! bump - dependency updater for a directory of git repositories
//!
//! This library finds npm, PyPI and RubyGems dependencies across repositories:
//! - Node.js (package.json)
//! - Python (pyproject.toml, Poetry or PEP 621)
//! - Ruby (Gemfile, *.gemspec)
//!
//! It resolves each package's latest version once, classifies the update,
//! and rewrites manifests in place. Major updates need unsafe mode.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod registry;
pub mod repository;
pub mod update;
pub mod vcs;
