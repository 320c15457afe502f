//! Core domain models for bump
//!
//! This module contains the fundamental types used throughout the application:
//! - Package managers and manifest formats
//! - Declared version constraints
//! - Dependency records and their resolution state
//! - Applied updates and the run summary

mod dependency;
mod manager;
mod summary;
mod update_result;
mod update_type;
mod version_spec;

pub use dependency::{Dependency, DependencyKey};
pub use manager::{FileType, Manager};
pub use summary::{GroupBy, ReportEntry, ReportGroup, UpdateSummary};
pub use update_result::AppliedUpdate;
pub use update_type::UpdateType;
pub use version_spec::VersionSpec;
