//! Update summary types
//!
//! Aggregates classified dependencies and the applied set into the counts
//! and grouped listing rendered by the output formatters.

use super::{AppliedUpdate, Dependency, Manager, UpdateType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the listing is grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Repository, then dependency (scanning many repositories)
    Repository,
    /// Dependency, then repository (a single target repository)
    Dependency,
}

/// One line of the grouped listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Dependency name or repository name, depending on grouping
    pub label: String,
    pub manager: Manager,
    pub current_version: String,
    pub latest_version: String,
    pub update_type: UpdateType,
    /// Major bump left untouched because unsafe mode was off
    pub skipped: bool,
}

/// A titled block of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub title: String,
    pub entries: Vec<ReportEntry>,
}

/// Overall summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub total: usize,
    pub updated: usize,
    pub patches: usize,
    pub minors: usize,
    pub majors: usize,
    pub majors_skipped: usize,
    /// Dependencies that could not be resolved or classified
    pub errors: usize,
    pub dry_run: bool,
    pub unsafe_mode: bool,
    pub group_by: GroupBy,
    pub groups: Vec<ReportGroup>,
}

impl UpdateSummary {
    /// Builds the summary from every parsed dependency and the applied set
    pub fn build(
        dependencies: &[Dependency],
        applied: &[AppliedUpdate],
        dry_run: bool,
        unsafe_mode: bool,
        group_by: GroupBy,
    ) -> Self {
        let mut summary = Self {
            total: dependencies.len(),
            updated: 0,
            patches: 0,
            minors: 0,
            majors: 0,
            majors_skipped: 0,
            errors: 0,
            dry_run,
            unsafe_mode,
            group_by,
            groups: Vec::new(),
        };

        let was_applied = |dep: &Dependency| {
            dry_run || applied.iter().any(|a| a.dependency.same_declaration(dep))
        };

        for dep in dependencies {
            let (Some(update_type), Some(_)) = (dep.update_type, &dep.latest_version) else {
                summary.errors += 1;
                continue;
            };

            match update_type {
                UpdateType::None => {}
                UpdateType::Patch => {
                    if was_applied(dep) {
                        summary.patches += 1;
                        summary.updated += 1;
                    }
                }
                UpdateType::Minor => {
                    if was_applied(dep) {
                        summary.minors += 1;
                        summary.updated += 1;
                    }
                }
                UpdateType::Major => {
                    if unsafe_mode && was_applied(dep) {
                        summary.majors += 1;
                        summary.updated += 1;
                    } else {
                        summary.majors_skipped += 1;
                    }
                }
            }
        }

        summary.groups = group_entries(dependencies, unsafe_mode, group_by);
        summary
    }
}

fn group_entries(
    dependencies: &[Dependency],
    unsafe_mode: bool,
    group_by: GroupBy,
) -> Vec<ReportGroup> {
    let mut grouped: BTreeMap<&str, BTreeMap<(&str, Manager), ReportEntry>> = BTreeMap::new();

    for dep in dependencies {
        let (Some(update_type), Some(latest)) = (dep.update_type, &dep.latest_version) else {
            continue;
        };
        if update_type == UpdateType::None {
            continue;
        }

        let (outer, inner) = match group_by {
            GroupBy::Repository => (dep.repository.as_str(), dep.name.as_str()),
            GroupBy::Dependency => (dep.name.as_str(), dep.repository.as_str()),
        };

        // First occurrence per (outer, inner) pair is shown.
        grouped
            .entry(outer)
            .or_default()
            .entry((inner, dep.manager))
            .or_insert_with(|| ReportEntry {
                label: inner.to_string(),
                manager: dep.manager,
                current_version: dep.current_version.clone(),
                latest_version: latest.clone(),
                update_type,
                skipped: update_type.is_major() && !unsafe_mode,
            });
    }

    grouped
        .into_iter()
        .map(|(title, entries)| ReportGroup {
            title: title.to_string(),
            entries: entries.into_values().collect(),
        })
        .collect()
}
