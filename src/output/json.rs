//! JSON output formatter for machine processing
//!
//! One pretty-printed document per run: counts, the grouped listing, the
//! applied updates and per-item errors.

use crate::domain::{GroupBy, Manager, ReportGroup, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    dry_run: bool,
    unsafe_mode: bool,
    repositories: Vec<&'a str>,
    summary: JsonCounts,
    group_by: GroupBy,
    groups: &'a [ReportGroup],
    applied: Vec<JsonUpdate<'a>>,
    errors: &'a [String],
    elapsed_ms: u128,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonCounts {
    total: usize,
    updated: usize,
    patches: usize,
    minors: usize,
    majors: usize,
    majors_skipped: usize,
    errors: usize,
}

impl From<&UpdateSummary> for JsonCounts {
    fn from(summary: &UpdateSummary) -> Self {
        Self {
            total: summary.total,
            updated: summary.updated,
            patches: summary.patches,
            minors: summary.minors,
            majors: summary.majors,
            majors_skipped: summary.majors_skipped,
            errors: summary.errors,
        }
    }
}

/// JSON representation of an applied update
#[derive(Serialize)]
struct JsonUpdate<'a> {
    repository: &'a str,
    file: String,
    manager: Manager,
    name: &'a str,
    from: &'a str,
    /// Declared value after the rewrite, prefix included
    to: String,
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;
        let output = JsonOutput {
            generated_at: Utc::now(),
            dry_run: summary.dry_run,
            unsafe_mode: summary.unsafe_mode,
            repositories: result.repositories.iter().map(|r| r.name.as_str()).collect(),
            summary: summary.into(),
            group_by: summary.group_by,
            groups: &summary.groups,
            applied: result
                .applied
                .iter()
                .map(|update| JsonUpdate {
                    repository: &update.dependency.repository,
                    file: update.dependency.file_path.display().to_string(),
                    manager: update.dependency.manager,
                    name: &update.dependency.name,
                    from: update.old_version(),
                    to: update.new_declared(),
                })
                .collect(),
            errors: &result.errors,
            elapsed_ms: result.elapsed.as_millis(),
        };

        write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(&JsonCounts::from(summary), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_result;
    use serde_json::Value;

    fn render() -> Value {
        let mut out = Vec::new();
        JsonFormatter::new().format(&sample_result(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_json_counts() {
        let json = render();
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["unsafe_mode"], false);
        assert_eq!(json["summary"]["total"], 4);
        assert_eq!(json["summary"]["updated"], 2);
        assert_eq!(json["summary"]["majors_skipped"], 1);
        assert_eq!(json["summary"]["errors"], 1);
        assert_eq!(json["elapsed_ms"], 1250);
    }

    #[test]
    fn test_json_generated_at_is_rfc3339() {
        let json = render();
        let stamp = json["generated_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_json_applied_updates_keep_prefix() {
        let json = render();
        let applied = json["applied"].as_array().unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0]["name"], "left-pad");
        assert_eq!(applied[0]["manager"], "npm");
        assert_eq!(applied[1]["from"], ">=2.31.0");
        assert_eq!(applied[1]["to"], ">=2.32.3");
        assert_eq!(applied[1]["manager"], "pypi");
    }

    #[test]
    fn test_json_groups() {
        let json = render();
        assert_eq!(json["group_by"], "repository");
        assert_eq!(json["repositories"][0], "web");
        let entries = json["groups"][0]["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["label"], "react");
        assert_eq!(entries[1]["skipped"], true);
        assert_eq!(entries[1]["update_type"], "major");
    }

    #[test]
    fn test_json_summary_only() {
        let mut out = Vec::new();
        JsonFormatter::new()
            .format_summary(&sample_result().summary, &mut out)
            .unwrap();
        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["patches"], 1);
        assert_eq!(json["minors"], 1);
    }
}
