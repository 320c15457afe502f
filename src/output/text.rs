//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Dry-run / unsafe mode notices
//! - Grouped listing (repository → dependency or dependency → repository)
//!   with an update-type symbol per line
//! - Summary counts and elapsed time

use crate::domain::{ReportEntry, UpdateSummary, UpdateType};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::{ColoredString, Colorize};
use std::io::Write;
use std::time::Duration;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn symbol(&self, update_type: UpdateType) -> String {
        let symbol = update_type.symbol();
        match update_type {
            UpdateType::Major => self.paint(symbol, |s| s.red().bold()),
            UpdateType::Minor => self.paint(symbol, |s| s.yellow()),
            UpdateType::Patch => self.paint(symbol, |s| s.green()),
            UpdateType::None => self.paint(symbol, |s| s.dimmed()),
        }
    }

    fn format_notices(&self, summary: &UpdateSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.dry_run {
            writeln!(
                writer,
                "{} no files, lockfiles or git state were changed",
                self.paint("(dry-run)", |s| s.cyan())
            )?;
        }
        if summary.unsafe_mode {
            writeln!(
                writer,
                "{} major updates are applied",
                self.paint("(unsafe)", |s| s.red().bold())
            )?;
        }
        if summary.dry_run || summary.unsafe_mode {
            writeln!(writer)?;
        }
        Ok(())
    }

    fn format_entry(
        &self,
        entry: &ReportEntry,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let label = format!("{:width$}", entry.label, width = width);
        let manager = self.paint(&format!("[{}]", entry.manager), |s| s.dimmed());
        let skipped = if entry.skipped {
            format!(" {}", self.paint("(skipped: major)", |s| s.dimmed()))
        } else {
            String::new()
        };

        writeln!(
            writer,
            "  {} {} {} {} {} {}{}",
            self.symbol(entry.update_type),
            label,
            self.paint(&entry.current_version, |s| s.dimmed()),
            self.paint("→", |s| s.dimmed()),
            self.paint(&entry.latest_version, |s| s.bright_white().bold()),
            manager,
            skipped
        )
    }

    fn format_groups(&self, summary: &UpdateSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.groups.is_empty() {
            writeln!(writer, "{}", self.paint("Everything is up to date", |s| s.green()))?;
            return writeln!(writer);
        }

        for group in &summary.groups {
            writeln!(writer, "{}", self.paint(&group.title, |s| s.bold()))?;
            let width = group
                .entries
                .iter()
                .map(|e| e.label.len())
                .max()
                .unwrap_or(0);
            for entry in &group.entries {
                self.format_entry(entry, width, writer)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    fn format_errors(&self, errors: &[String], writer: &mut dyn Write) -> std::io::Result<()> {
        if errors.is_empty() {
            return Ok(());
        }

        writeln!(writer, "{}:", self.paint("Errors", |s| s.red().bold()))?;
        for error in errors {
            writeln!(writer, "  {} {}", self.paint("✗", |s| s.red()), error)?;
        }
        writeln!(writer)
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        self.format_notices(&result.summary, writer)?;

        if self.verbosity != Verbosity::Quiet {
            self.format_groups(&result.summary, writer)?;
            self.format_errors(&result.errors, writer)?;
        }

        self.format_summary(&result.summary, writer)?;
        writeln!(
            writer,
            "{}",
            self.paint(
                &format!(
                    "Done in {} ({} repositories)",
                    format_elapsed(result.elapsed),
                    result.repositories.len()
                ),
                |s| s.dimmed()
            )
        )
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verb = if summary.dry_run { "Would update" } else { "Updated" };

        writeln!(writer, "{}:", self.paint("Summary", |s| s.bold()))?;
        writeln!(writer, "  Total:          {}", summary.total)?;
        writeln!(
            writer,
            "  {:15} {} ({} patch, {} minor, {} major)",
            format!("{verb}:"),
            self.paint(&summary.updated.to_string(), |s| s.green()),
            summary.patches,
            summary.minors,
            summary.majors
        )?;
        writeln!(
            writer,
            "  Majors skipped: {}",
            self.paint(&summary.majors_skipped.to_string(), |s| s.yellow())
        )?;
        writeln!(
            writer,
            "  Errors:         {}",
            self.paint(&summary.errors.to_string(), |s| s.red())
        )?;
        if summary.majors_skipped > 0 && !summary.unsafe_mode {
            writeln!(
                writer,
                "{}",
                self.paint("Re-run with --unsafe to apply major updates", |s| s.dimmed())
            )?;
        }
        Ok(())
    }
}
