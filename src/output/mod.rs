//! Output formatting for update results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::domain::UpdateSummary;
use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Counts only
    Quiet,
    #[default]
    Normal,
    /// Also lists per-item errors in full
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Spinners only make sense for a human watching text output
    pub fn show_progress(&self) -> bool {
        self.format == OutputFormat::Text && self.verbosity != Verbosity::Quiet
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write just the summary counts
    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: &OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{AppliedUpdate, Dependency, FileType, GroupBy, UpdateType};
    use crate::repository::Repository;
    use std::time::Duration;

    fn resolved(
        name: &str,
        current: &str,
        latest: Option<&str>,
        update_type: Option<UpdateType>,
        file_type: FileType,
    ) -> Dependency {
        let mut dep = Dependency::new(
            name,
            current,
            file_type,
            "web",
            "/src/web",
            format!("/src/web/{}", file_type.as_str()),
        );
        dep.latest_version = latest.map(str::to_string);
        dep.update_type = update_type;
        dep
    }

    /// A dry run over one repository: a patch, a minor, a skipped major and a failure
    pub(crate) fn sample_result() -> OrchestratorResult {
        let dependencies = vec![
            resolved("left-pad", "1.0.0", Some("1.0.1"), Some(UpdateType::Patch), FileType::PackageJson),
            resolved("requests", ">=2.31.0", Some("2.32.3"), Some(UpdateType::Minor), FileType::PyprojectToml),
            resolved("react", "^17.0.0", Some("18.2.0"), Some(UpdateType::Major), FileType::PackageJson),
            resolved("ghost", "1.0.0", None, None, FileType::PackageJson),
        ];
        let applied = vec![
            AppliedUpdate::new(dependencies[0].clone(), "1.0.1"),
            AppliedUpdate::new(dependencies[1].clone(), "2.32.3"),
        ];
        let summary = UpdateSummary::build(&dependencies, &applied, true, false, GroupBy::Repository);

        OrchestratorResult {
            repositories: vec![Repository::new("/src/web")],
            dependencies,
            applied,
            summary,
            errors: vec!["ghost (npm): package 'ghost' not found in npm".to_string()],
            elapsed: Duration::from_millis(1250),
        }
    }

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(config.color);
        assert!(config.show_progress());
    }

    #[test]
    fn test_output_config_from_cli_json() {
        let config = OutputConfig::from_cli(true, false, false);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.show_progress());
    }

    #[test]
    fn test_output_config_from_cli_quiet() {
        let config = OutputConfig::from_cli(false, false, true);
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert!(!config.show_progress());
    }

    #[test]
    fn test_output_config_from_cli_verbose() {
        let config = OutputConfig::from_cli(false, true, false);
        assert_eq!(config.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_create_formatter_writes_something() {
        let result = sample_result();
        for config in [OutputConfig::from_cli(true, false, false), OutputConfig::default()] {
            let mut out = Vec::new();
            create_formatter(&config).format(&result, &mut out).unwrap();
            assert!(!out.is_empty());
        }
    }
}
