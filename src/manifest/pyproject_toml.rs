//! pyproject.toml parser for Python projects
//!
//! Handles:
//! - tool.poetry.dependencies (Poetry), string or `{ version = ... }` values
//! - project.dependencies (PEP 621) as an array of PEP 508 strings
//! - project.dependencies written as a name -> constraint table (non-standard)
//!
//! Rewrites are line based so comments and layout survive untouched.

use crate::domain::{FileType, VersionSpec};
use crate::error::ManifestError;
use crate::manifest::{package_pattern, Declaration, ManifestParser};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use toml::{Table, Value};

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser;

// name, optional [extras], operator, version
static PEP508_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*([<>=!~]+)\s*([A-Za-z0-9_.*+-]+)")
        .expect("Invalid regex")
});

// `[table.header]`, optionally followed by a comment
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[([^\[\]]+)\]\s*(?:#.*)?$").expect("Invalid regex")
});

/// Tables whose `name = "version"` keys are dependency declarations
const KEYED_SECTIONS: &[&str] = &["tool.poetry.dependencies", "project.dependencies"];

/// The dependency layouts a pyproject.toml can carry
#[derive(Debug)]
enum DependencySection<'a> {
    /// `[tool.poetry.dependencies]`
    Poetry(&'a Table),
    /// `[project] dependencies = ["requests>=2.25.1"]`
    Pep621Array(&'a [Value]),
    /// `[project.dependencies] requests = ">=2.25.1"`
    Pep621Table(&'a Table),
}

impl<'a> DependencySection<'a> {
    /// Classifies every dependency section present in the document
    fn detect(doc: &'a Table) -> Vec<DependencySection<'a>> {
        let mut sections = Vec::new();

        if let Some(poetry) = doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            sections.push(DependencySection::Poetry(poetry));
        }

        match doc.get("project").and_then(|p| p.get("dependencies")) {
            Some(Value::Array(items)) => sections.push(DependencySection::Pep621Array(items)),
            Some(Value::Table(table)) => sections.push(DependencySection::Pep621Table(table)),
            _ => {}
        }

        sections
    }

    fn declarations(&self) -> Vec<Declaration> {
        match self {
            DependencySection::Poetry(table) => table
                .iter()
                .filter(|(name, _)| name.as_str() != "python")
                .filter_map(|(name, value)| {
                    let version = match value {
                        Value::String(s) => s.as_str(),
                        Value::Table(t) => t.get("version").and_then(|v| v.as_str())?,
                        _ => return None,
                    };
                    Some(Declaration::new(name, version))
                })
                .collect(),
            DependencySection::Pep621Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .filter_map(parse_pep508)
                .collect(),
            DependencySection::Pep621Table(table) => {
                tracing::debug!("project.dependencies is a table; treating entries as name + constraint");
                table
                    .iter()
                    .filter_map(|(name, value)| {
                        let constraint = value.as_str()?;
                        parse_pep508(&format!("{name}{constraint}"))
                    })
                    .collect()
            }
        }
    }
}

/// Parses `name[extras] <op> version`; strings without an operator yield nothing
fn parse_pep508(spec: &str) -> Option<Declaration> {
    let caps = PEP508_RE.captures(spec)?;
    Some(Declaration::new(&caps[1], format!("{}{}", &caps[2], &caps[3])))
}

impl ManifestParser for PyprojectTomlParser {
    fn parse(&self, content: &str) -> Result<Vec<Declaration>, ManifestError> {
        let doc: Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("pyproject.toml", e.to_string()))?;

        Ok(DependencySection::detect(&doc)
            .iter()
            .flat_map(DependencySection::declarations)
            .collect())
    }

    fn file_type(&self) -> FileType {
        FileType::PyprojectToml
    }

    fn update_version(
        &self,
        content: &str,
        package: &str,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let name = regex::escape(package);

        // requests = "^2.25"
        let poetry = package_pattern(
            package,
            format!(r#"^(\s*{name}\s*=\s*["'])([^"']+)(["'])"#),
        )?;
        // requests = { version = "^2.25", extras = ["socks"] }
        let inline_table = package_pattern(
            package,
            format!(r#"^(\s*{name}\s*=\s*\{{[^}}]*\bversion\s*=\s*["'])([^"']+)(["'])"#),
        )?;
        // "requests[socks]>=2.25.1,<3", "django>=4.2rc1"
        let pep621 = package_pattern(
            package,
            format!(r#"(["']{name}\s*(?:\[[^\]]*\])?\s*)([<>=!~]+)(\s*)([0-9][A-Za-z0-9_.*+-]*)"#),
        )?;

        let keep_prefix = |caps: &Captures| {
            let spec = VersionSpec::parse(&caps[2]);
            format!("{}{}{}", &caps[1], spec.format_updated(new_version), &caps[3])
        };

        let mut in_keyed_section = false;
        let lines: Vec<String> = content
            .split('\n')
            .map(|line| {
                if let Some(caps) = HEADER_RE.captures(line) {
                    in_keyed_section = KEYED_SECTIONS.contains(&caps[1].trim());
                    return line.to_string();
                }
                if in_keyed_section && poetry.is_match(line) {
                    poetry.replace(line, &keep_prefix).into_owned()
                } else if in_keyed_section && inline_table.is_match(line) {
                    inline_table.replace(line, &keep_prefix).into_owned()
                } else {
                    pep621
                        .replace_all(line, |caps: &Captures| {
                            format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], new_version)
                        })
                        .into_owned()
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
