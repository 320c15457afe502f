//! package.json parser for npm projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::{FileType, VersionSpec};
use crate::error::ManifestError;
use crate::manifest::{Declaration, ManifestParser};
use serde_json::Value;

/// Sections walked for declarations, in this order
const SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Parser for package.json files
pub struct PackageJsonParser;

fn parse_json(content: &str) -> Result<Value, ManifestError> {
    serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error("package.json", e.to_string()))
}

impl ManifestParser for PackageJsonParser {
    fn parse(&self, content: &str) -> Result<Vec<Declaration>, ManifestError> {
        let json = parse_json(content)?;
        let mut declarations = Vec::new();

        for section in SECTIONS {
            let Some(deps) = json.get(section).and_then(|v| v.as_object()) else {
                continue;
            };
            for (name, value) in deps {
                match value.as_str() {
                    Some(version) => declarations.push(Declaration::new(name, version)),
                    None => tracing::debug!(package = %name, "skipping non-string version"),
                }
            }
        }

        Ok(declarations)
    }

    fn file_type(&self) -> FileType {
        FileType::PackageJson
    }

    fn update_version(
        &self,
        content: &str,
        package: &str,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let mut json = parse_json(content)?;
        let mut changed = false;

        for section in SECTIONS {
            let Some(slot) = json
                .get_mut(section)
                .and_then(|v| v.as_object_mut())
                .and_then(|deps| deps.get_mut(package))
            else {
                continue;
            };
            let Some(old) = slot.as_str() else {
                continue;
            };

            let updated = VersionSpec::parse(old).format_updated(new_version);
            if updated != old {
                *slot = Value::String(updated);
                changed = true;
            }
        }

        if !changed {
            return Ok(content.to_string());
        }

        let mut output = serde_json::to_string_pretty(&json)
            .map_err(|e| ManifestError::json_parse_error("package.json", e.to_string()))?;
        output.push('\n');
        Ok(output)
    }
}
