//! Project metadata discovery from a single pyproject.toml

use crate::bundler::settings::{TOOL_SECTION, ToolSection};
use crate::error::{ConfigurationError, PluginError, Result};
use std::path::{Path, PathBuf};

/// Project manifest file name
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Poetry lock file name
pub const LOCK_FILE: &str = "poetry.lock";

/// Project data extracted from pyproject.toml
#[derive(Clone, Debug)]
pub struct ProjectManifest {
    /// Directory containing pyproject.toml
    pub root: PathBuf,

    /// Project name ([tool.poetry] or [project])
    pub name: String,

    /// Base project version, before any build number is appended
    pub version: String,

    /// Declared scripts as (name, "module:callable") in declaration order
    pub scripts: Vec<(String, String)>,

    /// Declared scripts that cannot be bundled (`type = "file"`)
    pub skipped_scripts: Vec<String>,

    /// Raw `[tool.poetry-plugin-appimage]` table, if present
    pub tool_section: Option<toml::Table>,
}

impl ProjectManifest {
    /// Path of poetry.lock next to pyproject.toml
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Typed plugin section, or a configuration error when it is absent.
    pub fn tool_section(&self) -> std::result::Result<ToolSection, ConfigurationError> {
        let table = self
            .tool_section
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingSection {
                section: TOOL_SECTION.to_string(),
            })?;
        ToolSection::from_table(table)
    }
}

/// Walk up from `start` to the first directory containing pyproject.toml.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PYPROJECT_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConfigurationError::ManifestNotFound {
                start: start.to_path_buf(),
            }
            .into()
        })
}

/// Load the manifest of the project rooted at `root` (single read + parse).
///
/// Poetry's own `[tool.poetry]` table wins; PEP 621 `[project]` fills in
/// whatever it leaves out.
pub fn load_manifest(root: &Path) -> Result<ProjectManifest> {
    let path = root.join(PYPROJECT_FILE);
    let content = std::fs::read_to_string(&path)?;
    let document: toml::Table = toml::from_str(&content)?;

    let tool = document.get("tool").and_then(|v| v.as_table());
    let poetry = tool.and_then(|t| t.get("poetry")).and_then(|v| v.as_table());
    let project = document.get("project").and_then(|v| v.as_table());

    let name = string_key(poetry, project, "name")?;
    let version = string_key(poetry, project, "version")?;

    let script_table = poetry
        .and_then(|p| p.get("scripts"))
        .or_else(|| project.and_then(|p| p.get("scripts")))
        .and_then(|v| v.as_table());
    let (scripts, skipped_scripts) = match script_table {
        Some(table) => parse_scripts(table)?,
        None => (Vec::new(), Vec::new()),
    };

    let tool_section = tool
        .and_then(|t| t.get(TOOL_SECTION))
        .and_then(|v| v.as_table())
        .cloned();

    Ok(ProjectManifest {
        root: root.to_path_buf(),
        name,
        version,
        scripts,
        skipped_scripts,
        tool_section,
    })
}

fn string_key(
    poetry: Option<&toml::Table>,
    project: Option<&toml::Table>,
    key: &str,
) -> Result<String> {
    poetry
        .and_then(|t| t.get(key))
        .or_else(|| project.and_then(|t| t.get(key)))
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| {
            PluginError::from(ConfigurationError::MissingKey {
                key: key.to_string(),
                table: "[tool.poetry] or [project]".to_string(),
            })
        })
}

/// Read the script table. Values are either `"module:callable"` strings or
/// tables carrying a `callable`/`reference` key. File scripts are returned
/// separately by name.
fn parse_scripts(table: &toml::Table) -> Result<(Vec<(String, String)>, Vec<String>)> {
    let mut scripts = Vec::with_capacity(table.len());
    let mut skipped = Vec::new();

    for (name, value) in table {
        let descriptor = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Table(t) => {
                if t.get("type").and_then(|v| v.as_str()) == Some("file") {
                    skipped.push(name.clone());
                    continue;
                }
                t.get("callable")
                    .or_else(|| t.get("reference"))
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .ok_or_else(|| {
                        PluginError::from(ConfigurationError::InvalidValue {
                            key: format!("scripts.{name}"),
                            reason: "script table needs a `callable` or `reference` key".into(),
                        })
                    })?
            }
            other => {
                return Err(ConfigurationError::InvalidValue {
                    key: format!("scripts.{name}"),
                    reason: format!("expected a string, found {}", other.type_str()),
                }
                .into());
            }
        };
        scripts.push((name.clone(), descriptor));
    }

    Ok((scripts, skipped))
}
