//! Plugin metadata: the single record every template is rendered against.

use super::{Arch, BuildOptions, ToolSection, TOOL_SECTION};
use crate::error::ConfigurationError;
use crate::metadata::ProjectManifest;
use serde::Serialize;

/// Miniconda release used when `miniconda` is not configured.
pub const DEFAULT_MINICONDA: &str = "latest";

/// One launchable script inside the bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    /// Script name, used as the first argument of the AppImage
    pub name: String,
    /// Interpreter arguments, e.g. `-c "import main; main.main()"`
    pub command: String,
}

/// Metadata for one build invocation.
///
/// Serialized field names are the variables available to the templates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub app_name: String,
    /// Base version, plus `.<build_number>` when one was given
    pub version: String,
    /// Desktop entry categories, always `;` terminated
    pub categories: String,
    pub entry_points: Vec<EntryPoint>,
    /// Declared scripts left out by the allow-list
    #[serde(skip)]
    pub skipped_entry_points: Vec<String>,
    /// Allow-list names that match no declared script
    #[serde(skip)]
    pub unknown_entry_points: Vec<String>,
    /// Installer file name, e.g. `Miniconda3-py37_4.10.3-Linux-x86_64.sh`
    pub miniconda_dist_name: String,
    pub miniconda: String,
    /// Target interpreter version, empty when unset
    pub python: String,
    /// linuxdeploy architecture name
    pub arch: String,
}

impl PluginMetadata {
    /// Resolve the metadata for `manifest`.
    ///
    /// `options` must already be merged; `section` supplies the values that
    /// have no CLI counterpart.
    pub fn resolve(
        manifest: &ProjectManifest,
        section: &ToolSection,
        options: &BuildOptions,
        build_number: Option<u64>,
        arch: Arch,
    ) -> Result<Self, ConfigurationError> {
        let categories = section
            .categories
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ConfigurationError::MissingKey {
                key: "categories".to_string(),
                table: format!("[tool.{TOOL_SECTION}]"),
            })?;

        let miniconda = section
            .miniconda
            .clone()
            .unwrap_or_else(|| DEFAULT_MINICONDA.to_string());
        let python = section.python.clone().unwrap_or_default();
        let selection = select_entry_points(&manifest.scripts, options.entrypoints.as_deref())?;

        Ok(Self {
            app_name: manifest.name.clone(),
            version: compose_version(&manifest.version, build_number),
            categories: terminate_categories(categories),
            entry_points: selection.entry_points,
            skipped_entry_points: selection.skipped,
            unknown_entry_points: selection.unknown,
            miniconda_dist_name: miniconda_dist_name(section.python.as_deref(), &miniconda, arch),
            miniconda,
            python,
            arch: arch.linuxdeploy_name().to_string(),
        })
    }
}

/// `"<version>.<build_number>"`, or the version unchanged.
pub fn compose_version(base: &str, build_number: Option<u64>) -> String {
    match build_number {
        Some(n) => format!("{base}.{n}"),
        None => base.to_string(),
    }
}

/// Installer name following `Miniconda3-{pyXY_}{version}-Linux-{arch}.sh`.
pub fn miniconda_dist_name(python: Option<&str>, miniconda: &str, arch: Arch) -> String {
    let python_part = python
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("py{}_", p.replace('.', "")))
        .unwrap_or_default();
    format!(
        "Miniconda3-{python_part}{miniconda}-Linux-{}.sh",
        arch.miniconda_name()
    )
}

/// Scripts kept by the allow-list, plus the names the caller should report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntrySelection {
    pub entry_points: Vec<EntryPoint>,
    /// Declared but not allowed
    pub skipped: Vec<String>,
    /// Allowed but not declared
    pub unknown: Vec<String>,
}

/// Keep the scripts named in `allowed` (all of them when `None`) and turn
/// each into an interpreter invocation. Declaration order is preserved.
///
/// An allow-list that keeps nothing is an error: the bundle would have no
/// way to start the application.
pub fn select_entry_points(
    scripts: &[(String, String)],
    allowed: Option<&[String]>,
) -> Result<EntrySelection, ConfigurationError> {
    let mut selection = EntrySelection::default();

    if let Some(allowed) = allowed {
        selection.unknown = allowed
            .iter()
            .filter(|name| !scripts.iter().any(|(script, _)| script == *name))
            .cloned()
            .collect();
    }

    for (name, descriptor) in scripts {
        if allowed.is_some_and(|allowed| !allowed.contains(name)) {
            log::debug!("Entrypoint {} is not in the allow-list", name);
            selection.skipped.push(name.clone());
            continue;
        }
        selection.entry_points.push(EntryPoint {
            name: name.clone(),
            command: launch_command(name, descriptor)?,
        });
    }

    if let Some(allowed) = allowed {
        if selection.entry_points.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: "entrypoints".to_string(),
                reason: format!(
                    "none of `{}` is declared in the project scripts",
                    allowed.join(",")
                ),
            });
        }
    }
    Ok(selection)
}

/// `module:callable` → `-c "import module; module.callable()"`.
///
/// Extras markers such as `module:callable [cli]` are dropped.
pub fn launch_command(name: &str, descriptor: &str) -> Result<String, ConfigurationError> {
    let descriptor = descriptor.split('[').next().unwrap_or_default().trim();
    let (module, callable) = descriptor
        .split_once(':')
        .map(|(m, c)| (m.trim(), c.trim()))
        .filter(|(m, c)| !m.is_empty() && !c.is_empty())
        .ok_or_else(|| ConfigurationError::InvalidValue {
            key: format!("scripts.{name}"),
            reason: format!("`{descriptor}` is not of the form module:callable"),
        })?;
    Ok(format!("-c \"import {module}; {module}.{callable}()\""))
}

/// Desktop entry validators require the category list to end with `;`.
fn terminate_categories(categories: &str) -> String {
    if categories.ends_with(';') {
        categories.to_string()
    } else {
        format!("{categories};")
    }
}
