//! Build options merged from the command line and `pyproject.toml`.
//!
//! Every option resolves as: CLI value if explicitly given, else the value in
//! `[tool.poetry-plugin-appimage]`, else a fixed default.

use crate::error::ConfigurationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Name of the `[tool.*]` table holding the plugin configuration.
pub const TOOL_SECTION: &str = "poetry-plugin-appimage";

/// Typed view of `[tool.poetry-plugin-appimage]`.
///
/// # Configuration
///
/// ```toml
/// [tool.poetry-plugin-appimage]
/// categories = "Utility;"
/// miniconda = "4.10.3"
/// python = "3.7"
/// entrypoints = ["main", "retval"]
/// dependency-group = "main"
/// ```
///
/// Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolSection {
    /// Desktop entry categories, e.g. `"Utility;"`. Required.
    pub categories: Option<String>,

    /// Miniconda release used as the bundled runtime.
    ///
    /// Default: `"latest"`
    #[serde(default, deserialize_with = "scalar_string")]
    pub miniconda: Option<String>,

    /// Target Python version, e.g. `"3.7"`.
    ///
    /// Default: unset (Miniconda's own default interpreter)
    #[serde(default, deserialize_with = "scalar_string")]
    pub python: Option<String>,

    /// Allow-list of script names, as an array or a comma separated string.
    pub entrypoints: Option<EntrypointList>,

    /// Restrict the exported requirements to one dependency group.
    pub dependency_group: Option<String>,

    /// Leave files matched by `.gitignore` out of the bundle.
    pub exclude_gitignore: Option<bool>,

    /// Keep the generated build resources after the build.
    pub skip_cleanup: Option<bool>,

    /// Render resources but do not run the build script.
    pub skip_build: Option<bool>,

    /// Only copy this project subfolder into the bundle.
    pub include_only: Option<String>,

    /// PNG icon for the desktop entry, relative to the project root.
    pub icon: Option<PathBuf>,
}

impl ToolSection {
    /// Deserialize the section from its raw TOML table.
    pub fn from_table(table: &toml::Table) -> Result<Self, ConfigurationError> {
        toml::Value::Table(table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigurationError::InvalidValue {
                key: format!("tool.{TOOL_SECTION}"),
                reason: e.to_string(),
            })
    }
}

/// Entrypoint allow-list as written in `pyproject.toml`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EntrypointList {
    /// `entrypoints = ["main", "retval"]`
    List(Vec<String>),
    /// `entrypoints = "main,retval"`
    Text(String),
}

impl EntrypointList {
    fn into_names(self) -> Vec<String> {
        match self {
            Self::List(names) => names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            Self::Text(text) => parse_entrypoint_list(&text),
        }
    }
}

/// Split a comma separated entrypoint list, tolerating `[a, b]` brackets.
pub fn parse_entrypoint_list(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accept `python = 3` as well as `python = "3.7"`.
///
/// Floats are rejected: `3.10` parses to the same value as `3.1`, so the
/// written version cannot be recovered.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Text(text)) => Ok(Some(text)),
        Some(Scalar::Integer(n)) => Ok(Some(n.to_string())),
        Some(Scalar::Float(f)) => Err(serde::de::Error::custom(format!(
            "version {f} must be written as a string, e.g. \"3.10\""
        ))),
    }
}

/// Options as given on the command line. `None`/`false` means "not set".
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub include_only: Option<String>,
    pub dependency_group: Option<String>,
    pub entrypoints: Option<String>,
    pub exclude_gitignore: bool,
    pub skip_cleanup: bool,
    pub skip_build: bool,
}

/// Fully resolved build options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildOptions {
    pub include_only: Option<String>,
    pub dependency_group: Option<String>,
    /// `None` keeps every declared script.
    pub entrypoints: Option<Vec<String>>,
    pub exclude_gitignore: bool,
    pub skip_cleanup: bool,
    pub skip_build: bool,
}

impl BuildOptions {
    /// Merge CLI overrides over the config section.
    pub fn resolve(cli: &CliOverrides, section: &ToolSection) -> Self {
        let entrypoints = cli
            .entrypoints
            .as_deref()
            .map(parse_entrypoint_list)
            .or_else(|| section.entrypoints.clone().map(EntrypointList::into_names))
            .filter(|names| !names.is_empty());

        Self {
            include_only: cli.include_only.clone().or_else(|| section.include_only.clone()),
            dependency_group: cli
                .dependency_group
                .clone()
                .or_else(|| section.dependency_group.clone()),
            entrypoints,
            exclude_gitignore: flag(cli.exclude_gitignore, section.exclude_gitignore),
            skip_cleanup: flag(cli.skip_cleanup, section.skip_cleanup),
            skip_build: flag(cli.skip_build, section.skip_build),
        }
    }
}

/// A boolean CLI flag only counts as set when present.
fn flag(cli: bool, config: Option<bool>) -> bool {
    cli || config.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(src: &str) -> ToolSection {
        let table: toml::Table = toml::from_str(src).unwrap();
        ToolSection::from_table(&table).unwrap()
    }

    #[test]
    fn cli_beats_config_beats_default() {
        let section = section(
            r#"
            categories = "Utility;"
            dependency-group = "main"
            include-only = "src"
            skip-cleanup = true
            "#,
        );
        let cli = CliOverrides {
            dependency_group: Some("runtime".into()),
            ..Default::default()
        };

        let options = BuildOptions::resolve(&cli, &section);
        assert_eq!(options.dependency_group.as_deref(), Some("runtime"));
        assert_eq!(options.include_only.as_deref(), Some("src"));
        assert!(options.skip_cleanup);
        assert!(!options.skip_build);
        assert!(!options.exclude_gitignore);
        assert_eq!(options.entrypoints, None);
    }

    #[test]
    fn unset_cli_flag_does_not_override_config() {
        let section = section("skip-build = true\nexclude-gitignore = false");
        let options = BuildOptions::resolve(&CliOverrides::default(), &section);
        assert!(options.skip_build);

        let cli = CliOverrides {
            exclude_gitignore: true,
            ..Default::default()
        };
        assert!(BuildOptions::resolve(&cli, &section).exclude_gitignore);
    }

    #[test]
    fn entrypoints_accept_array_or_string() {
        let from_array = section(r#"entrypoints = ["main", " retval "]"#);
        let from_text = section(r#"entrypoints = "[main, retval]""#);
        let cli = CliOverrides::default();

        let expected = Some(vec!["main".to_string(), "retval".to_string()]);
        assert_eq!(BuildOptions::resolve(&cli, &from_array).entrypoints, expected);
        assert_eq!(BuildOptions::resolve(&cli, &from_text).entrypoints, expected);
    }

    #[test]
    fn empty_allow_list_means_all_entrypoints() {
        let cli = CliOverrides {
            entrypoints: Some(" , ".into()),
            ..Default::default()
        };
        let options = BuildOptions::resolve(&cli, &ToolSection::default());
        assert_eq!(options.entrypoints, None);
    }

    #[test]
    fn integer_versions_are_stringified() {
        let section = section("python = 3\nminiconda = \"4.10.3\"");
        assert_eq!(section.python.as_deref(), Some("3"));
        assert_eq!(section.miniconda.as_deref(), Some("4.10.3"));
    }

    #[test]
    fn float_versions_are_rejected() {
        // 3.10 and 3.1 are the same TOML float
        let table: toml::Table = toml::from_str("python = 3.10").unwrap();
        let err = ToolSection::from_table(&table).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
        assert!(err.to_string().contains("\"3.10\""));

        let quoted = section("python = \"3.10\"");
        assert_eq!(quoted.python.as_deref(), Some("3.10"));
    }

    #[test]
    fn wrong_types_are_configuration_errors() {
        let table: toml::Table = toml::from_str("skip-build = \"yes\"").unwrap();
        let err = ToolSection::from_table(&table).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}
