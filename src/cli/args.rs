//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap. Flags mirror the
//! keys of `[tool.poetry-plugin-appimage]`; a flag given here wins over the
//! config value.

use crate::bundler::settings::CliOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AppImage builder for Poetry projects
#[derive(Parser, Debug)]
#[command(
    name = "poetry-appimage",
    version,
    about = "Builds an AppImage for a Poetry project",
    long_about = "Packages a Poetry-managed Python application, a Miniconda runtime and the locked \
dependencies into a single AppImage.

Usage:
  poetry-appimage build-appimage --build-number 42
  poetry-appimage -C ./example_project build-appimage --skip-build --skip-cleanup
  poetry-appimage build-appimage --entrypoints main,retval --dependency-group main

Exit code 0 = AppImage written to dist/<name>-<version>.AppImage."
)]
pub struct Args {
    /// Project directory (defaults to the nearest parent containing pyproject.toml)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Poetry executable to use for lock checks and requirements export
    #[arg(long, env = "POETRY", global = true, value_name = "PATH")]
    pub poetry: Option<PathBuf>,

    /// Print the resolved options and every build step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Builds an AppImage for the poetry project
    #[command(name = "build-appimage")]
    BuildAppimage(BuildAppimageArgs),
}

/// Flags of `build-appimage`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildAppimageArgs {
    /// Unique build number appended to the version (optional)
    #[arg(short = 'b', long, value_name = "NUMBER")]
    pub build_number: Option<u64>,

    /// Keep the generated build resources for inspection
    #[arg(long)]
    pub skip_cleanup: bool,

    /// Render the build resources without running the build.
    ///
    /// Use together with --skip-cleanup so the generated files can be
    /// inspected and run manually.
    #[arg(long)]
    pub skip_build: bool,

    /// Only this project subfolder is included in the bundle
    #[arg(long, value_name = "SUBFOLDER")]
    pub include_only: Option<String>,

    /// Dependency group to export (defaults to Poetry's default groups)
    #[arg(long, value_name = "GROUP")]
    pub dependency_group: Option<String>,

    /// Comma separated entrypoint names (defaults to every declared script)
    #[arg(long, value_name = "NAMES")]
    pub entrypoints: Option<String>,

    /// Leave files matched by .gitignore out of the bundle
    #[arg(long)]
    pub exclude_gitignore: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                return Err(format!("Project directory does not exist: {}", dir.display()));
            }
        }

        let Command::BuildAppimage(build) = &self.command;
        if build.include_only.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err("--include-only cannot be empty".to_string());
        }

        Ok(())
    }
}

impl From<&BuildAppimageArgs> for CliOverrides {
    fn from(args: &BuildAppimageArgs) -> Self {
        Self {
            include_only: args.include_only.clone(),
            dependency_group: args.dependency_group.clone(),
            entrypoints: args.entrypoints.clone(),
            exclude_gitignore: args.exclude_gitignore,
            skip_cleanup: args.skip_cleanup,
            skip_build: args.skip_build,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_build_flag() {
        let args = Args::try_parse_from([
            "poetry-appimage",
            "build-appimage",
            "-b",
            "42",
            "--skip-cleanup",
            "--skip-build",
            "--include-only",
            "src",
            "--dependency-group",
            "main",
            "--entrypoints",
            "main,retval",
            "--exclude-gitignore",
        ])
        .unwrap();

        let Command::BuildAppimage(build) = &args.command;
        assert_eq!(build.build_number, Some(42));
        let overrides = CliOverrides::from(build);
        assert!(overrides.skip_cleanup && overrides.skip_build && overrides.exclude_gitignore);
        assert_eq!(overrides.include_only.as_deref(), Some("src"));
        assert_eq!(overrides.dependency_group.as_deref(), Some("main"));
        assert_eq!(overrides.entrypoints.as_deref(), Some("main,retval"));
    }

    #[test]
    fn flags_default_to_unset() {
        let args = Args::try_parse_from(["poetry-appimage", "build-appimage"]).unwrap();
        let Command::BuildAppimage(build) = &args.command;
        let overrides = CliOverrides::from(build);
        assert!(!overrides.skip_cleanup && !overrides.skip_build && !overrides.exclude_gitignore);
        assert!(overrides.entrypoints.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn build_number_must_be_numeric() {
        assert!(Args::try_parse_from(["poetry-appimage", "build-appimage", "-b", "x"]).is_err());
    }
}
