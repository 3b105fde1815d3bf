//! Poetry as an external collaborator.
//!
//! Lock freshness and requirements export are delegated to the `poetry`
//! executable so the answers match what Poetry itself would do.

use crate::bundler::error::{Context, Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Result of `poetry check --lock`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockCheck {
    /// poetry.lock matches pyproject.toml
    Fresh,
    /// poetry.lock is outdated; carries Poetry's explanation
    Stale(String),
}

/// Handle on the `poetry` executable for one project.
#[derive(Clone, Debug)]
pub struct Poetry {
    program: PathBuf,
    project_root: PathBuf,
}

impl Poetry {
    /// Use `program` when given, otherwise look `poetry` up on `PATH`.
    pub fn locate(program: Option<&Path>, project_root: &Path) -> Result<Self> {
        let program = match program {
            Some(p) => p.to_path_buf(),
            None => which::which("poetry").context("poetry executable not found on PATH")?,
        };
        log::debug!("Using poetry at {}", program.display());

        Ok(Self {
            program,
            project_root: project_root.to_path_buf(),
        })
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .current_dir(&self.project_root)
            .arg("--no-interaction")
            .arg("--no-ansi");
        command
    }

    /// Ask Poetry whether poetry.lock is up to date with pyproject.toml.
    pub async fn check_lock(&self) -> Result<LockCheck> {
        let output = self
            .command()
            .args(["check", "--lock"])
            .output()
            .await
            .map_err(|error| Error::CommandFailed {
                command: "poetry check --lock".to_string(),
                error,
            })?;

        if output.status.success() {
            return Ok(LockCheck::Fresh);
        }

        let mut details = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if details.is_empty() {
            details = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        Ok(LockCheck::Stale(details))
    }

    /// Export the locked dependencies to `output` in requirements.txt format,
    /// optionally restricted to a single dependency group.
    pub async fn export_requirements(&self, output: &Path, group: Option<&str>) -> Result<()> {
        let output_str = output
            .to_str()
            .context("requirements path contains invalid UTF-8")?;

        let mut command = self.command();
        command.args(["export", "--format", "requirements.txt", "--output", output_str]);
        if let Some(group) = group {
            log::info!("Only using the dependency group {}", group);
            command.args(["--only", group]);
        }

        let result = command.output().await.map_err(|error| Error::CommandFailed {
            command: "poetry export".to_string(),
            error,
        })?;

        if !result.status.success() {
            return Err(Error::GenericError(format!(
                "poetry export failed with exit code {:?}: {}",
                result.status.code(),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        Ok(())
    }
}
