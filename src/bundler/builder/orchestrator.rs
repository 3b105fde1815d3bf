//! Build orchestration: dependency export, the packaging script, cleanup.
//!
//! Runs after the resources are rendered. Failures of the packaging script
//! are values ([`BuildOutcome`]), not errors, so the caller can still clean up
//! and then propagate the script's exit code.

use super::{checksum::calculate_sha256, poetry::Poetry, toolchain};
use crate::bundler::{
    error::Result,
    resources::{BUILD_RESOURCES_DIR, BUILD_SCRIPT, FROZEN_REQUIREMENTS_FILE},
    settings::{Arch, BuildOptions, PluginMetadata},
    utils::fs,
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Directory (relative to the project root) receiving the AppImage.
pub const DIST_DIR: &str = "dist";

/// Why the packaging script did not succeed.
#[derive(Debug)]
pub enum BuildFailure {
    /// The script ran and exited non-zero or was killed by a signal
    NonZeroExit,
    /// The script could not be started
    Launch(String),
}

/// Exit code of the packaging step plus the failure kind, if any.
#[derive(Debug)]
pub struct BuildOutcome {
    pub exit_code: i32,
    pub failure: Option<BuildFailure>,
}

impl BuildOutcome {
    /// Successful (or intentionally skipped) build.
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            failure: None,
        }
    }

    fn launch_failed(reason: String) -> Self {
        Self {
            exit_code: 1,
            failure: Some(BuildFailure::Launch(reason)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drives the build for one project.
pub struct BuildOrchestrator<'a> {
    project_root: &'a Path,
    options: &'a BuildOptions,
    poetry: &'a Poetry,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(project_root: &'a Path, options: &'a BuildOptions, poetry: &'a Poetry) -> Self {
        Self {
            project_root,
            options,
            poetry,
        }
    }

    /// Frozen requirements file at the project root.
    pub fn requirements_path(&self) -> PathBuf {
        self.project_root.join(FROZEN_REQUIREMENTS_FILE)
    }

    /// Expected location of the finished bundle.
    pub fn bundle_path(&self, metadata: &PluginMetadata) -> PathBuf {
        self.project_root
            .join(DIST_DIR)
            .join(format!("{}-{}.AppImage", metadata.app_name, metadata.version))
    }

    /// Export the locked dependency set, honoring the dependency group option.
    pub async fn export_requirements(&self) -> Result<PathBuf> {
        let path = self.requirements_path();
        self.poetry
            .export_requirements(&path, self.options.dependency_group.as_deref())
            .await?;
        log::info!("Generated requirements file at {}", path.display());
        Ok(path)
    }

    /// Arguments passed to the packaging script.
    pub fn script_arguments(&self, version: &str) -> Vec<String> {
        let mut args = vec![version.to_string()];
        if let Some(subfolder) = &self.options.include_only {
            args.push("--include-only".to_string());
            args.push(subfolder.clone());
        }
        if self.options.exclude_gitignore {
            args.push("--exclude-gitignore".to_string());
        }
        args
    }

    /// Run `./build_appimage.sh` and wait for it, without timeout.
    pub async fn run_build_script(&self, version: &str, linuxdeploy: Option<&Path>) -> BuildOutcome {
        let script = self.project_root.join(BUILD_SCRIPT);
        let mut command = Command::new(&script);
        command
            .args(self.script_arguments(version))
            .current_dir(self.project_root);
        if let Some(linuxdeploy) = linuxdeploy {
            command.env(toolchain::LINUXDEPLOY_ENV, linuxdeploy);
        }

        log::debug!("Running {} {:?}", script.display(), self.script_arguments(version));
        match command.status().await {
            Ok(status) if status.success() => BuildOutcome::success(),
            Ok(status) => BuildOutcome {
                // Killed by a signal: no code
                exit_code: status.code().unwrap_or(1),
                failure: Some(BuildFailure::NonZeroExit),
            },
            Err(e) => BuildOutcome::launch_failed(format!("{}: {}", script.display(), e)),
        }
    }

    /// Export dependencies and, unless skipped, assemble the bundle.
    ///
    /// Export failures are errors; packaging failures are reported in the
    /// returned [`BuildOutcome`].
    pub async fn build(&self, metadata: &PluginMetadata, arch: Arch) -> Result<BuildOutcome> {
        self.export_requirements().await?;

        if self.options.skip_build {
            log::info!("Skipping build, generated resources are left for manual inspection");
            return Ok(BuildOutcome::success());
        }

        let linuxdeploy = match toolchain::linuxdeploy(arch).await {
            Ok(path) => path,
            Err(e) => return Ok(BuildOutcome::launch_failed(format!("linuxdeploy: {e}"))),
        };

        Ok(self
            .run_build_script(&metadata.version, Some(&linuxdeploy))
            .await)
    }

    /// Path and SHA-256 of the finished bundle, if it exists.
    pub async fn bundle_checksum(&self, metadata: &PluginMetadata) -> Result<Option<(PathBuf, String)>> {
        let path = self.bundle_path(metadata);
        if !path.is_file() {
            return Ok(None);
        }
        let checksum = calculate_sha256(&path).await?;
        Ok(Some((path, checksum)))
    }

    /// Delete rendered resources, the resources directory and the
    /// requirements file. Missing paths are skipped.
    pub async fn cleanup(&self, destinations: &[PathBuf]) -> Result<()> {
        for destination in destinations {
            if fs::remove_file(destination).await? {
                log::debug!("Removed {}", destination.display());
            }
        }
        fs::remove_dir_all(&self.project_root.join(BUILD_RESOURCES_DIR)).await?;
        fs::remove_file(&self.requirements_path()).await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bundler::utils::fs::make_executable;

    async fn setup(script_body: Option<&str>) -> (tempfile::TempDir, Poetry) {
        let dir = tempfile::tempdir().unwrap();
        if let Some(body) = script_body {
            let script = dir.path().join(BUILD_SCRIPT);
            std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
            make_executable(&script).await.unwrap();
        }
        let poetry = Poetry::locate(Some(Path::new("/bin/true")), dir.path()).unwrap();
        (dir, poetry)
    }

    #[tokio::test]
    async fn script_arguments_follow_options() {
        let (dir, poetry) = setup(None).await;
        let options = BuildOptions {
            include_only: Some("example_project".into()),
            exclude_gitignore: true,
            ..Default::default()
        };
        let orchestrator = BuildOrchestrator::new(dir.path(), &options, &poetry);

        assert_eq!(
            orchestrator.script_arguments("0.1.0.42"),
            ["0.1.0.42", "--include-only", "example_project", "--exclude-gitignore"]
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_propagated() {
        let (dir, poetry) = setup(Some("exit 7")).await;
        let options = BuildOptions::default();
        let orchestrator = BuildOrchestrator::new(dir.path(), &options, &poetry);

        let outcome = orchestrator.run_build_script("1.0", None).await;
        assert_eq!(outcome.exit_code, 7);
        assert!(matches!(outcome.failure, Some(BuildFailure::NonZeroExit)));
    }

    #[tokio::test]
    async fn script_receives_version_and_linuxdeploy() {
        let (dir, poetry) = setup(Some(r#"echo "$1 $LINUXDEPLOY" > seen.txt"#)).await;
        let options = BuildOptions::default();
        let orchestrator = BuildOrchestrator::new(dir.path(), &options, &poetry);

        let outcome = orchestrator
            .run_build_script("0.1.0.42", Some(Path::new("/opt/linuxdeploy")))
            .await;
        assert!(outcome.is_success());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("seen.txt")).unwrap(),
            "0.1.0.42 /opt/linuxdeploy\n"
        );
    }

    #[tokio::test]
    async fn missing_script_is_a_launch_failure() {
        let (dir, poetry) = setup(None).await;
        let options = BuildOptions::default();
        let orchestrator = BuildOrchestrator::new(dir.path(), &options, &poetry);

        let outcome = orchestrator.run_build_script("1.0", None).await;
        assert_eq!(outcome.exit_code, 1);
        assert!(matches!(outcome.failure, Some(BuildFailure::Launch(_))));
    }

    #[tokio::test]
    async fn cleanup_removes_generated_files() {
        let (dir, poetry) = setup(Some("exit 0")).await;
        let options = BuildOptions::default();
        let orchestrator = BuildOrchestrator::new(dir.path(), &options, &poetry);

        let resources = dir.path().join(BUILD_RESOURCES_DIR);
        std::fs::create_dir_all(resources.join("AppDir")).unwrap();
        std::fs::write(resources.join("app.desktop"), "").unwrap();
        std::fs::write(orchestrator.requirements_path(), "").unwrap();

        let destinations = vec![resources.join("app.desktop"), dir.path().join(BUILD_SCRIPT)];
        orchestrator.cleanup(&destinations).await.unwrap();

        assert!(!resources.exists());
        assert!(!dir.path().join(BUILD_SCRIPT).exists());
        assert!(!orchestrator.requirements_path().exists());
        // Second run finds nothing to delete
        orchestrator.cleanup(&destinations).await.unwrap();
    }
}
