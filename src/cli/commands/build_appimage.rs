//! The `build-appimage` command.
//!
//! All preconditions (host OS, config section, lock state, architecture,
//! option validity) are checked before the first file is written, so a
//! failed precondition leaves the project untouched.

use super::CommandContext;
use crate::bundler::{
    self, BUILD_RESOURCES, BuildFailure, BuildOptions, BuildOrchestrator, BuildOutcome, CliOverrides,
    LockCheck, Poetry, PluginMetadata, ResourceRenderer,
    settings::{Arch, check_host_os},
};
use crate::cli::BuildAppimageArgs;
use crate::error::{ConfigurationError, LockStateError, Result};
use crate::metadata::load_manifest;
use std::path::PathBuf;

/// Run `build-appimage`; returns the process exit code.
pub async fn execute(args: &BuildAppimageArgs, context: &CommandContext) -> Result<i32> {
    let output = context.config.output();

    check_host_os(std::env::consts::OS)?;

    let manifest = load_manifest(&context.project_root)?;
    let section = manifest.tool_section()?;
    let lock_path = manifest.lock_path();
    if !lock_path.is_file() {
        return Err(LockStateError::Missing { path: lock_path }.into());
    }
    let poetry = Poetry::locate(context.poetry.as_deref(), &manifest.root)?;
    check_lock_freshness(&poetry).await?;

    for name in &manifest.skipped_scripts {
        output.warn(&format!("Skipping script `{name}`: file scripts cannot be bundled"))?;
    }
    if manifest.scripts.is_empty() {
        output.warn("No entry points defined in section [tool.poetry.scripts]")?;
    }

    let arch = Arch::detect().await?;
    let options = BuildOptions::resolve(&CliOverrides::from(args), &section);
    if output.is_verbose() {
        output.verbose(&format!(
            "running with the following options: {}",
            serde_json::to_string(&options)?
        ))?;
    }

    let metadata = PluginMetadata::resolve(&manifest, &section, &options, args.build_number, arch)?;
    for name in &metadata.unknown_entry_points {
        output.warn(&format!(
            "Entrypoint `{name}` is not declared in the project scripts"
        ))?;
    }
    for name in &metadata.skipped_entry_points {
        output.verbose(&format!(
            "Skipping entrypoint {name} because it is not in allowed entrypoints setting"
        ))?;
    }
    for entry_point in &metadata.entry_points {
        output.verbose(&format!("Added entrypoint: {}", entry_point.name))?;
    }

    if let Some(icon) = &section.icon {
        if !manifest.root.join(icon).is_file() {
            return Err(ConfigurationError::InvalidValue {
                key: "icon".to_string(),
                reason: format!("{} is not a file", icon.display()),
            }
            .into());
        }
    }

    if options.skip_build && !options.skip_cleanup {
        output.warn(
            "--skip-build without --skip-cleanup removes the generated files right away; \
             add --skip-cleanup to inspect them",
        )?;
    }

    if let Some(build_number) = args.build_number {
        output.verbose(&format!("Build Number: {build_number}"))?;
    }
    output.section(&format!(
        "Starting build for {}. Version: {}",
        metadata.app_name, metadata.version
    ))?;

    let renderer = ResourceRenderer::new(&manifest.root, &metadata, section.icon.as_deref());
    // Resolved up front so cleanup knows every path even if rendering stops midway
    let destinations = BUILD_RESOURCES
        .iter()
        .map(|resource| renderer.destination_path(resource))
        .collect::<bundler::Result<Vec<PathBuf>>>()?;

    let orchestrator = BuildOrchestrator::new(&manifest.root, &options, &poetry);

    let result: bundler::Result<BuildOutcome> = async {
        output.progress("Rendering build resources")?;
        renderer.render_all(&BUILD_RESOURCES).await?;
        output.progress("Exporting locked requirements")?;
        let outcome = orchestrator.build(&metadata, arch).await?;
        Ok(outcome)
    }
    .await;

    if let Ok(outcome) = &result {
        if let Err(e) = report_outcome(context, &orchestrator, &metadata, &options, outcome).await {
            log::warn!("Failed to report build outcome: {}", e);
        }
    }

    if !options.skip_cleanup {
        output.progress("Cleaning up generated build resources")?;
        if let Err(e) = orchestrator.cleanup(&destinations).await {
            // Keep the original failure when there is one
            if result.is_ok() {
                return Err(e.into());
            }
            output.warn(&format!("cleanup failed: {e}"))?;
        }
    }

    Ok(result?.exit_code)
}

/// Fail unless poetry.lock matches pyproject.toml.
async fn check_lock_freshness(poetry: &Poetry) -> Result<()> {
    match poetry.check_lock().await? {
        LockCheck::Fresh => Ok(()),
        LockCheck::Stale(details) => {
            log::debug!("poetry check --lock: {}", details);
            Err(LockStateError::Stale { details }.into())
        }
    }
}

async fn report_outcome(
    context: &CommandContext,
    orchestrator: &BuildOrchestrator<'_>,
    metadata: &PluginMetadata,
    options: &BuildOptions,
    outcome: &BuildOutcome,
) -> Result<()> {
    let output = context.config.output();

    match &outcome.failure {
        None if options.skip_build => {
            output.success("Build resources generated, build skipped")?;
        }
        None => match orchestrator.bundle_checksum(metadata).await? {
            Some((path, checksum)) => {
                output.success(&format!("Created AppImage: {}", path.display()))?;
                output.indent(&format!("sha256: {checksum}"))?;
            }
            None => {
                output.warn(&format!(
                    "Build script succeeded but {} was not found",
                    orchestrator.bundle_path(metadata).display()
                ))?;
            }
        },
        Some(BuildFailure::NonZeroExit) => {
            output.error(&format!(
                "Return value from build script is non-zero ({}). Please check the logs",
                outcome.exit_code
            ))?;
        }
        Some(BuildFailure::Launch(reason)) => {
            output.error(&format!("Failed to execute the build. Details: {reason}"))?;
        }
    }

    Ok(())
}
