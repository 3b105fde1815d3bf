//! linuxdeploy acquisition.
//!
//! The AppImage is downloaded once per architecture into the user cache
//! directory and reused by later builds. `$LINUXDEPLOY` overrides the lookup.

use crate::bundler::{
    error::{Context, ErrorExt, Result},
    settings::Arch,
    utils::{fs, http},
};
use std::path::PathBuf;

const LINUXDEPLOY_BASE_URL: &str =
    "https://github.com/linuxdeploy/linuxdeploy/releases/download/continuous";

/// Environment variable pointing at a local linuxdeploy binary.
pub const LINUXDEPLOY_ENV: &str = "LINUXDEPLOY";

/// Cache sub-directory for downloaded tools.
const CACHE_DIR_NAME: &str = "poetry-appimage";

/// Locate or download linuxdeploy for `arch`.
pub async fn linuxdeploy(arch: Arch) -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(LINUXDEPLOY_ENV) {
        let path = PathBuf::from(path);
        if !path.is_file() {
            crate::bail!(
                "{} points to {}, which is not a file",
                LINUXDEPLOY_ENV,
                path.display()
            );
        }
        log::debug!("Using linuxdeploy from ${}: {}", LINUXDEPLOY_ENV, path.display());
        return Ok(path);
    }

    let tools_dir = dirs::cache_dir()
        .context("could not determine the user cache directory")?
        .join(CACHE_DIR_NAME);
    tokio::fs::create_dir_all(&tools_dir)
        .await
        .fs_context("creating tools directory", &tools_dir)?;

    let tool_name = format!("linuxdeploy-{}.AppImage", arch.linuxdeploy_name());
    let tool_path = tools_dir.join(&tool_name);

    if tool_path.is_file() {
        log::debug!("linuxdeploy already cached at {}", tool_path.display());
        return Ok(tool_path);
    }

    log::info!("Downloading linuxdeploy for {}...", arch.linuxdeploy_name());
    let data = http::download(&format!("{LINUXDEPLOY_BASE_URL}/{tool_name}")).await?;

    // Write next to the final path so an interrupted download is never reused
    let partial = tools_dir.join(format!("{tool_name}.part"));
    tokio::fs::write(&partial, data)
        .await
        .fs_context("writing linuxdeploy tool", &partial)?;
    #[cfg(unix)]
    fs::make_executable(&partial).await?;
    tokio::fs::rename(&partial, &tool_path)
        .await
        .fs_context("moving linuxdeploy into place", &tool_path)?;

    Ok(tool_path)
}
