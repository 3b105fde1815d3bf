//! File system utilities for build resources.
//!
//! Removal helpers are idempotent: a path that is already gone is not an
//! error, so cleanup can run after a partially failed build.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Removes a file if it exists.
///
/// Returns whether something was removed.
pub async fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Marks a file as executable (`0o755`).
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .fs_context("setting permissions on", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("requirements_for_appimage.txt");
        std::fs::write(&file, "numpy==1.18.0\n").unwrap();

        assert!(remove_file(&file).await.unwrap());
        assert!(!remove_file(&file).await.unwrap());

        let nested = dir.path().join("build_resources").join("AppDir");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(remove_dir_all(&dir.path().join("build_resources")).await.unwrap());
        assert!(!remove_dir_all(&dir.path().join("build_resources")).await.unwrap());
    }
}
