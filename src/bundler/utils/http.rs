//! HTTP utilities for downloading build tools.

use crate::bundler::error::Result;

/// Downloads a file from a URL.
///
/// Returns the file contents as a byte vector. Non-success statuses are errors.
pub async fn download(url: &str) -> Result<Vec<u8>> {
    log::info!("Downloading {}", url);

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    Ok(bytes.to_vec())
}
