//! Command execution functions.

pub mod build_appimage;

use super::RuntimeConfig;
use std::path::PathBuf;

/// Shared state handed to every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory containing pyproject.toml
    pub project_root: PathBuf,
    /// Explicit poetry executable, `None` searches PATH
    pub poetry: Option<PathBuf>,
    pub config: RuntimeConfig,
}
