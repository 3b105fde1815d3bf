//! AppImage builder for Poetry-managed Python applications
//!
//! This library provides the pieces behind the `build-appimage` command:
//! - option and metadata resolution from `pyproject.toml` and the CLI
//! - rendering of the desktop entry, launch wrapper and build scripts
//! - orchestration of `poetry export` and the linuxdeploy packaging run
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{ConfigurationError, LockStateError, PlatformError, PluginError, Result};
