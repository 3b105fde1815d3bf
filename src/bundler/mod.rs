//! AppImage bundling for Poetry projects.
//!
//! The bundle is assembled in three stages:
//!
//! 1. [`settings`] merges CLI and `pyproject.toml` options into a
//!    [`PluginMetadata`] record.
//! 2. [`resources`] renders the catalog of templates and static files
//!    against that record.
//! 3. [`builder`] exports the locked requirements, runs the packaging
//!    script and cleans up afterwards.

pub mod builder;
pub mod error;
pub mod resources;
pub mod settings;
pub mod utils;

pub use builder::{BuildFailure, BuildOrchestrator, BuildOutcome, LockCheck, Poetry};
pub use error::{Error, Result};
pub use resources::{BUILD_RESOURCES, BuildResource, ResourceRenderer};
pub use settings::{Arch, BuildOptions, CliOverrides, PluginMetadata, ToolSection};
