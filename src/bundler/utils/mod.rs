//! Filesystem and download helpers shared by the build steps.

pub mod fs;
pub mod http;
