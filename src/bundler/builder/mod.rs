//! Build orchestration and the external tools it drives.
//!
//! - `poetry` - lock freshness check and requirements export
//! - `toolchain` - linuxdeploy acquisition
//! - `orchestrator` - export, packaging script, cleanup
//! - `checksum` - SHA-256 of the finished bundle

mod checksum;
mod orchestrator;
mod poetry;
mod toolchain;

pub use checksum::calculate_sha256;
pub use orchestrator::{BuildFailure, BuildOrchestrator, BuildOutcome, DIST_DIR};
pub use poetry::{LockCheck, Poetry};
pub use toolchain::{LINUXDEPLOY_ENV, linuxdeploy};
