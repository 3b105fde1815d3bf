//! Command line interface for poetry-appimage.
//!
//! Parses arguments, locates the project and dispatches to the command.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildAppimageArgs, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::error::Result;
use crate::metadata::find_project_root;
use anyhow::{Context, anyhow};
use path_absolutize::Absolutize;

/// Main CLI entry point, returns the process exit code
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate().map_err(|reason| anyhow!(reason))?;

    let config = RuntimeConfig::from(&args);

    let start = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("reading the current directory")?,
    };
    let start = start.absolutize()?.to_path_buf();
    let project_root = find_project_root(&start)?;
    log::debug!("Project root: {}", project_root.display());

    match &args.command {
        Command::BuildAppimage(build) => {
            let context = commands::CommandContext {
                project_root,
                poetry: args.poetry.clone(),
                config,
            };
            commands::build_appimage::execute(build, &context).await
        }
    }
}
