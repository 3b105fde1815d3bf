//! poetry-appimage - AppImage builder for Poetry projects.
//!
//! Renders the build resources for a Poetry project, exports its locked
//! dependencies and drives linuxdeploy to produce a portable AppImage.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match poetry_appimage::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
