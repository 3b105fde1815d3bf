//! Error types for the `build-appimage` command.
//!
//! Precondition failures (platform, configuration, lock state) are separate
//! variants so each maps to its own exit code and recovery hint.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, PluginError>;

/// Main error type for the command
#[derive(Error, Debug)]
pub enum PluginError {
    /// Host OS or processor is not supported by the packaging toolchain
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// pyproject.toml is missing required sections or keys
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// poetry.lock is missing or stale
    #[error("Lock state error: {0}")]
    LockState(#[from] LockStateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Build-layer errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Unsupported host
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The toolchain only runs on Linux
    #[error("unsupported operating system `{os}`, please run the command from a linux environment")]
    UnsupportedOs {
        /// Detected OS identifier
        os: String,
    },

    /// Only x86 and x86_64 Miniconda distributions are supported
    #[error("unsupported processor `{processor}`, currently only x86 and x86_64 are supported")]
    UnsupportedArch {
        /// Detected processor identifier
        processor: String,
    },
}

/// Missing or malformed project configuration
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// No pyproject.toml found
    #[error("no pyproject.toml found in {} or any parent directory", start.display())]
    ManifestNotFound {
        /// Directory the search started from
        start: PathBuf,
    },

    /// `[tool.<plugin>]` section absent
    #[error("section [tool.{section}] is not defined in pyproject.toml")]
    MissingSection {
        /// Section name under `tool`
        section: String,
    },

    /// Required key absent
    #[error("missing required key `{key}` in {table}")]
    MissingKey {
        /// Key name
        key: String,
        /// Table the key belongs to
        table: String,
    },

    /// A value has the wrong shape
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        /// Key name
        key: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Dependency lock problems
#[derive(Error, Debug)]
pub enum LockStateError {
    /// poetry.lock does not exist
    #[error("poetry.lock does not exist at {}", path.display())]
    Missing {
        /// Expected lock path
        path: PathBuf,
    },

    /// poetry.lock does not match pyproject.toml
    #[error("poetry.lock is not up to date with latest changes from pyproject.toml")]
    Stale {
        /// Output of the lock check, if any
        details: String,
    },
}

impl PluginError {
    /// Process exit code for this error.
    ///
    /// Each precondition class has a distinct code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Platform(_) => 1,
            Self::Configuration(_) => 2,
            Self::LockState(_) => 3,
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Platform(PlatformError::UnsupportedOs { .. }) => {
                vec!["Run the command from a Linux host or container".to_string()]
            }
            Self::Platform(PlatformError::UnsupportedArch { .. }) => {
                vec!["Build on an x86_64 or x86 machine".to_string()]
            }
            Self::Configuration(ConfigurationError::MissingSection { section }) => vec![format!(
                "Add a [tool.{section}] section with at least `categories = \"Utility;\"`"
            )],
            Self::Configuration(_) => {
                vec!["Check the [tool.poetry-plugin-appimage] section of pyproject.toml".to_string()]
            }
            Self::LockState(LockStateError::Missing { .. }) => {
                vec!["Run 'poetry lock' before attempting to build the AppImage".to_string()]
            }
            Self::LockState(LockStateError::Stale { .. }) => {
                vec!["Run 'poetry lock' or 'poetry update' before proceeding".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_have_distinct_exit_codes() {
        let platform: PluginError = PlatformError::UnsupportedOs { os: "macos".into() }.into();
        let config: PluginError = ConfigurationError::MissingSection {
            section: "poetry-plugin-appimage".into(),
        }
        .into();
        let lock: PluginError = LockStateError::Missing {
            path: PathBuf::from("poetry.lock"),
        }
        .into();

        let codes = [platform.exit_code(), config.exit_code(), lock.exit_code()];
        assert_eq!(codes, [1, 2, 3]);
    }

    #[test]
    fn stale_lock_suggests_relocking() {
        let err: PluginError = LockStateError::Stale {
            details: String::new(),
        }
        .into();
        assert!(err.recovery_suggestions()[0].contains("poetry lock"));
    }
}
