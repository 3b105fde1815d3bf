//! Error types for the build layer.
//!
//! Every fallible step between metadata resolution and cleanup reports through
//! [`Error`]. Filesystem failures carry the action and path that failed so the
//! user can tell which generated file caused the problem.

use std::{fmt::Display, path::Path, path::PathBuf};
use thiserror::Error;

/// Result alias for build-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Build-layer error.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form failure message.
    #[error("{0}")]
    GenericError(String),

    /// Raw I/O failure without path context.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem failure with the action and path that triggered it.
    #[error("failed {context} `{path}`: {error}")]
    Fs {
        /// What was being done, e.g. "writing build resource"
        context: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// An external command could not be spawned.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Program name
        command: String,
        /// Spawn error
        #[source]
        error: std::io::Error,
    },

    /// Template registration or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Placeholder icon encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Download failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Attach filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wrap an I/O error with the action being performed and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Turn `None` or a foreign error into a [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Attach a message to the failure case.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_action() {
        let err: Result<()> = Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
            .fs_context("removing build resource", "build_resources/app.desktop");

        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("removing build resource"));
        assert!(msg.contains("build_resources/app.desktop"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("no bundle produced").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no bundle produced"));
    }
}
