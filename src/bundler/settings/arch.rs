//! CPU architecture types and utilities.

use crate::error::PlatformError;

/// CPU architecture of the bundle.
///
/// Miniconda publishes Linux installers for these two x86 variants only,
/// so the processor identifier of the build host must map onto one of them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    X86_64,
    /// x86 / i386 (32-bit)
    X86,
}

impl Arch {
    /// Map a processor identifier (as reported by `uname -m` or
    /// `std::env::consts::ARCH`) onto a supported architecture.
    pub fn from_processor(processor: &str) -> Result<Self, PlatformError> {
        match processor.trim() {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "i386" | "i686" | "x86" => Ok(Self::X86),
            other => Err(PlatformError::UnsupportedArch {
                processor: other.to_string(),
            }),
        }
    }

    /// Architecture of the running host, as reported by `uname -m`.
    ///
    /// Falls back to the architecture this binary was compiled for when
    /// `uname` is unavailable.
    pub async fn detect() -> Result<Self, PlatformError> {
        let processor = match tokio::process::Command::new("uname").arg("-m").output().await {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => {
                log::debug!("uname -m failed, using compile-time architecture");
                std::env::consts::ARCH.to_string()
            }
        };
        log::debug!("Host processor: {}", processor);
        Self::from_processor(&processor)
    }

    /// Suffix used in Miniconda installer names (`Linux-x86_64`, `Linux-x86`).
    pub fn miniconda_name(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "x86",
        }
    }

    /// Name linuxdeploy uses for its release assets and `ARCH` variable.
    pub fn linuxdeploy_name(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "i386",
        }
    }
}

/// Fail unless `os` (a `std::env::consts::OS` value) is Linux.
///
/// linuxdeploy and the Miniconda installers only run there.
pub fn check_host_os(os: &str) -> Result<(), PlatformError> {
    if os == "linux" {
        Ok(())
    } else {
        Err(PlatformError::UnsupportedOs { os: os.to_string() })
    }
}
