//! Host description injected into every component
//!
//! Nothing outside [`PlatformContext::detect`] reads the process environment
//! for OS, architecture or directory information, so every install path can be
//! exercised with a hand-built context in tests.

use crate::{Result, SetupError};
use std::fmt;
use std::path::PathBuf;

/// Operating system family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    Other(String),
}

/// CPU architecture family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
    Other(String),
}

impl Os {
    /// Maps an OS identifier (Rust target names and runner names both accepted)
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "linux" => Os::Linux,
            "darwin" | "macos" => Os::Darwin,
            "windows" | "win32" => Os::Windows,
            other => Os::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
            Os::Other(id) => id,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }
}

impl Arch {
    /// Maps an architecture identifier (`x64`, `x86_64`, `amd64`, `arm64`, `aarch64`)
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "x64" | "x86_64" | "amd64" => Arch::X64,
            "arm64" | "aarch64" => Arch::Arm64,
            other => Arch::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Other(id) => id,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the execution environment
#[derive(Debug, Clone)]
pub struct PlatformContext {
    pub os: Os,
    pub arch: Arch,
    /// Scratch space for fresh per-run directories
    pub temp_dir: PathBuf,
    /// Home of the current user; native installs live below it
    pub home_dir: PathBuf,
}

impl PlatformContext {
    /// Reads the current process environment
    ///
    /// The temporary directory honours `RUNNER_TEMP` (set on hosted CI runners)
    /// and falls back to the OS temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn detect() -> Result<Self> {
        let temp_dir = std::env::var_os("RUNNER_TEMP")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let home_dir = dirs::home_dir().ok_or_else(|| {
            SetupError::Generic("Could not determine home directory".to_string())
        })?;

        let context = Self {
            os: Os::from_identifier(std::env::consts::OS),
            arch: Arch::from_identifier(std::env::consts::ARCH),
            temp_dir,
            home_dir,
        };
        log::debug!("Detected platform: {} {}", context.os, context.arch);

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_from_identifier() {
        assert_eq!(Os::from_identifier("linux"), Os::Linux);
        assert_eq!(Os::from_identifier("macos"), Os::Darwin);
        assert_eq!(Os::from_identifier("darwin"), Os::Darwin);
        assert_eq!(Os::from_identifier("win32"), Os::Windows);
        assert_eq!(Os::from_identifier("windows"), Os::Windows);
        assert_eq!(
            Os::from_identifier("freebsd"),
            Os::Other("freebsd".to_string())
        );
    }

    #[test]
    fn test_arch_from_identifier() {
        assert_eq!(Arch::from_identifier("x64"), Arch::X64);
        assert_eq!(Arch::from_identifier("x86_64"), Arch::X64);
        assert_eq!(Arch::from_identifier("aarch64"), Arch::Arm64);
        assert_eq!(Arch::from_identifier("arm64"), Arch::Arm64);
        assert_eq!(Arch::from_identifier("s390x"), Arch::Other("s390x".to_string()));
    }

    #[test]
    fn test_display_uses_identifiers() {
        assert_eq!(Os::Linux.to_string(), "linux");
        assert_eq!(Arch::Other("ppc64".to_string()).to_string(), "ppc64");
    }

    #[test]
    fn test_detect_succeeds() {
        let context = PlatformContext::detect().unwrap();
        assert!(context.temp_dir.is_absolute());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_detect_linux() {
        assert_eq!(PlatformContext::detect().unwrap().os, Os::Linux);
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_detect_x86_64() {
        assert_eq!(PlatformContext::detect().unwrap().arch, Arch::X64);
    }
}
