//! SAM CLI installation
//!
//! - [`platform`]: OS/architecture gate and per-platform names
//! - [`release`]: latest-release lookup
//! - [`cache`]: keyed artifact cache
//! - [`download`]: archive download and extraction
//! - [`venv`]: the environment-build strategy
//! - [`native`]: the native-archive strategy

pub mod cache;
pub mod download;
pub mod native;
pub mod platform;
pub mod release;
pub mod venv;

use setup_sam_core::{PlatformContext, Reporter, Result, VersionConstraint};
use std::path::PathBuf;

pub use cache::{CacheKey, CacheStore, LocalDirCache};
pub use download::{ArchiveError, ArchiveFetcher, HttpArchiveFetcher};
pub use native::NativeArchive;
pub use platform::{InstallMode, NativeArch};
pub use release::{GitHubReleaseIndex, ReleaseIndex};
pub use venv::{EnvironmentBuild, PythonEnv, XshellEnv};

/// A way of getting the SAM CLI onto the machine
pub trait InstallStrategy {
    /// Installs a version satisfying `constraint`
    ///
    /// Returns the directory containing the executable, or `Ok(None)` when a
    /// recoverable failure left nothing installed (already reported as a
    /// warning).
    ///
    /// # Errors
    ///
    /// Returns an error for failures that must fail the run: unsupported
    /// platform, unusable version, missing interpreter, failed build step.
    fn install(
        &self,
        constraint: &VersionConstraint,
        platform: &PlatformContext,
        reporter: &dyn Reporter,
    ) -> Result<Option<PathBuf>>;
}
