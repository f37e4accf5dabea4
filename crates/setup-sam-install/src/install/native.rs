//! Native-archive strategy
//!
//! Installs a prebuilt Linux archive. The flow is:
//!
//! 1. Gate on OS and architecture
//! 2. Resolve an exact version (asking the release index when none was given)
//! 3. Enforce the per-architecture version floor
//! 4. Restore from cache, or download + extract + save
//!
//! When no exact version can be determined the unpinned "latest" archive is
//! installed into a scratch directory and the cache is bypassed entirely.

use crate::github::archive_url;
use crate::install::InstallStrategy;
use crate::install::cache::{
    CacheKey, CacheStore, INSTALL_DIR_NAME, try_evict, try_restore, try_save,
};
use crate::install::download::{ArchiveError, ArchiveFetcher};
use crate::install::platform::{
    InstallMode, NativeArch, check_arch_floor, check_platform, native_arch,
};
use crate::install::release::ReleaseIndex;
use setup_sam_core::{
    ExactVersion, PlatformContext, Reporter, Result, SetupError, VersionConstraint,
};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory inside an extracted archive holding the executable
pub const DIST_DIR: &str = "dist";

pub struct NativeArchive {
    index: Box<dyn ReleaseIndex>,
    cache: Box<dyn CacheStore>,
    fetcher: Box<dyn ArchiveFetcher>,
    server_url: Url,
    token: Option<String>,
}

impl NativeArchive {
    pub fn new(
        index: Box<dyn ReleaseIndex>,
        cache: Box<dyn CacheStore>,
        fetcher: Box<dyn ArchiveFetcher>,
        server_url: Url,
        token: Option<String>,
    ) -> Self {
        Self {
            index,
            cache,
            fetcher,
            server_url,
            token,
        }
    }

    /// Exact version to install, or `None` for the unpinned download
    fn resolve_version(
        &self,
        constraint: &VersionConstraint,
        reporter: &dyn Reporter,
    ) -> Result<Option<ExactVersion>> {
        if !constraint.is_empty() {
            return constraint
                .exact()
                .map(Some)
                .ok_or_else(|| SetupError::VersionNotExact(constraint.to_string()));
        }

        let Some(tag) = self.index.latest_tag(self.token.as_deref(), reporter) else {
            return Ok(None);
        };

        match ExactVersion::parse(&tag) {
            Some(version) => {
                reporter.info(&format!("Latest SAM CLI release is {}", version));
                Ok(Some(version))
            }
            None => {
                reporter.warning(&format!(
                    "Latest release tag '{}' is not a version, installing the latest archive",
                    tag
                ));
                Ok(None)
            }
        }
    }

    fn install_pinned(
        &self,
        platform: &PlatformContext,
        arch: NativeArch,
        version: &ExactVersion,
        reporter: &dyn Reporter,
    ) -> Result<Option<PathBuf>> {
        let key = CacheKey::new(&platform.os, arch, version);
        let install_dir = platform
            .home_dir
            .join(INSTALL_DIR_NAME)
            .join(key.as_str());
        log::debug!("Cache key {} -> {}", key, install_dir.display());

        if try_restore(self.cache.as_ref(), &key, &install_dir, reporter) {
            let dist = install_dir.join(DIST_DIR);
            if dist.is_dir() {
                reporter.info(&format!("Using cached SAM CLI {}", version));
                return Ok(Some(dist));
            }
            reporter.warning(&format!(
                "Cached entry {} has no {} directory, downloading again",
                key, DIST_DIR
            ));
            try_evict(self.cache.as_ref(), &key, reporter);
        }

        let url = archive_url(&self.server_url, Some(version), arch.token())
            .map_err(|e| SetupError::Generic(e.to_string()))?;

        if remove_stale(&install_dir).is_err() {
            reporter.warning(&format!(
                "Unable to clear {} before extraction",
                install_dir.display()
            ));
        }

        match self.fetch_into(&url, &install_dir, &platform.temp_dir) {
            Ok(dist) => {
                try_save(self.cache.as_ref(), &key, &install_dir, reporter);
                Ok(Some(dist))
            }
            Err(e) => {
                reporter.warning(&format!("Failed to install SAM CLI {}: {}", version, e));
                Ok(None)
            }
        }
    }

    fn install_latest(
        &self,
        platform: &PlatformContext,
        arch: NativeArch,
        reporter: &dyn Reporter,
    ) -> Result<Option<PathBuf>> {
        let url = archive_url(&self.server_url, None, arch.token())
            .map_err(|e| SetupError::Generic(e.to_string()))?;

        let scratch = tempfile::Builder::new()
            .prefix("setup-sam-")
            .tempdir_in(&platform.temp_dir)?;

        match self.fetch_into(&url, scratch.path(), &platform.temp_dir) {
            Ok(dist) => {
                // The binaries stay in use after this process exits
                let _ = scratch.keep();
                Ok(Some(dist))
            }
            Err(e) => {
                reporter.warning(&format!("Failed to install the latest SAM CLI: {}", e));
                Ok(None)
            }
        }
    }

    /// Downloads `url` under `temp_dir` and extracts it into `dir`, returning
    /// its `dist` directory
    fn fetch_into(
        &self,
        url: &Url,
        dir: &Path,
        temp_dir: &Path,
    ) -> std::result::Result<PathBuf, ArchiveError> {
        let archive = self.fetcher.download(url, temp_dir)?;
        self.fetcher.extract(&archive, dir)?;

        let dist = dir.join(DIST_DIR);
        if !dist.is_dir() {
            return Err(ArchiveError::MissingContent {
                expected: format!("{}/", DIST_DIR),
            });
        }

        Ok(dist)
    }
}

/// Removes leftovers from an earlier, interrupted install
fn remove_stale(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        log::debug!("Removing stale {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}

impl InstallStrategy for NativeArchive {
    fn install(
        &self,
        constraint: &VersionConstraint,
        platform: &PlatformContext,
        reporter: &dyn Reporter,
    ) -> Result<Option<PathBuf>> {
        check_platform(platform, InstallMode::NativeArchive)?;
        let arch = native_arch(platform)?;

        match self.resolve_version(constraint, reporter)? {
            Some(version) => {
                check_arch_floor(arch, &version)?;
                self.install_pinned(platform, arch, &version, reporter)
            }
            None => self.install_latest(platform, arch, reporter),
        }
    }
}
