//! Keyed artifact cache
//!
//! Native installs are cached per (os, arch, version). The store is additive:
//! entries are never pruned, and the bytes behind a key never change, so two
//! jobs racing on the same key can at worst both download it. The one removal
//! is [`CacheStore::evict`], used when a restored entry turns out incomplete.

use crate::install::platform::NativeArch;
use setup_sam_core::{ExactVersion, Os, Reporter};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory under the home directory holding native installs
pub const INSTALL_DIR_NAME: &str = ".setup-sam";

/// Cache key `sam-cli-<os>-<arch>-<version>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(os: &Os, arch: NativeArch, version: &ExactVersion) -> Self {
        Self(format!("sam-cli-{}-{}-{}", os, arch.token(), version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("cache walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Key -> directory tree store
pub trait CacheStore {
    /// Materializes the entry for `key` at `dir`; `Ok(false)` on a miss
    fn restore(&self, key: &CacheKey, dir: &Path) -> Result<bool, CacheError>;

    /// Stores the tree at `dir` under `key`
    fn save(&self, key: &CacheKey, dir: &Path) -> Result<(), CacheError>;

    /// Drops the entry for `key` so the next save replaces it
    fn evict(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// Cache store backed by a local directory, one sub-directory per key
#[derive(Debug, Clone)]
pub struct LocalDirCache {
    root: PathBuf,
}

impl LocalDirCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

impl CacheStore for LocalDirCache {
    fn restore(&self, key: &CacheKey, dir: &Path) -> Result<bool, CacheError> {
        let entry = self.entry_path(key);
        if !entry.is_dir() {
            log::debug!("Cache miss for {} ({})", key, entry.display());
            return Ok(false);
        }

        log::debug!("Restoring {} from {}", key, entry.display());
        copy_tree(&entry, dir)?;
        Ok(true)
    }

    fn save(&self, key: &CacheKey, dir: &Path) -> Result<(), CacheError> {
        let entry = self.entry_path(key);
        if entry.exists() {
            log::debug!("Cache entry {} already present", key);
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|e| CacheError::Io {
            operation: format!("create cache root {}", self.root.display()),
            source: e,
        })?;

        // Stage next to the final entry (same filesystem) so the rename is atomic
        let staging = tempfile::Builder::new()
            .prefix(".incoming-")
            .tempdir_in(&self.root)
            .map_err(|e| CacheError::Io {
                operation: format!("create staging directory in {}", self.root.display()),
                source: e,
            })?;

        copy_tree(dir, staging.path())?;

        match fs::rename(staging.path(), &entry) {
            Ok(()) => {
                // Renamed away; nothing left for the guard to delete
                let _ = staging.keep();
                log::debug!("Saved {} to {}", key, entry.display());
                Ok(())
            }
            // Another writer got there first
            Err(_) if entry.exists() => Ok(()),
            Err(e) => Err(CacheError::Io {
                operation: format!("move staged entry to {}", entry.display()),
                source: e,
            }),
        }
    }

    fn evict(&self, key: &CacheKey) -> Result<(), CacheError> {
        let entry = self.entry_path(key);
        match fs::remove_dir_all(&entry) {
            Ok(()) => {
                log::debug!("Evicted {} ({})", key, entry.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                operation: format!("remove cache entry {}", entry.display()),
                source: e,
            }),
        }
    }
}

/// Restores `key` into `dir`, demoting any error to a warning and a miss
pub fn try_restore(
    cache: &dyn CacheStore,
    key: &CacheKey,
    dir: &Path,
    reporter: &dyn Reporter,
) -> bool {
    match cache.restore(key, dir) {
        Ok(hit) => hit,
        Err(e) => {
            reporter.warning(&format!("Failed to restore {} from cache: {}", key, e));
            false
        }
    }
}

/// Saves `dir` under `key`, demoting any error to a warning
pub fn try_save(cache: &dyn CacheStore, key: &CacheKey, dir: &Path, reporter: &dyn Reporter) {
    if let Err(e) = cache.save(key, dir) {
        reporter.warning(&format!("Failed to save {} to cache: {}", key, e));
    }
}

/// Evicts `key`, demoting any error to a warning
pub fn try_evict(cache: &dyn CacheStore, key: &CacheKey, reporter: &dyn Reporter) {
    if let Err(e) = cache.evict(key) {
        reporter.warning(&format!("Failed to evict {} from cache: {}", key, e));
    }
}

/// Recursively copies `src` into `dst`, keeping permissions and symlinks
fn copy_tree(src: &Path, dst: &Path) -> Result<(), CacheError> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| CacheError::Io {
                operation: format!("relativize {}", entry.path().display()),
                source: io::Error::other(e),
            })?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        let result = if file_type.is_dir() {
            fs::create_dir_all(&target)
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)
        } else {
            fs::copy(entry.path(), &target).map(|_| ())
        };

        result.map_err(|e| CacheError::Io {
            operation: format!("copy {} to {}", entry.path().display(), target.display()),
            source: e,
        })?;
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
