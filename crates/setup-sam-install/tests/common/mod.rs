//! Recording fakes for the install seams
//!
//! Every fake shares one [`Journal`], so a test can keep a handle to it after
//! the fakes have been boxed into a strategy.

#![allow(dead_code)]

use setup_sam_core::{Arch, Os, PlatformContext, Result, SetupError};
use setup_sam_install::install::cache::{CacheError, CacheKey, CacheStore};
use setup_sam_install::install::download::{ArchiveError, ArchiveFetcher};
use setup_sam_install::install::release::ReleaseIndex;
use setup_sam_install::install::venv::PythonEnv;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::{TempDir, TempPath};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LatestTag(Option<String>),
    Restore(String, PathBuf),
    Save(String, PathBuf),
    Evict(String),
    Download(Url),
    Extract(PathBuf),
    Which(String),
    Run(PathBuf, Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<Url> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Download(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn extracts(&self) -> usize {
        self.count(|c| matches!(c, Call::Extract(_)))
    }

    pub fn restores(&self) -> usize {
        self.count(|c| matches!(c, Call::Restore(..)))
    }

    pub fn saves(&self) -> usize {
        self.count(|c| matches!(c, Call::Save(..)))
    }

    pub fn evictions(&self) -> usize {
        self.count(|c| matches!(c, Call::Evict(_)))
    }

    pub fn index_queries(&self) -> usize {
        self.count(|c| matches!(c, Call::LatestTag(_)))
    }

    /// Argument lists passed to `run`, in order
    pub fn runs(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Run(_, args) => Some(args),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }
}

/// Writes the minimal layout of an installed archive into `dir`
pub fn write_dist(dir: &Path) {
    fs::create_dir_all(dir.join("dist")).unwrap();
    fs::write(dir.join("dist").join("sam"), "#!/bin/sh\n").unwrap();
}

// ============================================================================
// Release index
// ============================================================================

pub struct FakeIndex {
    pub journal: Journal,
    pub tag: Option<String>,
}

impl ReleaseIndex for FakeIndex {
    fn latest_tag(
        &self,
        token: Option<&str>,
        reporter: &dyn setup_sam_core::Reporter,
    ) -> Option<String> {
        self.journal
            .record(Call::LatestTag(token.map(str::to_string)));
        if self.tag.is_none() {
            reporter.warning("release index unavailable");
        }
        self.tag.clone()
    }
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBehavior {
    Miss,
    Hit,
    /// Reports a hit but materializes nothing
    HitWithoutDist,
    Broken,
}

pub struct FakeCache {
    pub journal: Journal,
    pub behavior: CacheBehavior,
}

impl CacheStore for FakeCache {
    fn restore(&self, key: &CacheKey, dir: &Path) -> std::result::Result<bool, CacheError> {
        self.journal
            .record(Call::Restore(key.to_string(), dir.to_path_buf()));
        match self.behavior {
            CacheBehavior::Miss => Ok(false),
            CacheBehavior::Hit => {
                write_dist(dir);
                Ok(true)
            }
            CacheBehavior::HitWithoutDist => {
                fs::create_dir_all(dir).unwrap();
                Ok(true)
            }
            CacheBehavior::Broken => Err(CacheError::Io {
                operation: "restore".to_string(),
                source: io::Error::other("cache service unavailable"),
            }),
        }
    }

    fn save(&self, key: &CacheKey, dir: &Path) -> std::result::Result<(), CacheError> {
        self.journal
            .record(Call::Save(key.to_string(), dir.to_path_buf()));
        match self.behavior {
            CacheBehavior::Broken => Err(CacheError::Io {
                operation: "save".to_string(),
                source: io::Error::other("cache service unavailable"),
            }),
            _ => Ok(()),
        }
    }

    fn evict(&self, key: &CacheKey) -> std::result::Result<(), CacheError> {
        self.journal.record(Call::Evict(key.to_string()));
        Ok(())
    }
}

// ============================================================================
// Archive fetcher
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBehavior {
    Ok,
    /// Extracts fine but produces no `dist/`
    NoDist,
    FailDownload,
    FailExtract,
}

pub struct FakeFetcher {
    pub journal: Journal,
    pub behavior: FetchBehavior,
}

impl ArchiveFetcher for FakeFetcher {
    fn download(&self, url: &Url, temp_dir: &Path) -> std::result::Result<TempPath, ArchiveError> {
        self.journal.record(Call::Download(url.clone()));
        if self.behavior == FetchBehavior::FailDownload {
            return Err(ArchiveError::IoError {
                operation: format!("download {}", url),
                source: io::Error::other("connection reset"),
            });
        }

        let file = tempfile::NamedTempFile::new_in(temp_dir).unwrap();
        Ok(file.into_temp_path())
    }

    fn extract(&self, _archive: &Path, dest: &Path) -> std::result::Result<(), ArchiveError> {
        self.journal.record(Call::Extract(dest.to_path_buf()));
        match self.behavior {
            FetchBehavior::Ok => write_dist(dest),
            FetchBehavior::NoDist => fs::create_dir_all(dest).unwrap(),
            FetchBehavior::FailExtract => {
                return Err(ArchiveError::ExtractionFailed {
                    archive_type: "zip".to_string(),
                    reason: "invalid Zip archive".to_string(),
                });
            }
            FetchBehavior::FailDownload => unreachable!("download already failed"),
        }
        Ok(())
    }
}

// ============================================================================
// Python
// ============================================================================

pub struct FakePython {
    pub journal: Journal,
    /// Interpreter names that resolve, and where to
    pub installed: Vec<(String, PathBuf)>,
    /// A run whose arguments contain this string fails
    pub fail_on: Option<String>,
    /// Whether the package install leaves `sam` in the venv
    pub provides_sam: bool,
}

/// Executables a real `pip install aws-sam-cli` leaves next to the venv python
const SAM_EXECUTABLES: [&str; 2] = ["sam", "sam.exe"];

impl PythonEnv for FakePython {
    fn which(&self, program: &str) -> Result<PathBuf> {
        self.journal.record(Call::Which(program.to_string()));
        self.installed
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, path)| path.clone())
            .ok_or_else(|| SetupError::InterpreterNotFound(program.to_string()))
    }

    fn run(&self, program: &Path, args: &[String]) -> Result<()> {
        self.journal
            .record(Call::Run(program.to_path_buf(), args.to_vec()));
        match &self.fail_on {
            Some(needle) if args.iter().any(|a| a == needle) => {
                return Err(SetupError::CommandFailed {
                    command: format!("{} {}", program.display(), args.join(" ")),
                    reason: "exit status: 1".to_string(),
                });
            }
            _ => {}
        }

        if self.provides_sam && args.iter().any(|a| a.starts_with("aws-sam-cli==")) {
            let bin_dir = program.parent().unwrap();
            fs::create_dir_all(bin_dir).unwrap();
            for name in SAM_EXECUTABLES {
                fs::write(bin_dir.join(name), "#!/bin/sh\n").unwrap();
            }
        }
        Ok(())
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Hand-built context rooted in a fresh temp directory
pub struct TestPlatform {
    pub context: PlatformContext,
    _root: TempDir,
}

impl TestPlatform {
    pub fn new(os: Os, arch: Arch) -> Self {
        let root = setup_sam_testkit::temp_dir_in_workspace();
        let temp_dir = root.path().join("runner-temp");
        let home_dir = root.path().join("home");
        fs::create_dir_all(&temp_dir).unwrap();
        fs::create_dir_all(&home_dir).unwrap();

        Self {
            context: PlatformContext {
                os,
                arch,
                temp_dir,
                home_dir,
            },
            _root: root,
        }
    }

    pub fn linux_x64() -> Self {
        Self::new(Os::Linux, Arch::X64)
    }

    pub fn linux_arm64() -> Self {
        Self::new(Os::Linux, Arch::Arm64)
    }
}
