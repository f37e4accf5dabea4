//! SAM CLI acquisition for setup-sam.
//!
//! This crate decides which SAM CLI release to install, obtains it, and hands
//! back a single directory to put on PATH.
//!
//! # Architecture
//!
//! - [`github`]: HTTP client and URL construction for the release index and store
//! - [`install`]: the platform gate, cache, archive handling and both strategies
//! - [`setup`]: input validation, strategy selection and PATH publication
//!
//! # Install Flow
//!
//! ```text
//! run_setup()
//!     ↓
//! validate inputs (no I/O before this succeeds)
//!     ↓
//! use-installer?
//!     ├─ no  → EnvironmentBuild
//!     │        → python -m venv, pip install aws-sam-cli==<constraint or 1.*>
//!     │        → <workdir>/bin (a link to the venv's sam only)
//!     └─ yes → NativeArchive
//!              → gate linux + x86_64/arm64
//!              → exact version (release index when empty)
//!              → cache restore, else download + extract + cache save
//!              → <home>/.setup-sam/<key>/dist
//!     ↓
//! add_path(dir) exactly once
//! ```
//!
//! # Example
//!
//! ```no_run
//! use setup_sam_core::{ActionInputs, ActionsReporter, PlatformContext};
//! use setup_sam_install::{SetupOptions, run_setup};
//!
//! # fn main() -> setup_sam_core::Result<()> {
//! let inputs = ActionInputs {
//!     version: "1.139.0".to_string(),
//!     use_installer: "true".to_string(),
//!     ..Default::default()
//! };
//! let platform = PlatformContext::detect()?;
//! let options = SetupOptions::with_cache_dir("/var/cache/setup-sam")?;
//! let reporter = ActionsReporter::new(None);
//!
//! if let Some(dir) = run_setup(&inputs, &platform, &options, &reporter)? {
//!     println!("sam is in {}", dir.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod install;
pub mod setup;

// Re-export commonly used types
pub use install::{EnvironmentBuild, InstallStrategy, NativeArchive};
pub use setup::{SetupOptions, build_strategy, install_with, run_setup};
