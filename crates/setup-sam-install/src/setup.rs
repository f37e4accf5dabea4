//! Orchestrator: inputs in, one PATH entry out

use crate::github::{
    DEFAULT_API_URL, DEFAULT_SERVER_URL, DOWNLOAD_TIMEOUT, build_client, build_default_client,
    parse_base_url,
};
use crate::install::{
    EnvironmentBuild, GitHubReleaseIndex, HttpArchiveFetcher, InstallStrategy, LocalDirCache,
    NativeArchive, XshellEnv,
};
use setup_sam_core::{
    ActionInputs, PlatformContext, Reporter, Result, SetupError, SetupInputs, VersionConstraint,
};
use std::path::PathBuf;
use url::Url;

/// Endpoints and storage locations used by the native installer
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub github_api_url: Url,
    pub github_server_url: Url,
    /// Root of the local artifact cache
    pub cache_dir: PathBuf,
}

impl SetupOptions {
    /// Options pointing at github.com
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            github_api_url: parse_base_url(DEFAULT_API_URL)
                .map_err(|e| SetupError::Generic(e.to_string()))?,
            github_server_url: parse_base_url(DEFAULT_SERVER_URL)
                .map_err(|e| SetupError::Generic(e.to_string()))?,
            cache_dir: cache_dir.into(),
        })
    }
}

fn http_error(e: reqwest::Error) -> SetupError {
    SetupError::Generic(format!("Failed to build HTTP client: {}", e))
}

/// Picks the strategy selected by the `use-installer` switch
pub fn build_strategy(
    inputs: &SetupInputs,
    options: &SetupOptions,
) -> Result<Box<dyn InstallStrategy>> {
    if !inputs.use_installer {
        let env = XshellEnv::new()?;
        return Ok(Box::new(EnvironmentBuild::new(
            Box::new(env),
            inputs.python.clone(),
        )));
    }

    let index = GitHubReleaseIndex::new(
        build_default_client().map_err(http_error)?,
        options.github_api_url.clone(),
    );
    let fetcher = HttpArchiveFetcher::new(build_client(DOWNLOAD_TIMEOUT).map_err(http_error)?);
    let cache = LocalDirCache::new(options.cache_dir.clone());

    Ok(Box::new(NativeArchive::new(
        Box::new(index),
        Box::new(cache),
        Box::new(fetcher),
        options.github_server_url.clone(),
        inputs.token.clone(),
    )))
}

/// Runs `strategy` and publishes its result
///
/// A returned directory is made absolute and added to PATH exactly once.
/// `Ok(None)` publishes nothing.
pub fn install_with(
    strategy: &dyn InstallStrategy,
    constraint: &VersionConstraint,
    platform: &PlatformContext,
    reporter: &dyn Reporter,
) -> Result<Option<PathBuf>> {
    let Some(dir) = strategy.install(constraint, platform, reporter)? else {
        log::info!("Nothing was installed");
        return Ok(None);
    };

    let dir = std::path::absolute(&dir)?;
    reporter.add_path(&dir)?;
    reporter.info(&format!("SAM CLI installed to {}", dir.display()));
    Ok(Some(dir))
}

/// Validates `inputs`, installs the SAM CLI and publishes its directory
///
/// # Errors
///
/// Malformed inputs are rejected before any I/O. Fatal strategy errors are
/// returned as-is; recoverable ones yield `Ok(None)`.
pub fn run_setup(
    inputs: &ActionInputs,
    platform: &PlatformContext,
    options: &SetupOptions,
    reporter: &dyn Reporter,
) -> Result<Option<PathBuf>> {
    let inputs = inputs.validate(&platform.os)?;
    log::debug!(
        "version='{}' python='{}' use_installer={}",
        inputs.version,
        inputs.python,
        inputs.use_installer
    );

    let strategy = build_strategy(&inputs, options)?;
    install_with(strategy.as_ref(), &inputs.version, platform, reporter)
}
