//! Remote release index
//!
//! Asks the GitHub REST API for the latest SAM CLI release tag. Failures here
//! are never fatal: they are reported as warnings and the caller falls back to
//! the unpinned "latest" download.

use crate::github::{build_default_client, latest_release_url};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use setup_sam_core::Reporter;
use url::Url;

/// GitHub Release metadata from API (only the fields we read)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "v1.139.0")
    pub tag_name: String,
}

/// Source of the latest published version
pub trait ReleaseIndex {
    /// Latest release tag with a leading `v` removed, or `None` if unavailable
    ///
    /// The returned string is not guaranteed to be an exact version.
    fn latest_tag(&self, token: Option<&str>, reporter: &dyn Reporter) -> Option<String>;
}

/// Release index backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubReleaseIndex {
    client: Client,
    api_base: Url,
}

impl GitHubReleaseIndex {
    pub fn new(client: Client, api_base: Url) -> Self {
        Self { client, api_base }
    }

    /// Index using a client with the default timeout
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails
    pub fn with_default_client(api_base: Url) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_default_client()?, api_base))
    }

    fn fetch(&self, token: Option<&str>) -> Result<Release, String> {
        let url = latest_release_url(&self.api_base).map_err(|e| e.to_string())?;
        log::debug!("Fetching latest release from {}", url);

        let mut request = self
            .client
            .get(url.as_str())
            .header(ACCEPT, "application/vnd.github+json");

        // Only authenticate when a token was actually supplied
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().map_err(|e| e.without_url().to_string())?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("unexpected status {} from {}", status, url));
        }

        response
            .json::<Release>()
            .map_err(|e| format!("invalid release metadata: {}", e.without_url()))
    }
}

impl ReleaseIndex for GitHubReleaseIndex {
    fn latest_tag(&self, token: Option<&str>, reporter: &dyn Reporter) -> Option<String> {
        match self.fetch(token) {
            Ok(release) => {
                let tag = release.tag_name;
                Some(tag.strip_prefix('v').unwrap_or(&tag).to_string())
            }
            Err(reason) => {
                reporter.warning(&format!(
                    "Unable to fetch the latest SAM CLI release: {}",
                    reason
                ));
                None
            }
        }
    }
}
