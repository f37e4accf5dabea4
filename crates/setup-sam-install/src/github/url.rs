//! URL construction helpers for GitHub resources

use setup_sam_core::ExactVersion;
use thiserror::Error;
use url::Url;

/// Default web host serving release downloads
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Default REST API host
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository publishing the SAM CLI releases
pub const REPO_OWNER: &str = "aws";
pub const REPO_NAME: &str = "aws-sam-cli";

/// Parses a configured base URL
pub fn parse_base_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase { url });
    }
    Ok(url)
}

/// Appends path segments to a URL, keeping any existing path prefix
///
/// Segments are percent-encoded, so a segment can never introduce `/` or `..`.
///
/// # Errors
///
/// Returns error if URL cannot be a base
pub fn add_path_segments(url: &mut Url, segments: &[&str]) -> Result<(), UrlError> {
    // Clone URL before mutable borrow to avoid borrow checker error
    let url_for_error = url.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: url_for_error })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// `<api>/repos/aws/aws-sam-cli/releases/latest`
pub fn latest_release_url(api_base: &Url) -> Result<Url, UrlError> {
    let mut url = api_base.clone();
    add_path_segments(&mut url, &["repos", REPO_OWNER, REPO_NAME, "releases", "latest"])?;
    Ok(url)
}

/// Archive file name for a linux architecture token
pub fn archive_name(arch: &str) -> String {
    format!("{REPO_NAME}-linux-{arch}.zip")
}

/// Download URL of the prebuilt archive
///
/// `Some(version)` yields `.../releases/download/v<version>/<archive>`;
/// `None` yields the unpinned `.../releases/latest/download/<archive>`.
pub fn archive_url(
    server_base: &Url,
    version: Option<&ExactVersion>,
    arch: &str,
) -> Result<Url, UrlError> {
    let mut url = server_base.clone();
    let file = archive_name(arch);

    match version {
        Some(version) => {
            let tag = format!("v{}", version);
            add_path_segments(
                &mut url,
                &[REPO_OWNER, REPO_NAME, "releases", "download", tag.as_str(), file.as_str()],
            )?;
        }
        None => {
            add_path_segments(
                &mut url,
                &[REPO_OWNER, REPO_NAME, "releases", "latest", "download", file.as_str()],
            )?;
        }
    }

    Ok(url)
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL cannot be used as a base
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The problematic URL
        url: Url,
    },

    /// Invalid URL parse error
    #[error("Invalid URL: {0}")]
    ParseError(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Url {
        parse_base_url(DEFAULT_SERVER_URL).unwrap()
    }

    #[test]
    fn test_latest_release_url() {
        let api = parse_base_url(DEFAULT_API_URL).unwrap();
        assert_eq!(
            latest_release_url(&api).unwrap().as_str(),
            "https://api.github.com/repos/aws/aws-sam-cli/releases/latest"
        );
    }

    #[test]
    fn test_latest_release_url_keeps_enterprise_prefix() {
        let api = parse_base_url("https://ghe.example.com/api/v3").unwrap();
        assert_eq!(
            latest_release_url(&api).unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/aws/aws-sam-cli/releases/latest"
        );

        let api = parse_base_url("https://ghe.example.com/api/v3/").unwrap();
        assert_eq!(
            latest_release_url(&api).unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/aws/aws-sam-cli/releases/latest"
        );
    }

    #[test]
    fn test_archive_url_pinned() {
        let version = ExactVersion::parse("1.139.0").unwrap();
        assert_eq!(
            archive_url(&server(), Some(&version), "x86_64")
                .unwrap()
                .as_str(),
            "https://github.com/aws/aws-sam-cli/releases/download/v1.139.0/aws-sam-cli-linux-x86_64.zip"
        );
    }

    #[test]
    fn test_archive_url_latest() {
        assert_eq!(
            archive_url(&server(), None, "arm64").unwrap().as_str(),
            "https://github.com/aws/aws-sam-cli/releases/latest/download/aws-sam-cli-linux-arm64.zip"
        );
    }

    #[test]
    fn test_add_path_segments_prevents_injection() {
        let mut url = server();
        add_path_segments(&mut url, &["aws", "../../../etc/passwd"]).unwrap();
        // The ../ should be URL-encoded, preventing path traversal
        assert!(url.as_str().contains("..%2F"));
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        assert!(parse_base_url("mailto:someone@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
