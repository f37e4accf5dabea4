//! mockito helpers for the release index and archive store
//!
//! Each test owns its own `mockito::Server`; the helpers only register the
//! endpoints at the paths the real hosts use.

use mockito::{Mock, ServerGuard};

/// Path of the "latest release" endpoint on the API host
pub const LATEST_RELEASE_PATH: &str = "/repos/aws/aws-sam-cli/releases/latest";

/// Archive path on the release host
///
/// `version` of `None` yields the unpinned `latest/download` variant.
pub fn archive_path(version: Option<&str>, arch: &str) -> String {
    match version {
        Some(version) => format!(
            "/aws/aws-sam-cli/releases/download/v{version}/aws-sam-cli-linux-{arch}.zip"
        ),
        None => format!("/aws/aws-sam-cli/releases/latest/download/aws-sam-cli-linux-{arch}.zip"),
    }
}

/// Serves `tag` from the latest-release endpoint
pub fn mock_latest_release(server: &mut ServerGuard, tag: &str) -> Mock {
    server
        .mock("GET", LATEST_RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(crate::fixtures::release_json(tag))
        .create()
}

/// Serves `body` as the archive for `version` and `arch`
pub fn mock_archive(
    server: &mut ServerGuard,
    version: Option<&str>,
    arch: &str,
    body: &[u8],
) -> Mock {
    server
        .mock("GET", archive_path(version, arch).as_str())
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(body)
        .create()
}
