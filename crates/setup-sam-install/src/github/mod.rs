//! Shared GitHub interaction utilities
//!
//! This module provides common functionality for interacting with GitHub:
//! - HTTP client construction with appropriate user-agent and timeouts
//! - Safe URL construction for the release index and release downloads

pub mod client;
pub mod url;

// Re-exports for convenient access
pub use client::{DEFAULT_TIMEOUT, DOWNLOAD_TIMEOUT, USER_AGENT, build_client, build_default_client};
pub use url::{
    DEFAULT_API_URL, DEFAULT_SERVER_URL, UrlError, add_path_segments, archive_url,
    latest_release_url, parse_base_url,
};
