//! Archive download and extraction
//!
//! Downloads a prebuilt SAM CLI archive from the release host into a temporary
//! file and unpacks it into a target directory. It handles:
//!
//! - Streaming HTTP downloads
//! - Zip extraction with path validation (entries escaping the target are skipped)
//! - Unix permission bits stored in the archive (keeps `dist/sam` executable)

use reqwest::blocking::Client;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::TempPath;
use thiserror::Error;
use url::Url;

/// Archive download and extraction errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// HTTP error during download
    #[error("Failed to download {url}: {source}")]
    DownloadFailed {
        /// URL that failed
        url: Url,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Archive could not be unpacked
    #[error("Failed to extract {archive_type} archive: {reason}")]
    ExtractionFailed {
        archive_type: String,
        reason: String,
    },

    /// Archive unpacked but lacks the expected layout
    #[error("Archive does not contain {expected}")]
    MissingContent { expected: String },

    /// File system operation failed
    #[error("I/O error during {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },
}

/// Downloads and unpacks release archives
pub trait ArchiveFetcher {
    /// Downloads `url` to a temporary file in `temp_dir`, removed when the
    /// returned path drops
    fn download(&self, url: &Url, temp_dir: &Path) -> Result<TempPath, ArchiveError>;

    /// Unpacks the zip at `archive` into `dest`
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ArchiveError>;
}

/// Fetcher talking to the real release host
#[derive(Debug, Clone)]
pub struct HttpArchiveFetcher {
    client: Client,
}

impl HttpArchiveFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ArchiveFetcher for HttpArchiveFetcher {
    fn download(&self, url: &Url, temp_dir: &Path) -> Result<TempPath, ArchiveError> {
        download_to_temp(&self.client, url, temp_dir)
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
        extract_zip(archive, dest)
    }
}

/// Downloads an asset to a temporary file under `temp_dir`
fn download_to_temp(client: &Client, url: &Url, temp_dir: &Path) -> Result<TempPath, ArchiveError> {
    log::info!("Downloading {}", url);

    let mut response =
        client
            .get(url.as_str())
            .send()
            .map_err(|e| ArchiveError::DownloadFailed {
                url: url.clone(),
                source: e,
            })?;

    // Check status and convert to error without unwrap
    if let Err(err) = response.error_for_status_ref() {
        return Err(ArchiveError::DownloadFailed {
            url: url.clone(),
            source: err.without_url(),
        });
    }

    let mut temp_file = tempfile::Builder::new()
        .prefix("setup-sam-")
        .suffix(".zip")
        .tempfile_in(temp_dir)
        .map_err(|e| ArchiveError::IoError {
            operation: format!("create temporary file in {}", temp_dir.display()),
            source: e,
        })?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| ArchiveError::IoError {
                operation: "read from HTTP response".to_string(),
                source: e,
            })?;

        if bytes_read == 0 {
            break;
        }

        temp_file
            .write_all(&buffer[..bytes_read])
            .map_err(|e| ArchiveError::IoError {
                operation: "write to temporary file".to_string(),
                source: e,
            })?;

        downloaded += bytes_read as u64;
    }

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| ArchiveError::IoError {
            operation: "sync temporary file".to_string(),
            source: e,
        })?;

    log::debug!("Downloaded {} bytes from {}", downloaded, url);
    Ok(temp_file.into_temp_path())
}

/// Extracts a .zip archive
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<(), ArchiveError> {
    let file = fs::File::open(archive_path).map_err(|e| ArchiveError::IoError {
        operation: format!("open archive {}", archive_path.display()),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::ExtractionFailed {
        archive_type: "zip".to_string(),
        reason: e.to_string(),
    })?;

    fs::create_dir_all(dest_dir).map_err(|e| ArchiveError::IoError {
        operation: format!("create directory {}", dest_dir.display()),
        source: e,
    })?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ArchiveError::ExtractionFailed {
                archive_type: "zip".to_string(),
                reason: e.to_string(),
            })?;

        let outpath = match file.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                log::warn!("Skipping unsafe archive entry {}", file.name());
                continue;
            }
        };

        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| ArchiveError::IoError {
                operation: format!("create directory {}", outpath.display()),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::IoError {
                operation: format!("create parent directory {}", parent.display()),
                source: e,
            })?;
        }

        let mut outfile = fs::File::create(&outpath).map_err(|e| ArchiveError::IoError {
            operation: format!("create file {}", outpath.display()),
            source: e,
        })?;

        io::copy(&mut file, &mut outfile).map_err(|e| ArchiveError::IoError {
            operation: format!("extract file {}", outpath.display()),
            source: e,
        })?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            set_permissions(&outpath, mode)?;
        }
    }

    Ok(())
}

/// Applies the permission bits recorded in the archive
#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> Result<(), ArchiveError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777)).map_err(|e| {
        ArchiveError::IoError {
            operation: format!("set permissions for {}", path.display()),
            source: e,
        }
    })
}
