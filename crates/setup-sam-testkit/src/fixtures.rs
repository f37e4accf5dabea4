//! In-memory fixtures shaped like the real release artifacts

use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Builds a zip laid out like a SAM CLI release archive
///
/// Contains `dist/sam` (mode 0755, a shell script printing `version`) and a
/// nested support file, plus a top-level `install` script.
pub fn sam_archive(version: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let exec = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    let plain = SimpleFileOptions::default().unix_permissions(0o644);

    zip.add_directory("dist/", exec).unwrap();
    zip.start_file("dist/sam", exec).unwrap();
    write!(zip, "#!/bin/sh\necho 'SAM CLI, version {version}'\n").unwrap();

    zip.add_directory("dist/_internal/", exec).unwrap();
    zip.start_file("dist/_internal/base_library.zip", plain)
        .unwrap();
    zip.write_all(b"not really a library").unwrap();

    zip.start_file("install", exec).unwrap();
    zip.write_all(b"#!/bin/sh\nexit 0\n").unwrap();

    zip.finish().unwrap().into_inner()
}

/// Builds a zip that extracts fine but has no `dist/` directory
pub fn sam_archive_without_dist() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("README.md", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"# nothing to see\n").unwrap();
    zip.finish().unwrap().into_inner()
}

/// JSON body of a "latest release" response
pub fn release_json(tag: &str) -> String {
    format!(
        r#"{{
  "tag_name": "{tag}",
  "name": "SAM CLI {tag}",
  "draft": false,
  "prerelease": false,
  "assets": []
}}"#
    )
}
