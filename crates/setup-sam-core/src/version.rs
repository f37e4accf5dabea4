//! Version constraints and exact versions
//!
//! A [`VersionConstraint`] is what the user asked for. An [`ExactVersion`] is a
//! concrete `x.y.z` release and the only form allowed in cache keys and archive
//! URLs.

use crate::input::{VERSION_PATTERN, validate_input};
use crate::Result;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// Specifier used by the package installer when no version was requested
pub const DEFAULT_WILDCARD: &str = "1.*";

/// User-supplied version constraint: empty, wildcard or exact
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionConstraint(String);

impl VersionConstraint {
    /// Parses a raw `version` input
    ///
    /// # Errors
    ///
    /// Returns [`crate::SetupError::InputInvalid`] unless the input matches
    /// `^[\d.*]*$`.
    pub fn parse(raw: &str) -> Result<Self> {
        validate_input("version", raw, VERSION_PATTERN, "").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The constraint as an exact version, if it is one
    pub fn exact(&self) -> Option<ExactVersion> {
        ExactVersion::parse(&self.0)
    }

    /// Specifier for the package installer, which resolves wildcards itself
    pub fn or_default_wildcard(&self) -> &str {
        if self.0.is_empty() {
            DEFAULT_WILDCARD
        } else {
            &self.0
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A three-component numeric release identifier
///
/// The original text is kept for URLs and cache keys; ordering uses the
/// numeric components.
#[derive(Debug, Clone)]
pub struct ExactVersion {
    text: String,
    version: Version,
}

impl ExactVersion {
    /// Parses `major.minor.patch` (digits only, no prefix or suffix)
    pub fn parse(s: &str) -> Option<Self> {
        // Plain splitting instead of semver::Version::parse, which would also
        // accept pre-release and build suffixes
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }

        Some(Self {
            text: s.to_string(),
            version: Version::new(numbers[0], numbers[1], numbers[2]),
        })
    }

    /// Parses a release tag, dropping a single leading `v`
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::parse(tag.strip_prefix('v').unwrap_or(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn semver(&self) -> &Version {
        &self.version
    }
}

impl PartialEq for ExactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for ExactVersion {}

impl PartialOrd for ExactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl fmt::Display for ExactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
