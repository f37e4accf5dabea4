//! Action input validation
//!
//! Raw inputs arrive as strings (empty meaning "not set"). Each one is
//! defaulted and checked against its grammar before any I/O happens.

use crate::platform::Os;
use crate::version::VersionConstraint;
use crate::{Result, SetupError};
use regex::{Regex, RegexBuilder};

/// Grammar of the `version` input
pub const VERSION_PATTERN: &str = r"^[\d.*]*$";

/// Grammar of the `python` input
pub const PYTHON_PATTERN: &str = r"^.+$";

/// Returns `raw`, or `default` when `raw` is empty, checked against `pattern`
///
/// # Errors
///
/// Returns [`SetupError::InputInvalid`] naming the input and the grammar when the
/// value does not match.
pub fn validate_input(name: &str, raw: &str, pattern: &str, default: &str) -> Result<String> {
    let value = if raw.is_empty() { default } else { raw };

    // Grammars are ASCII; `\d` must not accept digits from other scripts.
    // Patterns that could match invalid UTF-8 without Unicode (`.`) keep it.
    let grammar = RegexBuilder::new(pattern)
        .unicode(false)
        .build()
        .or_else(|_| Regex::new(pattern))
        .map_err(|e| SetupError::Generic(format!("Invalid pattern for {}: {}", name, e)))?;

    if !grammar.is_match(value) {
        return Err(SetupError::InputInvalid {
            name: name.to_string(),
            pattern: pattern.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Parses a boolean input using the runner's accepted spellings
///
/// An empty value yields `default`.
pub fn parse_bool_input(name: &str, raw: &str, default: bool) -> Result<bool> {
    match raw {
        "" => Ok(default),
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(SetupError::InputNotBoolean {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Interpreter used when the `python` input is empty
///
/// `python3` is not a standard command name on Windows.
pub fn default_python(os: &Os) -> &'static str {
    if os.is_windows() { "python" } else { "python3" }
}

/// Raw, unvalidated action inputs
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub version: String,
    pub python: String,
    pub use_installer: String,
    pub token: String,
}

/// Validated action inputs
#[derive(Debug, Clone)]
pub struct SetupInputs {
    pub version: VersionConstraint,
    pub python: String,
    pub use_installer: bool,
    /// `None` when no token was supplied
    pub token: Option<String>,
}

impl ActionInputs {
    /// Validates and defaults every input
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input error encountered.
    pub fn validate(&self, os: &Os) -> Result<SetupInputs> {
        let version = VersionConstraint::parse(&self.version)?;
        let python = validate_input("python", &self.python, PYTHON_PATTERN, default_python(os))?;
        let use_installer = parse_bool_input("use-installer", &self.use_installer, false)?;
        let token = Some(self.token.clone()).filter(|token| !token.is_empty());

        Ok(SetupInputs {
            version,
            python,
            use_installer,
            token,
        })
    }
}
