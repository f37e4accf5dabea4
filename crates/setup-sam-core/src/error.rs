use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    // Input errors
    #[error("INPUT_INVALID: {name} doesn't match {pattern}")]
    InputInvalid { name: String, pattern: String },

    #[error(
        "INPUT_INVALID: {name} must be one of true, True, TRUE, false, False, FALSE (got '{value}')"
    )]
    InputNotBoolean { name: String, value: String },

    // Prerequisite errors
    #[error("INTERPRETER_NOT_FOUND: unable to locate executable file: {0}")]
    InterpreterNotFound(String),

    // Platform errors
    #[error("UNSUPPORTED_PLATFORM: only Linux is supported by the native installer, this is {0}")]
    UnsupportedPlatform(String),

    #[error(
        "UNSUPPORTED_ARCH: only x86-64 and ARM64 are supported by the native installer, this is {0}"
    )]
    UnsupportedArch(String),

    // Version errors
    #[error("VERSION_NOT_EXACT: version must be in the format x.y.z when using the native installer (got '{0}')")]
    VersionNotExact(String),

    #[error(
        "VERSION_BELOW_MINIMUM: {arch} releases are only available from version {minimum} onward (requested {version})"
    )]
    VersionBelowMinimum {
        arch: String,
        version: String,
        minimum: String,
    },

    // Process errors
    #[error("COMMAND_FAILED: {command}: {reason}")]
    CommandFailed { command: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, SetupError>;
