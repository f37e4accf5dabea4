//! Shared types for the setup-sam workspace.
//!
//! - [`error`]: the workspace error type
//! - [`platform`]: the injected view of the host (OS, architecture, directories)
//! - [`input`]: action input validation
//! - [`version`]: version constraints and exact versions
//! - [`reporter`]: the sink for annotations, failures and PATH updates

pub mod error;
pub mod input;
pub mod platform;
pub mod reporter;
pub mod version;

// Re-export commonly used types
pub use error::{Result, SetupError};
pub use input::{ActionInputs, SetupInputs};
pub use platform::{Arch, Os, PlatformContext};
pub use reporter::{ActionsReporter, MemoryReporter, ReportEvent, Reporter};
pub use version::{ExactVersion, VersionConstraint};
