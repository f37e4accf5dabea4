//! CLI structure using clap
//!
//! Every action input doubles as an `INPUT_*` environment variable, which is
//! how the runner hands inputs to an action. Values are passed through as
//! strings and validated later, so malformed inputs are reported with the
//! input's grammar rather than a clap usage error.

use clap::Parser;
use setup_sam_core::ActionInputs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup-sam")]
#[command(version, about = "Install the AWS SAM CLI and add it to PATH", long_about = None)]
pub struct Cli {
    /// Version to install (e.g. "1.139.0", "1.*"); empty means latest
    #[arg(long, env = "INPUT_VERSION", default_value = "")]
    pub sam_version: String,

    /// Python interpreter used to build the virtual environment
    #[arg(long, env = "INPUT_PYTHON", default_value = "")]
    pub python: String,

    /// Use the native Linux installer instead of pip (true/false)
    #[arg(long, env = "INPUT_USE-INSTALLER", default_value = "")]
    pub use_installer: String,

    /// GitHub token for the release API
    #[arg(long, env = "INPUT_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// GitHub web base URL serving release downloads
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    pub github_server_url: String,

    /// Root of the local artifact cache
    #[arg(long, env = "SETUP_SAM_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Runner tool cache, used for the default cache root
    #[arg(long, env = "RUNNER_TOOL_CACHE", hide = true)]
    pub tool_cache: Option<PathBuf>,

    /// File collecting PATH additions for later steps
    #[arg(long, env = "GITHUB_PATH")]
    pub github_path: Option<PathBuf>,
}

impl Cli {
    pub fn inputs(&self) -> ActionInputs {
        ActionInputs {
            version: self.sam_version.clone(),
            python: self.python.clone(),
            use_installer: self.use_installer.clone(),
            token: self.token.clone(),
        }
    }
}
