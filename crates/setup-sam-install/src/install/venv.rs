//! Environment-build strategy
//!
//! Installs the SAM CLI from the package index into a fresh Python virtual
//! environment. Partial and wildcard versions are resolved by pip itself.
//!
//! Only the `sam` executable is published: it is linked into a `bin` directory
//! next to the environment, so the venv's `python` and `pip` stay off PATH.

use crate::install::InstallStrategy;
use crate::install::platform::{binary_name, venv_bin_dir};
use setup_sam_core::{PlatformContext, Reporter, Result, SetupError, VersionConstraint};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use xshell::{Shell, cmd};

/// Package name on the package index
pub const PACKAGE_NAME: &str = "aws-sam-cli";

/// Directory under the work directory that gets published
pub const PUBLISH_DIR: &str = "bin";

/// Process seam used by the build strategy
pub trait PythonEnv {
    /// Resolves `program` on PATH
    fn which(&self, program: &str) -> Result<PathBuf>;

    /// Runs `program` with `args`, streaming its output
    fn run(&self, program: &Path, args: &[String]) -> Result<()>;
}

/// [`PythonEnv`] running real processes through xshell
pub struct XshellEnv {
    sh: Shell,
}

impl XshellEnv {
    pub fn new() -> Result<Self> {
        let sh = Shell::new().map_err(|e| SetupError::Generic(e.to_string()))?;
        Ok(Self { sh })
    }
}

impl PythonEnv for XshellEnv {
    fn which(&self, program: &str) -> Result<PathBuf> {
        which::which(program).map_err(|_| SetupError::InterpreterNotFound(program.to_string()))
    }

    fn run(&self, program: &Path, args: &[String]) -> Result<()> {
        let sh = &self.sh;
        cmd!(sh, "{program} {args...}")
            .run()
            .map_err(|e| SetupError::CommandFailed {
                command: format!("{} {}", program.display(), args.join(" ")),
                reason: e.to_string(),
            })
    }
}

/// Builds a virtual environment and pip-installs the SAM CLI into it
pub struct EnvironmentBuild {
    env: Box<dyn PythonEnv>,
    python: String,
}

impl EnvironmentBuild {
    pub fn new(env: Box<dyn PythonEnv>, python: impl Into<String>) -> Self {
        Self {
            env,
            python: python.into(),
        }
    }

    fn pip(&self, venv_python: &Path, args: &[&str]) -> Result<()> {
        let mut full = vec!["-m".to_string(), "pip".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        self.env.run(venv_python, &full)
    }
}

/// pip requirement for a constraint; empty means the current major line
pub fn requirement(constraint: &VersionConstraint) -> String {
    format!("{}=={}", PACKAGE_NAME, constraint.or_default_wildcard())
}

impl InstallStrategy for EnvironmentBuild {
    fn install(
        &self,
        constraint: &VersionConstraint,
        platform: &PlatformContext,
        reporter: &dyn Reporter,
    ) -> Result<Option<PathBuf>> {
        let python = self.env.which(&self.python)?;
        log::debug!("Using interpreter {}", python.display());
        self.env.run(&python, &["--version".to_string()])?;

        let workdir = tempfile::Builder::new()
            .prefix("setup-sam-")
            .tempdir_in(&platform.temp_dir)?;
        let venv = workdir.path().join(".venv");

        self.env.run(
            &python,
            &["-m".to_string(), "venv".to_string(), venv.display().to_string()],
        )?;

        let bin_dir = venv.join(venv_bin_dir(&platform.os));
        let venv_python = bin_dir.join("python");

        self.pip(&venv_python, &["install", "--upgrade", "pip"])?;
        self.pip(&venv_python, &["install", "--upgrade", "setuptools", "wheel"])?;

        let requirement = requirement(constraint);
        reporter.info(&format!("Installing {}", requirement));
        self.pip(&venv_python, &["install", "--upgrade", requirement.as_str()])?;

        let name = binary_name(&platform.os);
        let installed = bin_dir.join(name);
        if !installed.is_file() {
            return Err(SetupError::Generic(format!(
                "{} did not provide {}",
                requirement,
                installed.display()
            )));
        }

        let publish_dir = workdir.path().join(PUBLISH_DIR);
        fs::create_dir_all(&publish_dir)?;
        link_executable(&installed, &publish_dir.join(name))?;

        // Later steps run `sam` from the venv, so it must outlive this process
        let workdir = workdir.keep();
        log::debug!("Kept environment at {}", workdir.display());
        Ok(Some(workdir.join(PUBLISH_DIR)))
    }
}

#[cfg(unix)]
fn link_executable(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn link_executable(target: &Path, link: &Path) -> io::Result<()> {
    fs::hard_link(target, link).or_else(|_| fs::copy(target, link).map(|_| ()))
}
