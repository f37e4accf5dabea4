//! Platform and architecture gate
//!
//! The environment build works wherever Python does. The native installer only
//! has prebuilt archives for Linux on x86-64 and ARM64, and ARM64 archives only
//! from [`ARM64_MINIMUM_VERSION`] onward.

use setup_sam_core::{Arch, ExactVersion, Os, PlatformContext, Result, SetupError};

/// First release that ships a linux-arm64 archive
pub const ARM64_MINIMUM_VERSION: &str = "1.104.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    EnvironmentBuild,
    NativeArchive,
}

/// Architecture as named in native archive file names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeArch {
    X86_64,
    Arm64,
}

impl NativeArch {
    pub fn token(self) -> &'static str {
        match self {
            NativeArch::X86_64 => "x86_64",
            NativeArch::Arm64 => "arm64",
        }
    }
}

/// Checks that `platform` can be served by `mode`
///
/// # Errors
///
/// In native mode, returns [`SetupError::UnsupportedPlatform`] for any OS other
/// than Linux and [`SetupError::UnsupportedArch`] for anything but x64/arm64.
pub fn check_platform(platform: &PlatformContext, mode: InstallMode) -> Result<()> {
    match mode {
        InstallMode::EnvironmentBuild => Ok(()),
        InstallMode::NativeArchive => native_arch(platform).map(|_| ()),
    }
}

/// Normalized archive architecture for a supported native platform
pub fn native_arch(platform: &PlatformContext) -> Result<NativeArch> {
    if platform.os != Os::Linux {
        return Err(SetupError::UnsupportedPlatform(platform.os.to_string()));
    }

    match &platform.arch {
        Arch::X64 => Ok(NativeArch::X86_64),
        Arch::Arm64 => Ok(NativeArch::Arm64),
        Arch::Other(id) => Err(SetupError::UnsupportedArch(id.clone())),
    }
}

/// Rejects versions older than the first archive published for `arch`
pub fn check_arch_floor(arch: NativeArch, version: &ExactVersion) -> Result<()> {
    if arch != NativeArch::Arm64 {
        return Ok(());
    }

    let minimum = ExactVersion::parse(ARM64_MINIMUM_VERSION)
        .ok_or_else(|| SetupError::Generic("invalid ARM64 minimum version".to_string()))?;

    if *version < minimum {
        return Err(SetupError::VersionBelowMinimum {
            arch: arch.token().to_string(),
            version: version.to_string(),
            minimum: ARM64_MINIMUM_VERSION.to_string(),
        });
    }

    Ok(())
}

/// Directory holding a virtual environment's executables
///
/// See <https://docs.python.org/3/library/venv.html>
pub fn venv_bin_dir(os: &Os) -> &'static str {
    if os.is_windows() { "Scripts" } else { "bin" }
}

/// File name of the SAM CLI executable
pub fn binary_name(os: &Os) -> &'static str {
    if os.is_windows() { "sam.exe" } else { "sam" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn platform(os: Os, arch: Arch) -> PlatformContext {
        PlatformContext {
            os,
            arch,
            temp_dir: PathBuf::from("/tmp"),
            home_dir: PathBuf::from("/home/runner"),
        }
    }

    #[test]
    fn test_native_arch_linux_x64() {
        let arch = native_arch(&platform(Os::Linux, Arch::X64)).unwrap();
        assert_eq!(arch, NativeArch::X86_64);
        assert_eq!(arch.token(), "x86_64");
    }

    #[test]
    fn test_native_arch_linux_arm64() {
        let arch = native_arch(&platform(Os::Linux, Arch::Arm64)).unwrap();
        assert_eq!(arch, NativeArch::Arm64);
        assert_eq!(arch.token(), "arm64");
    }

    #[test]
    fn test_native_rejects_other_os() {
        for os in [Os::Darwin, Os::Windows, Os::Other("freebsd".to_string())] {
            let err = native_arch(&platform(os.clone(), Arch::X64)).unwrap_err();
            assert!(
                matches!(err, SetupError::UnsupportedPlatform(ref name) if name == os.as_str()),
                "{os} should be rejected"
            );
        }
    }

    #[test]
    fn test_native_rejects_other_arch() {
        let err = native_arch(&platform(Os::Linux, Arch::Other("s390x".to_string()))).unwrap_err();
        assert!(err.to_string().contains("s390x"));
    }

    #[test]
    fn test_check_platform_environment_build_allows_everything() {
        for os in [Os::Linux, Os::Darwin, Os::Windows] {
            let context = platform(os, Arch::Other("riscv64".to_string()));
            assert!(check_platform(&context, InstallMode::EnvironmentBuild).is_ok());
        }
    }

    #[test]
    fn test_check_platform_native() {
        assert!(check_platform(&platform(Os::Linux, Arch::X64), InstallMode::NativeArchive).is_ok());
        assert!(
            check_platform(&platform(Os::Darwin, Arch::Arm64), InstallMode::NativeArchive).is_err()
        );
    }

    #[test]
    fn test_arch_floor_arm64() {
        let old = ExactVersion::parse("1.103.0").unwrap();
        let err = check_arch_floor(NativeArch::Arm64, &old).unwrap_err();
        assert!(err.to_string().contains("1.104.0"));

        let first = ExactVersion::parse("1.104.0").unwrap();
        assert!(check_arch_floor(NativeArch::Arm64, &first).is_ok());
    }

    #[test]
    fn test_arch_floor_does_not_apply_to_x86_64() {
        let old = ExactVersion::parse("1.23.456").unwrap();
        assert!(check_arch_floor(NativeArch::X86_64, &old).is_ok());
    }

    #[test]
    fn test_venv_bin_dir() {
        assert_eq!(venv_bin_dir(&Os::Windows), "Scripts");
        assert_eq!(venv_bin_dir(&Os::Linux), "bin");
        assert_eq!(venv_bin_dir(&Os::Darwin), "bin");
    }

    #[test]
    fn test_binary_name() {
        assert_eq!(binary_name(&Os::Windows), "sam.exe");
        assert_eq!(binary_name(&Os::Linux), "sam");
    }
}
