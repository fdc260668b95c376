//! External build capability.
//!
//! The orchestrator never spawns anything itself; it hands a
//! [`BuildRequest`] to a [`BuildRunner`] and reads back the exit code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::core::{PackageSpec, SourceParagraph};
use crate::util::process::ProcessBuilder;

/// Host variables passed through to the build environment.
#[cfg(windows)]
const PASSTHROUGH_ENV: &[&str] = &[
    "ALLUSERSPROFILE",
    "APPDATA",
    "CommonProgramFiles",
    "CommonProgramFiles(x86)",
    "CommonProgramW6432",
    "COMPUTERNAME",
    "ComSpec",
    "HOMEDRIVE",
    "HOMEPATH",
    "LOCALAPPDATA",
    "NUMBER_OF_PROCESSORS",
    "OS",
    "PATHEXT",
    "PROCESSOR_ARCHITECTURE",
    "PROCESSOR_IDENTIFIER",
    "ProgramData",
    "ProgramFiles",
    "ProgramFiles(x86)",
    "ProgramW6432",
    "SystemDrive",
    "SystemRoot",
    "TEMP",
    "TMP",
    "USERNAME",
    "USERPROFILE",
    "windir",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "CUDA_PATH",
    "PATH",
];

#[cfg(not(windows))]
const PASSTHROUGH_ENV: &[&str] = &[
    "HOME",
    "USER",
    "LANG",
    "TMPDIR",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "CUDA_PATH",
    "PATH",
];

/// Everything a build runner needs to build one spec.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub spec: &'a PackageSpec,
    pub source: &'a SourceParagraph,
    /// Directory holding the port's recipe files.
    pub port_dir: &'a Path,
    /// Extra environment for the build, on top of the sanitized host environment.
    pub env: &'a BTreeMap<String, String>,
}

/// What a build run reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutput {
    pub exit_code: i32,
    pub elapsed: Duration,
}

impl BuildOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the external build for one spec.
///
/// `Err` means the build could not be started at all; a build that ran and
/// failed is an `Ok` with a nonzero exit code.
pub trait BuildRunner: Send + Sync {
    fn run(&self, request: &BuildRequest<'_>) -> Result<BuildOutput>;
}

/// Runs `scripts/ports.cmake` in CMake script mode.
#[derive(Debug, Clone)]
pub struct CmakeBuildRunner {
    cmake: PathBuf,
    script: PathBuf,
    debug: bool,
}

impl CmakeBuildRunner {
    pub fn new(cmake: impl Into<PathBuf>, script: impl Into<PathBuf>, debug: bool) -> Self {
        CmakeBuildRunner {
            cmake: cmake.into(),
            script: script.into(),
            debug,
        }
    }

    /// The command line for `request`.
    pub fn command(&self, request: &BuildRequest<'_>) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("-DCMD=BUILD")
            .arg(format!("-DPORT={}", request.source.name))
            .arg(format!("-DCURRENT_PORT_DIR={}", request.port_dir.display()))
            .arg(format!(
                "-DTARGET_TRIPLET={}",
                request.spec.triplet().canonical_name()
            ));
        if self.debug {
            cmd = cmd.arg("-DQUAY_DEBUG=ON");
        }
        cmd = cmd.arg("-P").arg(&self.script).env_clear();

        for key in PASSTHROUGH_ENV {
            if let Ok(value) = std::env::var(key) {
                cmd = cmd.env(*key, value);
            }
        }
        for (key, value) in request.env {
            cmd = cmd.env(key, value);
        }

        cmd.quiet(!self.debug)
    }
}

impl BuildRunner for CmakeBuildRunner {
    fn run(&self, request: &BuildRequest<'_>) -> Result<BuildOutput> {
        if !self.script.exists() {
            bail!("build script not found at {}", self.script.display());
        }

        let cmd = self.command(request);
        tracing::debug!("running `{}`", cmd.display_command());

        let start = Instant::now();
        let status = cmd.status()?;
        let elapsed = start.elapsed();

        // Killed by a signal: no exit code, treat as a failed build.
        let exit_code = status.code().unwrap_or(-1);
        Ok(BuildOutput { exit_code, elapsed })
    }
}
