//! Running external tools.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// A command line under construction, inspectable before it runs.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    inherit_env: bool,
    quiet: bool,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            inherit_env: true,
            quiet: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, |pb, arg| pb.arg(arg))
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Start the child from an empty environment; only variables set with
    /// [`env`](Self::env) reach it.
    pub fn env_clear(mut self) -> Self {
        self.inherit_env = false;
        self
    }

    /// Send the child's stdout and stderr to the null device.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Run to completion and report how the child exited.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        if !self.inherit_env {
            cmd.env_clear();
        }
        cmd.envs(&self.env);
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        cmd.status()
            .with_context(|| format!("could not run `{}`", self.program.display()))
    }

    /// The command line as one string, for logs.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Locate `cmake` on `PATH`.
pub fn find_cmake() -> Option<PathBuf> {
    which::which("cmake").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["-DCMD=BUILD", "-P", "ports.cmake"]);

        assert_eq!(pb.display_command(), "cmake -DCMD=BUILD -P ports.cmake");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_clear_keeps_explicit_vars() {
        let status = ProcessBuilder::new("/bin/sh")
            .args(["-c", "test \"$QUAY_TEST\" = 1 && test -z \"$QUAY_UNSET_BY_CLEAR\""])
            .env_clear()
            .env("QUAY_TEST", "1")
            .status()
            .unwrap();

        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_status_reports_exit_code() {
        let status = ProcessBuilder::new("/bin/sh")
            .args(["-c", "echo noisy; exit 3"])
            .quiet(true)
            .status()
            .unwrap();

        assert_eq!(status.code(), Some(3));
    }
}
