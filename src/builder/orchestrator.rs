//! Build orchestration - drives one spec from recipe to recorded package.
//!
//! Each attempt is a small state machine:
//!
//! ```text
//! Checking -> Building -> Linting -> Recording -> Done(Succeeded)
//!     |           |           |
//!     v           v           v
//!  Done(Cascaded) Done(BuildFailed) Done(PostBuildChecksFailed)
//! ```
//!
//! Nothing is written to the status database before `Recording`, so every
//! outcome other than `Succeeded` leaves installed state untouched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::builder::runner::BuildRequest;
use crate::builder::BuildContext;
use crate::core::paragraph::{serialize, BinaryParagraph};
use crate::core::{PackageSpec, ParseError, SourceParagraph};
use crate::resolver::{compute_missing, ResolutionError};
use crate::status::{StatusDatabase, StatusError};
use crate::util::fs::write_atomic;

/// Outcome of one build attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Succeeded,
    BuildFailed,
    PostBuildChecksFailed,
    CascadedDueToMissingDependencies,
}

impl BuildResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Succeeded => "SUCCEEDED",
            BuildResult::BuildFailed => "BUILD_FAILED",
            BuildResult::PostBuildChecksFailed => "POST_BUILD_CHECKS_FAILED",
            BuildResult::CascadedDueToMissingDependencies => {
                "CASCADED_DUE_TO_MISSING_DEPENDENCIES"
            }
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`BuildResult`] plus what the driver needs to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedBuildResult {
    pub code: BuildResult,
    /// Specs to install first; only set for a cascade, in resolver order.
    pub unmet_dependencies: Vec<PackageSpec>,
    /// Wall-clock time of the external build, if it ran.
    pub build_time: Option<Duration>,
}

impl ExtendedBuildResult {
    fn new(code: BuildResult, build_time: Option<Duration>) -> Self {
        ExtendedBuildResult {
            code,
            unmet_dependencies: Vec::new(),
            build_time,
        }
    }

    fn cascaded(unmet_dependencies: Vec<PackageSpec>) -> Self {
        ExtendedBuildResult {
            code: BuildResult::CascadedDueToMissingDependencies,
            unmet_dependencies,
            build_time: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == BuildResult::Succeeded
    }
}

/// A build attempt that could not reach a [`BuildResult`].
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("failed to start the build for `{spec}`")]
    #[diagnostic(
        code(quay::build::runner),
        help("check that cmake is installed or set `build.cmake` in .quay/config.toml")
    )]
    Runner {
        spec: PackageSpec,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Spec(#[from] ParseError),

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(quay::build::record))]
    Record {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Status(#[from] StatusError),
}

/// States of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Checking,
    Building,
    Linting,
    Recording,
    Done(ExtendedBuildResult),
}

struct BuildAttempt<'a> {
    spec: &'a PackageSpec,
    source: &'a SourceParagraph,
    port_dir: &'a Path,
    status_db: &'a StatusDatabase,
    ctx: &'a BuildContext,
    build_time: Option<Duration>,
}

impl BuildAttempt<'_> {
    fn step(&mut self, state: BuildState) -> Result<BuildState, BuildError> {
        match state {
            BuildState::Checking => self.check(),
            BuildState::Building => self.build(),
            BuildState::Linting => Ok(self.lint()),
            BuildState::Recording => self.record(),
            done @ BuildState::Done(_) => Ok(done),
        }
    }

    fn check(&self) -> Result<BuildState, BuildError> {
        let missing = compute_missing(
            self.spec,
            self.source,
            self.spec.triplet(),
            self.status_db,
        )?;

        if missing.is_empty() {
            Ok(BuildState::Building)
        } else {
            Ok(BuildState::Done(ExtendedBuildResult::cascaded(missing)))
        }
    }

    fn build(&mut self) -> Result<BuildState, BuildError> {
        tracing::info!("building {}", self.spec);

        let request = BuildRequest {
            spec: self.spec,
            source: self.source,
            port_dir: self.port_dir,
            env: &self.ctx.env,
        };
        let output = self
            .ctx
            .runner
            .run(&request)
            .map_err(|e| BuildError::Runner {
                spec: self.spec.clone(),
                source: e.into(),
            })?;

        tracing::info!(
            metric = "buildtimeus",
            spec = %self.spec,
            micros = output.elapsed.as_micros() as u64,
            "build of {} exited with {}",
            self.spec,
            output.exit_code
        );
        self.build_time = Some(output.elapsed);

        if output.success() {
            Ok(BuildState::Linting)
        } else {
            Ok(self.done(BuildResult::BuildFailed))
        }
    }

    fn lint(&self) -> BuildState {
        let error_count = self.ctx.lint.check(self.spec);
        if error_count == 0 {
            BuildState::Recording
        } else {
            tracing::warn!("found {} error(s) in {}", error_count, self.spec);
            self.done(BuildResult::PostBuildChecksFailed)
        }
    }

    fn record(&self) -> Result<BuildState, BuildError> {
        let pgh = BinaryParagraph::from_source(self.source, self.spec.triplet())?;
        let control = self.ctx.package_dir(&pgh.dir()).join("CONTROL");

        self.status_db.mark_half_installed(self.spec)?;

        if let Err(source) = write_atomic(&control, &serialize(&pgh)) {
            self.status_db.mark_not_installed(self.spec)?;
            return Err(BuildError::Record {
                path: control,
                source,
            });
        }

        self.status_db.mark_installed(pgh)?;
        Ok(self.done(BuildResult::Succeeded))
    }

    fn done(&self, code: BuildResult) -> BuildState {
        BuildState::Done(ExtendedBuildResult::new(code, self.build_time))
    }
}

/// Build `spec` from `source`, recording it in `status_db` on success.
///
/// Only `spec`'s immediate dependencies are checked; any that are missing
/// end the attempt with [`BuildResult::CascadedDueToMissingDependencies`]
/// before the runner is invoked.
///
/// # Panics
///
/// Panics if `spec` does not name `source`. Callers load the recipe for the
/// spec they pass, so a mismatch is a bug rather than bad input.
pub fn build_package(
    source: &SourceParagraph,
    spec: &PackageSpec,
    port_dir: &Path,
    status_db: &StatusDatabase,
    ctx: &BuildContext,
) -> Result<ExtendedBuildResult, BuildError> {
    assert_eq!(
        spec.name(),
        source.name,
        "inconsistent arguments to build_package()"
    );

    let mut attempt = BuildAttempt {
        spec,
        source,
        port_dir,
        status_db,
        ctx,
        build_time: None,
    };

    let mut state = BuildState::Checking;
    loop {
        tracing::debug!("{}: {:?}", spec, state);
        state = attempt.step(state)?;
        if let BuildState::Done(result) = state {
            tracing::debug!("{}: done with {}", spec, result.code);
            return Ok(result);
        }
    }
}

/// The cascade report printed when dependencies are missing.
pub fn create_cascade_message(unmet: &[PackageSpec]) -> String {
    let mut message = String::from(
        "The build command requires all dependencies to be already installed.\n\
         The following dependencies are missing:\n\n",
    );
    for spec in unmet {
        message.push_str(&format!("    {}\n", spec));
    }
    message
}

/// `Building package <spec> failed with: <RESULT>`
pub fn create_error_message(result: BuildResult, spec: &PackageSpec) -> String {
    format!("Building package {} failed with: {}", spec, result)
}

/// What the user should try after a failed build.
pub fn create_user_troubleshooting_message(spec: &PackageSpec) -> String {
    format!(
        "Please ensure your ports are up to date, then report the failure including:\n  \
         Package: {}\n  \
         quay version: {}\n\
         \n\
         Rerun with --verbose to see the full build log.",
        spec,
        env!("CARGO_PKG_VERSION")
    )
}
