//! Command implementations

pub mod build;
pub mod completions;
pub mod install;
pub mod list;
pub mod remove;

use std::fmt;

use anyhow::Result;

use quay::builder::{
    create_cascade_message, create_error_message, create_user_troubleshooting_message,
    BuildResult, ExtendedBuildResult,
};
use quay::core::PackageSpec;
use quay::util::diagnostic::suggestions;
use quay::util::shell::Shell;
use quay::util::Diagnostic;

/// A failure that has already been printed; the process just exits with 1.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failure already reported")
    }
}

impl std::error::Error for Reported {}

/// Print a non-successful build result and turn it into an exit status.
pub fn report_build_result(shell: &Shell, spec: &PackageSpec, result: &ExtendedBuildResult) -> Result<()> {
    match result.code {
        BuildResult::Succeeded => return Ok(()),
        BuildResult::CascadedDueToMissingDependencies => {
            let message = create_cascade_message(&result.unmet_dependencies);
            shell.diagnostic(
                &Diagnostic::error(message.trim_end())
                    .with_suggestion(suggestions::INSTALL_DEPENDENCIES),
            );
        }
        BuildResult::BuildFailed | BuildResult::PostBuildChecksFailed => {
            shell.diagnostic(&Diagnostic::error(create_error_message(result.code, spec)));
            shell.message(create_user_troubleshooting_message(spec));
        }
    }
    Err(Reported.into())
}
