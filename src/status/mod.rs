//! Installed-package status tracking.
//!
//! [`StatusDatabase`] answers "is this spec installed?" and moves specs
//! through the install state machine; [`StatusStore`] makes each move
//! durable before it becomes visible.

pub mod database;
pub mod storage;

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::PackageSpec;
use crate::util::diagnostic::suggestions;

pub use database::{InstallState, LoadReport, StatusDatabase, StatusEntry};
pub use storage::StatusStore;

/// Errors from the status database.
#[derive(Debug, Error, Diagnostic)]
pub enum StatusError {
    #[error("failed to read status database at {}", path.display())]
    #[diagnostic(code(quay::status::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write status entry {}", path.display())]
    #[diagnostic(
        code(quay::status::write),
        help("check that the installed directory is writable")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot move `{spec}` from {from} to {to}")]
    #[diagnostic(code(quay::status::transition))]
    InvalidTransition {
        spec: PackageSpec,
        from: InstallState,
        to: InstallState,
    },

    #[error(
        "the status database holds interrupted installs: {}",
        specs.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
    )]
    #[diagnostic(code(quay::status::inconsistent), help("{}", suggestions::HALF_INSTALLED))]
    Inconsistent { specs: Vec<PackageSpec> },
}
