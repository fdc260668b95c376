//! High-level operations.
//!
//! This module contains the implementation of quay commands.

pub mod ports;
pub mod quay_build;
pub mod quay_install;
pub mod quay_list;
pub mod quay_remove;
pub mod status;

pub use ports::PortsDir;
pub use quay_build::{build, BuildOptions, BuildOutcome};
pub use quay_install::{install, InstallSummary};
pub use quay_list::{format_entry, list_installed};
pub use quay_remove::remove;
pub use status::{database_load_check, database_load_lenient};
