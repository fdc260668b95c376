//! quay - a source package manager for C and C++ libraries
//!
//! This crate provides the core library functionality for quay: package
//! specs and their metadata paragraphs, the installed-package status
//! database, dependency resolution, and build orchestration.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod status;
pub mod util;

/// Test utilities and mocks for quay unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock build runners, post-build checks, and
/// fixtures for ports and quay roots.
#[cfg(test)]
pub mod test_support;

pub use core::{BinaryParagraph, PackageSpec, SourceParagraph, Triplet};
pub use status::StatusDatabase;
pub use util::context::GlobalContext;
