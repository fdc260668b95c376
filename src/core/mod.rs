//! Core data structures for quay.
//!
//! This module contains the foundational types used throughout quay:
//! - Interned triplets and package specs
//! - Dependency expressions with platform qualifiers
//! - Source and binary paragraphs

pub mod dependency;
pub mod package_spec;
pub mod paragraph;
pub mod triplet;

pub use dependency::{filter_dependencies, DependencyExpr, Qualifier};
pub use package_spec::{MalformedReason, PackageSpec, ParseError};
pub use paragraph::{BinaryParagraph, SourceParagraph};
pub use triplet::Triplet;
