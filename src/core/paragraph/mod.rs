//! Paragraphs - package metadata records.
//!
//! Metadata is stored as `Key: Value` paragraphs. Text is first parsed into
//! a loose [`FieldMap`], then projected into a typed record:
//!
//! - [`SourceParagraph`]: a recipe's metadata (`ports/<name>/CONTROL`)
//! - [`BinaryParagraph`]: a built package's metadata, derived from a
//!   source paragraph and a triplet

pub mod binary;
pub mod fields;
pub mod source;

use thiserror::Error;

pub use binary::{serialize, BinaryParagraph};
pub use fields::{parse_paragraphs, parse_single_paragraph, FieldMap};
pub use source::SourceParagraph;

/// Error reading paragraph text or projecting it into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParagraphError {
    #[error("line {line}: expected `Key: Value`")]
    MalformedLine { line: usize },

    #[error("line {line}: continuation line without a field to continue")]
    OrphanContinuation { line: usize },

    #[error("duplicate field `{field}`")]
    DuplicateField { field: String },

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid `{field}` field: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("expected exactly one paragraph, found {found}")]
    ParagraphCount { found: usize },
}
