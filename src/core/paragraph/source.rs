//! Source paragraphs - recipe metadata.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::dependency::DependencyExpr;
use crate::core::package_spec::validate_name;
use crate::core::paragraph::fields::{self, take_optional, take_required, FieldMap};
use crate::core::paragraph::ParagraphError;

/// Metadata declared by a port's `CONTROL` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceParagraph {
    pub name: String,
    pub version: String,
    pub description: String,
    pub maintainer: String,
    pub depends: Vec<DependencyExpr>,
}

impl SourceParagraph {
    /// Project a parsed field map into a source paragraph.
    pub fn from_fields(mut fields: FieldMap) -> Result<Self, ParagraphError> {
        let name = take_required(&mut fields, "Source")?.trim().to_string();
        validate_name(&name).map_err(|reason| ParagraphError::InvalidField {
            field: "Source",
            message: reason.to_string(),
        })?;

        let version = take_required(&mut fields, "Version")?.trim().to_string();
        let description = take_optional(&mut fields, "Description");
        let maintainer = take_optional(&mut fields, "Maintainer");
        let depends = DependencyExpr::parse_list(&take_optional(&mut fields, "Build-Depends"))
            .map_err(|e| ParagraphError::InvalidField {
                field: "Build-Depends",
                message: e.to_string(),
            })?;

        for key in fields.keys() {
            tracing::debug!("ignoring unknown field `{}` in port `{}`", key, name);
        }

        Ok(SourceParagraph {
            name,
            version,
            description,
            maintainer,
            depends,
        })
    }

    /// Parse a source paragraph from `CONTROL` text.
    pub fn parse(text: &str) -> Result<Self, ParagraphError> {
        Self::from_fields(fields::parse_single_paragraph(text)?)
    }

    /// Load a source paragraph from a port's `CONTROL` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read port file: {}", path.display()))?;

        Self::parse(&text).with_context(|| format!("failed to parse port file: {}", path.display()))
    }
}
