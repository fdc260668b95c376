//! Binary paragraphs - metadata of a built package.

use crate::core::dependency::filter_dependencies;
use crate::core::package_spec::ParseError;
use crate::core::paragraph::fields::{self, take_optional, take_required, write_field, FieldMap};
use crate::core::paragraph::{ParagraphError, SourceParagraph};
use crate::core::{PackageSpec, Triplet};

/// Metadata recorded for a package built for one triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryParagraph {
    pub spec: PackageSpec,
    pub version: String,
    pub description: String,
    pub maintainer: String,
    /// Dependency names with platform qualifiers already applied.
    pub depends: Vec<String>,
}

impl BinaryParagraph {
    /// Derive the binary paragraph for building `source` on `triplet`.
    ///
    /// Only dependencies whose qualifier is satisfied by `triplet` are kept.
    pub fn from_source(source: &SourceParagraph, triplet: Triplet) -> Result<Self, ParseError> {
        Ok(BinaryParagraph {
            spec: PackageSpec::from_name_and_triplet(&source.name, triplet)?,
            version: source.version.clone(),
            description: source.description.clone(),
            maintainer: source.maintainer.clone(),
            depends: filter_dependencies(&source.depends, triplet),
        })
    }

    /// Project a parsed field map into a binary paragraph.
    ///
    /// Fields other than the ones written by [`serialize`] are ignored.
    pub fn from_fields(mut fields: FieldMap) -> Result<Self, ParagraphError> {
        let name = take_required(&mut fields, "Package")?;
        let triplet = take_required(&mut fields, "Architecture")?;
        let triplet =
            Triplet::from_canonical_name(&triplet).map_err(|e| ParagraphError::InvalidField {
                field: "Architecture",
                message: e.to_string(),
            })?;
        let spec = PackageSpec::from_name_and_triplet(&name, triplet).map_err(|e| {
            ParagraphError::InvalidField {
                field: "Package",
                message: e.to_string(),
            }
        })?;

        let depends = take_optional(&mut fields, "Depends")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        Ok(BinaryParagraph {
            spec,
            version: take_required(&mut fields, "Version")?,
            description: take_optional(&mut fields, "Description"),
            maintainer: take_optional(&mut fields, "Maintainer"),
            depends,
        })
    }

    /// Parse a binary paragraph from `CONTROL` text.
    pub fn parse(text: &str) -> Result<Self, ParagraphError> {
        Self::from_fields(fields::parse_single_paragraph(text)?)
    }

    /// `name:triplet`
    pub fn displayname(&self) -> String {
        format!("{}:{}", self.spec.name(), self.spec.triplet())
    }

    /// `name_version_triplet`
    pub fn fullstem(&self) -> String {
        format!(
            "{}_{}_{}",
            self.spec.name(),
            self.version,
            self.spec.triplet()
        )
    }

    /// Storage directory of the built package.
    pub fn dir(&self) -> String {
        self.spec.install_dir_name()
    }

    /// Append this paragraph's fields, without the terminating blank line.
    pub(crate) fn write_fields(&self, out: &mut String) {
        write_field(out, "Package", self.spec.name());
        write_field(out, "Version", &self.version);
        write_field(out, "Architecture", self.spec.triplet().canonical_name());
        if !self.description.is_empty() {
            write_field(out, "Description", &self.description);
        }
        if !self.maintainer.is_empty() {
            write_field(out, "Maintainer", &self.maintainer);
        }
        if !self.depends.is_empty() {
            write_field(out, "Depends", &self.depends.join(", "));
        }
    }
}

/// Render a binary paragraph as blank-line terminated `Key: Value` text.
pub fn serialize(pgh: &BinaryParagraph) -> String {
    let mut out = String::new();
    pgh.write_fields(&mut out);
    out.push('\n');
    out
}
