//! Durable storage for status entries.
//!
//! Every spec owns one file, `status.d/<install_dir_name>`, holding its
//! binary paragraph (if any) and its state:
//!
//! ```text
//! Package: zlib
//! Version: 1.2.11
//! Architecture: x64-windows
//! Depends: libpng, bzip2
//! Status: installed
//! ```
//!
//! Files are replaced atomically, so writes for different specs never
//! contend and a reader never sees a half-written entry.

use std::path::{Path, PathBuf};

use crate::core::paragraph::fields::{self, take_required, write_field};
use crate::core::paragraph::{BinaryParagraph, ParagraphError};
use crate::core::{PackageSpec, Triplet};
use crate::status::{InstallState, StatusEntry, StatusError};
use crate::util::fs::{list_file_names, write_atomic};

/// The on-disk status directory.
#[derive(Debug, Clone)]
pub struct StatusStore {
    dir: PathBuf,
}

impl StatusStore {
    /// Create a store rooted at `dir`. Nothing is touched until used.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StatusStore { dir: dir.into() }
    }

    /// The status directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `spec`'s entry.
    pub fn entry_path(&self, spec: &PackageSpec) -> PathBuf {
        self.dir.join(spec.install_dir_name())
    }

    /// Read every entry. Entries that fail to parse are skipped and counted.
    pub fn read_all(&self) -> Result<(Vec<StatusEntry>, usize), StatusError> {
        let read_error = |source| StatusError::Read {
            path: self.dir.clone(),
            source,
        };

        let mut entries = Vec::new();
        let mut skipped = 0;

        for name in list_file_names(&self.dir).map_err(read_error)? {
            if name.starts_with('.') {
                continue;
            }

            let path = self.dir.join(&name);
            let text = std::fs::read_to_string(&path).map_err(|source| StatusError::Read {
                path: path.clone(),
                source,
            })?;

            match parse_entry(&text) {
                Ok(entry) if entry.spec().install_dir_name() == name => entries.push(entry),
                Ok(entry) => {
                    tracing::warn!(
                        "skipping status entry {}: it describes `{}`",
                        path.display(),
                        entry.spec()
                    );
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("skipping malformed status entry {}: {}", path.display(), e);
                    skipped += 1;
                }
            }
        }

        Ok((entries, skipped))
    }

    /// Atomically replace the file for `entry`'s spec.
    pub fn write(&self, entry: &StatusEntry) -> Result<(), StatusError> {
        let path = self.entry_path(entry.spec());
        write_atomic(&path, &serialize_entry(entry))
            .map_err(|source| StatusError::Write { path, source })
    }
}

/// Render a status entry as paragraph text.
pub fn serialize_entry(entry: &StatusEntry) -> String {
    let mut out = String::new();
    match entry.package() {
        Some(pgh) => pgh.write_fields(&mut out),
        None => {
            write_field(&mut out, "Package", entry.spec().name());
            write_field(&mut out, "Architecture", entry.spec().triplet().canonical_name());
        }
    }
    write_field(&mut out, "Status", entry.state().as_str());
    out.push('\n');
    out
}

/// Parse paragraph text written by [`serialize_entry`].
pub fn parse_entry(text: &str) -> Result<StatusEntry, ParagraphError> {
    let mut fields = fields::parse_single_paragraph(text)?;

    let state = take_required(&mut fields, "Status")?;
    let state: InstallState = state.parse().map_err(|_| ParagraphError::InvalidField {
        field: "Status",
        message: format!("unknown state `{state}`"),
    })?;

    if fields.contains_key("Version") {
        let pgh = BinaryParagraph::from_fields(fields)?;
        return Ok(StatusEntry::with_package(pgh, state));
    }

    if state == InstallState::Installed {
        return Err(ParagraphError::MissingField { field: "Version" });
    }

    let name = take_required(&mut fields, "Package")?;
    let triplet = take_required(&mut fields, "Architecture")?;
    let triplet = Triplet::from_canonical_name(&triplet).map_err(|e| {
        ParagraphError::InvalidField {
            field: "Architecture",
            message: e.to_string(),
        }
    })?;
    let spec = PackageSpec::from_name_and_triplet(&name, triplet).map_err(|e| {
        ParagraphError::InvalidField {
            field: "Package",
            message: e.to_string(),
        }
    })?;

    Ok(StatusEntry::without_package(spec, state))
}
