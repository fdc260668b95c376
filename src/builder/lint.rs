//! Post-build checks on the produced package directory.

use std::fs;
use std::path::PathBuf;

use crate::core::PackageSpec;

/// Validates a built package. Returns the number of problems found.
pub trait PostBuildLint: Send + Sync {
    fn check(&self, spec: &PackageSpec) -> usize;
}

/// Checks the layout of `packages/<install_dir_name>`.
#[derive(Debug, Clone)]
pub struct PackageLayoutLint {
    packages_dir: PathBuf,
}

impl PackageLayoutLint {
    pub fn new(packages_dir: impl Into<PathBuf>) -> Self {
        PackageLayoutLint {
            packages_dir: packages_dir.into(),
        }
    }
}

impl PostBuildLint for PackageLayoutLint {
    fn check(&self, spec: &PackageSpec) -> usize {
        let dir = self.packages_dir.join(spec.install_dir_name());

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::warn!("{}: package directory {} was not created", spec, dir.display());
                return 1;
            }
        };

        let has_content = entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_str() != Some("CONTROL"));
        if !has_content {
            tracing::warn!("{}: package directory {} is empty", spec, dir.display());
            return 1;
        }

        0
    }
}
