//! The shallow per-attempt dependency check.

use crate::core::{filter_dependencies, PackageSpec, SourceParagraph, Triplet};
use crate::resolver::ResolutionError;
use crate::status::StatusDatabase;

/// Dependencies of `source` on `triplet` that are not installed yet.
///
/// Only immediate dependencies are checked. The result follows the order of
/// the filtered dependency list and holds no duplicates.
pub fn compute_missing(
    spec: &PackageSpec,
    source: &SourceParagraph,
    triplet: Triplet,
    status_db: &StatusDatabase,
) -> Result<Vec<PackageSpec>, ResolutionError> {
    let mut missing = Vec::new();

    for name in filter_dependencies(&source.depends, triplet) {
        let dep = PackageSpec::from_name_and_triplet(&name, triplet).map_err(|source| {
            ResolutionError::InvalidDependencyName {
                package: spec.clone(),
                dependency: name.clone(),
                source,
            }
        })?;

        if status_db.find_installed(dep.name(), triplet).is_none() {
            missing.push(dep);
        }
    }

    tracing::debug!("{} has {} missing dependencies", spec, missing.len());
    Ok(missing)
}
