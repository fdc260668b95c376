//! Implementation of `quay remove`.

use anyhow::{bail, Result};

use crate::builder::BuildEvent;
use crate::core::PackageSpec;
use crate::ops::status::database_load_lenient;
use crate::status::InstallState;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::shell::{Shell, Status};
use crate::util::{Diagnostic, GlobalContext};

/// Remove an installed or half-installed spec and its package directory.
pub fn remove(gctx: &GlobalContext, shell: &Shell, spec: &PackageSpec) -> Result<()> {
    let status_db = database_load_lenient(gctx)?;

    match status_db.state_of(spec) {
        InstallState::NotInstalled => bail!("package {} is not installed", spec),
        InstallState::HalfInstalled => shell.diagnostic(&Diagnostic::warning(format!(
            "{} was only half-installed; removing what is left of it",
            spec
        ))),
        InstallState::Installed => tracing::debug!("removing {}", spec),
    }

    status_db.mark_not_installed(spec)?;
    remove_dir_all_if_exists(&gctx.packages_dir().join(spec.install_dir_name()))?;

    shell.status(Status::Removed, spec);
    shell.emit(&BuildEvent::removed(spec));
    Ok(())
}
