//! Implementation of `quay install`.

use anyhow::{Context, Result};

use crate::builder::{build_package, BuildContext, BuildEvent, ExtendedBuildResult};
use crate::core::PackageSpec;
use crate::ops::ports::PortsDir;
use crate::ops::status::database_load_check;
use crate::resolver::{create_install_plan, InstallPlanAction};
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// What `quay install` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    /// Specs built and recorded, in build order.
    pub built: Vec<PackageSpec>,
    /// Requested specs that were installed already.
    pub already_installed: Vec<PackageSpec>,
    /// The build that stopped the install, if any.
    pub failed: Option<(PackageSpec, ExtendedBuildResult)>,
}

impl InstallSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }
}

/// Install `specs` and everything they depend on.
///
/// Builds run in plan order and stop at the first one that does not
/// succeed.
pub fn install(
    gctx: &GlobalContext,
    shell: &Shell,
    specs: &[PackageSpec],
    ctx: &BuildContext,
) -> Result<InstallSummary> {
    for spec in specs {
        gctx.check_triplet(spec.triplet())?;
    }

    let ports = PortsDir::new(gctx.ports_dir());
    let status_db = database_load_check(gctx)?;

    shell.status(Status::Planning, format!("{} package(s)", specs.len()));
    let plan = create_install_plan(specs, &ports, &status_db)?;

    let mut summary = InstallSummary::default();
    for action in plan {
        match action {
            InstallPlanAction::AlreadyInstalled { spec } => {
                shell.status(Status::Skipped, format!("{} is already installed", spec));
                summary.already_installed.push(spec);
            }
            InstallPlanAction::BuildFromSource { spec, source } => {
                shell.status(Status::Building, &spec);
                shell.emit(&BuildEvent::started(&spec));

                let result =
                    build_package(&source, &spec, &ports.port_dir(spec.name()), &status_db, ctx)
                        .with_context(|| format!("failed to build {}", spec))?;

                shell.emit(&BuildEvent::finished(&spec, &result));
                if !result.is_success() {
                    summary.failed = Some((spec, result));
                    break;
                }

                shell.status(Status::Installed, format!("{} {}", spec, source.version));
                summary.built.push(spec);
            }
        }
    }

    Ok(summary)
}
