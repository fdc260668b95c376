//! Implementation of `quay build`.

use anyhow::{bail, Context, Result};

use crate::builder::{build_package, BuildContext, BuildEvent, ExtendedBuildResult};
use crate::core::PackageSpec;
use crate::ops::ports::PortsDir;
use crate::ops::status::database_load_check;
use crate::resolver::PortProvider;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// The spec to build
    pub spec: PackageSpec,

    /// Only run the post-build checks against an existing package
    pub checks_only: bool,
}

/// What `quay build` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// `--checks-only`: the number of post-build errors found.
    Checked { error_count: usize },
    /// A full build attempt.
    Built(ExtendedBuildResult),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            BuildOutcome::Checked { error_count } => *error_count == 0,
            BuildOutcome::Built(result) => result.is_success(),
        }
    }
}

/// Build one spec, requiring its dependencies to be installed already.
pub fn build(
    gctx: &GlobalContext,
    shell: &Shell,
    opts: &BuildOptions,
    ctx: &BuildContext,
) -> Result<BuildOutcome> {
    let spec = &opts.spec;
    gctx.check_triplet(spec.triplet())?;

    if opts.checks_only {
        let error_count = ctx.lint.check(spec);
        return Ok(BuildOutcome::Checked { error_count });
    }

    let ports = PortsDir::new(gctx.ports_dir());
    let source = match ports.load_port(spec.name())? {
        Some(source) => source,
        None => bail!(
            "no port named `{}` in {}",
            spec.name(),
            ports.dir().display()
        ),
    };
    if source.name != spec.name() {
        bail!(
            "port directory `{}` declares `Source: {}`",
            spec.name(),
            source.name
        );
    }

    let status_db = database_load_check(gctx)?;

    shell.status(Status::Building, spec);
    shell.emit(&BuildEvent::started(spec));

    let result = build_package(&source, spec, &ports.port_dir(spec.name()), &status_db, ctx)
        .with_context(|| format!("failed to build {}", spec))?;

    shell.emit(&BuildEvent::finished(spec, &result));
    if result.is_success() {
        shell.status(Status::Built, format!("{} {}", spec, source.version));
    }

    Ok(BuildOutcome::Built(result))
}
