//! `quay install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use crate::commands::report_build_result;
use crate::GlobalOptions;
use quay::builder::BuildContext;
use quay::ops::install;
use quay::util::shell::Status;

pub fn execute(args: InstallArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let gctx = &global_opts.gctx;

    let specs = args
        .specs
        .iter()
        .map(|text| global_opts.parse_spec(text))
        .collect::<Result<Vec<_>>>()?;
    let ctx = BuildContext::from_global(gctx);

    let summary = install(gctx, shell, &specs, &ctx)?;

    if let Some((spec, result)) = &summary.failed {
        return report_build_result(shell, spec, result);
    }

    shell.status(
        Status::Finished,
        format!(
            "{} built, {} already installed",
            summary.built.len(),
            summary.already_installed.len()
        ),
    );
    Ok(())
}
