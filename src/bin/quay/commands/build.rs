//! `quay build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::{report_build_result, Reported};
use crate::GlobalOptions;
use quay::builder::BuildContext;
use quay::ops::{build, BuildOptions, BuildOutcome};
use quay::util::shell::Status;
use quay::util::Diagnostic;

pub fn execute(args: BuildArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let gctx = &global_opts.gctx;

    let spec = global_opts.parse_spec(&args.spec)?;
    let ctx = BuildContext::from_global(gctx);

    let opts = BuildOptions {
        spec: spec.clone(),
        checks_only: args.checks_only,
    };

    match build(gctx, shell, &opts, &ctx)? {
        BuildOutcome::Checked { error_count: 0 } => {
            shell.status(Status::Finished, format!("post-build checks passed for {}", spec));
            Ok(())
        }
        BuildOutcome::Checked { error_count } => {
            shell.diagnostic(&Diagnostic::error(format!(
                "found {} error(s) in package {}",
                error_count, spec
            )));
            Err(Reported.into())
        }
        BuildOutcome::Built(result) => report_build_result(shell, &spec, &result),
    }
}
