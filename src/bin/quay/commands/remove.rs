//! `quay remove` command

use anyhow::Result;

use crate::cli::RemoveArgs;
use crate::GlobalOptions;
use quay::ops::remove;

pub fn execute(args: RemoveArgs, global_opts: &GlobalOptions) -> Result<()> {
    let spec = global_opts.parse_spec(&args.spec)?;
    remove(&global_opts.gctx, &global_opts.shell, &spec)
}
