//! `quay list` command

use anyhow::Result;
use serde_json::json;

use crate::cli::ListArgs;
use crate::GlobalOptions;
use quay::ops::{format_entry, list_installed};

pub fn execute(args: ListArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;

    let packages: Vec<_> = list_installed(&global_opts.gctx)?
        .into_iter()
        .filter(|pgh| {
            args.filter
                .as_deref()
                .map_or(true, |filter| pgh.spec.name().contains(filter))
        })
        .collect();

    if packages.is_empty() {
        shell.note("no packages are installed");
        return Ok(());
    }

    for pgh in &packages {
        shell.print(format_entry(pgh));
        shell.json_event(&json!({
            "reason": "installed-package",
            "spec": pgh.spec.to_string(),
            "version": pgh.version,
        }));
    }
    Ok(())
}
