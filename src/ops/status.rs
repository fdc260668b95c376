//! Loading the status database for a command.

use crate::status::{StatusDatabase, StatusError};
use crate::util::GlobalContext;

/// Load the status database, refusing one that holds interrupted installs.
pub fn database_load_check(gctx: &GlobalContext) -> Result<StatusDatabase, StatusError> {
    let (db, report) = StatusDatabase::load(gctx.status_store())?;
    warn_skipped(report.skipped);

    if !report.half_installed.is_empty() {
        return Err(StatusError::Inconsistent {
            specs: report.half_installed,
        });
    }
    Ok(db)
}

/// Load the status database as-is, interrupted installs included.
///
/// Used by `remove`, which is how interrupted installs get cleaned up.
pub fn database_load_lenient(gctx: &GlobalContext) -> Result<StatusDatabase, StatusError> {
    let (db, report) = StatusDatabase::load(gctx.status_store())?;
    warn_skipped(report.skipped);

    for spec in &report.half_installed {
        tracing::warn!("{} is half-installed", spec);
    }
    Ok(db)
}

fn warn_skipped(skipped: usize) {
    if skipped > 0 {
        tracing::warn!("skipped {} unreadable status entries", skipped);
    }
}
