//! Uninstall command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, SelectOpts};
use crate::engine::Operation;
use crate::logging::Log;

/// Run the uninstall command.
///
/// Reverts every tracked file to an ordinary copy in home so the storage
/// folder can be safely discarded afterwards.  This is the explicit,
/// user-initiated teardown: existing home entries are replaced without a
/// confirmation gate.
///
/// # Errors
///
/// Returns an error if setup fails or an entry fails under the active
/// error mode.
pub fn run(global: &GlobalOpts, opts: &SelectOpts, log: &dyn Log) -> Result<()> {
    super::run_sync(Operation::Uninstall, global, opts, log)
}
