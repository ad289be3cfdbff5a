//! Restore command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, SelectOpts};
use crate::engine::Operation;
use crate::logging::Log;

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if setup fails or an entry fails under the active
/// error mode.
pub fn run(global: &GlobalOpts, opts: &SelectOpts, log: &dyn Log) -> Result<()> {
    super::run_sync(Operation::Restore, global, opts, log)
}
