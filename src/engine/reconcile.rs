//! The reconciliation decision core.
//!
//! One parameterized entry point ([`Reconciler::sync_entry`]) implements the
//! action tables of all three operations, so the tri-state logic — absent /
//! regular / symlink on each side — lives in exactly one place.
use anyhow::{Context as _, Result};
use std::fmt;
use std::path::PathBuf;

use crate::config::{Application, Strategy};
use crate::fsops;
use crate::logging::Log;
use crate::platform::Platform;
use crate::prompt::Confirm;

use super::Operation;
use super::resolver::{self, ResolvedEntry};
use super::state::{self, NodeState};

/// Per-file result of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was transferred (backed up, restored, or reverted).
    Synced,
    /// A transfer was decided but suppressed by dry-run mode.
    DryRun,
    /// Both sides already agree; nothing to do.
    AlreadySynced,
    /// The user declined the overwrite confirmation; the file was skipped.
    Declined,
    /// The side driving the operation does not exist.
    Missing,
    /// The home path is a broken symlink and was left alone.
    BrokenLink,
    /// The path cannot be synced on the current platform.
    Unsupported,
    /// The entry failed and the run continued ([`ErrorMode::Continue`]).
    Failed,
}

/// What to do when an entry fails.
///
/// The engine historically aborted on the first failure; `Continue` is the
/// explicit opt-out for batch tooling that prefers to see every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the run on the first failing entry.
    #[default]
    FailFast,
    /// Record [`Outcome::Failed`] and proceed with the next entry.
    Continue,
}

/// Tunable knobs for a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Decide and report, but never mutate the filesystem.
    pub dry_run: bool,
    /// Report full source/target paths instead of relative names.
    pub verbose: bool,
    /// Default strategy for applications without an override.
    pub strategy: Strategy,
    /// Behaviour when an entry fails.
    pub error_mode: ErrorMode,
}

/// The reconciliation engine for one run.
///
/// Holds the two roots explicitly — the engine never consults ambient state,
/// so tests drive it against synthetic home and storage directories.
pub struct Reconciler<'a> {
    home: PathBuf,
    storage: PathBuf,
    platform: Platform,
    opts: SyncOptions,
    gate: &'a mut dyn Confirm,
    log: &'a dyn Log,
}

impl fmt::Debug for Reconciler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("home", &self.home)
            .field("storage", &self.storage)
            .field("platform", &self.platform)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl<'a> Reconciler<'a> {
    /// Create an engine over the given roots.
    pub fn new(
        home: PathBuf,
        storage: PathBuf,
        platform: Platform,
        opts: SyncOptions,
        gate: &'a mut dyn Confirm,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            home,
            storage,
            platform,
            opts,
            gate,
            log,
        }
    }

    /// Back up one application's tracked files into the storage folder.
    ///
    /// # Errors
    ///
    /// Returns an error on resolution failure, or on the first failing entry
    /// under [`ErrorMode::FailFast`].
    pub fn backup(&mut self, app: &Application) -> Result<Vec<Outcome>> {
        let entries = resolver::resolve(&self.home, &self.storage, app)?;
        self.run(Operation::Backup, app, &entries)
    }

    /// Restore one application's stored files into the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error on resolution failure, or on the first failing entry
    /// under [`ErrorMode::FailFast`].
    pub fn restore(&mut self, app: &Application) -> Result<Vec<Outcome>> {
        let entries = resolver::resolve(&self.storage, &self.home, app)?;
        self.run(Operation::Restore, app, &entries)
    }

    /// Revert one application's tracked files to plain copies in home.
    ///
    /// # Errors
    ///
    /// Returns an error on resolution failure, or on the first failing entry
    /// under [`ErrorMode::FailFast`].
    pub fn uninstall(&mut self, app: &Application) -> Result<Vec<Outcome>> {
        let entries = resolver::resolve(&self.storage, &self.home, app)?;
        self.run(Operation::Uninstall, app, &entries)
    }

    /// Process every resolved entry sequentially, applying the error mode.
    fn run(
        &mut self,
        op: Operation,
        app: &Application,
        entries: &[ResolvedEntry],
    ) -> Result<Vec<Outcome>> {
        let strategy = app.strategy.unwrap_or(self.opts.strategy);
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.sync_entry(op, entry, strategy) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => match self.opts.error_mode {
                    ErrorMode::FailFast => {
                        return Err(e.context(format!(
                            "{}: {}",
                            app.name,
                            entry.name.display()
                        )));
                    }
                    ErrorMode::Continue => {
                        self.log
                            .error(&format!("{}: {e:#}", entry.name.display()));
                        outcomes.push(Outcome::Failed);
                    }
                },
            }
        }
        Ok(outcomes)
    }

    /// Decide and execute the action for a single entry.
    ///
    /// `entry.source` is the side driving the operation (home for backup,
    /// storage for restore and uninstall); `entry.target` is the receiving
    /// side.  The decision sequence is shared by all operations:
    /// platform gate → source presence → already-linked short-circuit →
    /// announce → dry-run stop → conflict gate → transfer.
    fn sync_entry(
        &mut self,
        op: Operation,
        entry: &ResolvedEntry,
        strategy: Strategy,
    ) -> Result<Outcome> {
        // Restore must not touch paths that are meaningless on this platform.
        if op == Operation::Restore && !self.platform.can_sync(&entry.name) {
            self.log.debug(&format!(
                "Doing nothing\n  {}\n  is not supported on this platform",
                entry.target.display()
            ));
            return Ok(Outcome::Unsupported);
        }

        let source_state = state::classify(&entry.source)?;
        if !source_state.has_content() {
            return Ok(self.report_noop(op, entry, &source_state));
        }

        // Short-circuit when home already links into storage.
        if op != Operation::Uninstall && self.already_linked(op, entry)? {
            self.report_already_linked(op, entry);
            return Ok(Outcome::AlreadySynced);
        }

        self.report_action(op, entry);
        if self.opts.dry_run {
            return Ok(Outcome::DryRun);
        }

        // Conflict gate: an existing target is only replaced with consent.
        // Uninstall is the user-initiated teardown and replaces outright.
        let target_state = state::classify(&entry.target)?;
        if !target_state.is_absent() {
            if op.confirms_overwrite() && !self.gate.confirm(&overwrite_prompt(op, entry)) {
                return Ok(Outcome::Declined);
            }
            fsops::delete(&entry.target)
                .with_context(|| format!("replacing {}", entry.target.display()))?;
        }

        self.transfer(op, entry, strategy)?;
        Ok(Outcome::Synced)
    }

    /// Whether the home side is a symlink resolving to the same underlying
    /// entry as its counterpart.
    ///
    /// The identity primitive compares device and inode on Unix, so a link
    /// whose chain ends at a hard link of the stored file also counts.
    fn already_linked(&self, op: Operation, entry: &ResolvedEntry) -> Result<bool> {
        let (home_side, counterpart) = match op {
            Operation::Backup => (&entry.source, &entry.target),
            Operation::Restore | Operation::Uninstall => (&entry.target, &entry.source),
        };
        let home_state = state::classify(home_side)?;
        Ok(
            matches!(home_state, NodeState::Symlink { resolved: Some(_) })
                && fsops::same_entry(home_side, counterpart),
        )
    }

    /// Perform the strategy-dependent transfer for an entry with no
    /// remaining obstacles.
    fn transfer(&self, op: Operation, entry: &ResolvedEntry, strategy: Strategy) -> Result<()> {
        match op {
            Operation::Backup => match strategy {
                Strategy::Link => {
                    fsops::copy(&entry.source, &entry.target)?;
                    fsops::delete(&entry.source)?;
                    fsops::link(&entry.target, &entry.source)?;
                }
                Strategy::Copy => fsops::copy(&entry.source, &entry.target)?,
            },
            Operation::Restore => match strategy {
                Strategy::Link => fsops::link(&entry.source, &entry.target)?,
                Strategy::Copy => fsops::copy(&entry.source, &entry.target)?,
            },
            // Uninstall always materialises a plain copy in home.
            Operation::Uninstall => fsops::copy(&entry.source, &entry.target)?,
        }
        Ok(())
    }

    /// Announce the decided action, terse or with full paths.
    fn report_action(&self, op: Operation, entry: &ResolvedEntry) {
        if self.opts.verbose {
            let line = match op {
                Operation::Backup => format!(
                    "Backing up\n  {}\n  to\n  {} ...",
                    entry.source.display(),
                    entry.target.display()
                ),
                Operation::Restore => format!(
                    "Restoring\n  linking {}\n  to      {} ...",
                    entry.target.display(),
                    entry.source.display()
                ),
                Operation::Uninstall => format!(
                    "Reverting {}\n  at {} ...",
                    entry.source.display(),
                    entry.target.display()
                ),
            };
            self.log.info(&line);
        } else {
            self.log
                .info(&format!("{} {} ...", op.verb(), entry.name.display()));
        }
    }

    /// Report a no-op caused by the driving side holding no content.
    fn report_noop(&self, op: Operation, entry: &ResolvedEntry, source: &NodeState) -> Outcome {
        match op {
            Operation::Backup => {
                if matches!(source, NodeState::Symlink { resolved: None }) {
                    self.log.debug(&format!(
                        "Doing nothing\n  {}\n  is a broken link, you might want to fix it.",
                        entry.source.display()
                    ));
                    Outcome::BrokenLink
                } else {
                    self.log.debug(&format!(
                        "Doing nothing\n  {}\n  does not exist",
                        entry.source.display()
                    ));
                    Outcome::Missing
                }
            }
            Operation::Restore => {
                self.log.debug(&format!(
                    "Doing nothing\n  {}\n  does not exist",
                    entry.source.display()
                ));
                Outcome::Missing
            }
            Operation::Uninstall => {
                self.log.debug(&format!(
                    "Doing nothing, {} does not exist",
                    entry.source.display()
                ));
                Outcome::Missing
            }
        }
    }

    /// Report the already-linked short-circuit.
    fn report_already_linked(&self, op: Operation, entry: &ResolvedEntry) {
        match op {
            Operation::Backup => self.log.debug(&format!(
                "Doing nothing\n  {}\n  is already backed up to\n  {}",
                entry.source.display(),
                entry.target.display()
            )),
            Operation::Restore | Operation::Uninstall => self.log.debug(&format!(
                "Doing nothing\n  {}\n  already linked by\n  {}",
                entry.source.display(),
                entry.target.display()
            )),
        }
    }
}

/// The confirmation text shown before replacing an existing target.
fn overwrite_prompt(op: Operation, entry: &ResolvedEntry) -> String {
    let kind = state::kind_of(&entry.target);
    match op {
        Operation::Backup => format!(
            "A {kind} named {} already exists in the backup.\nAre you sure that you want to replace it?",
            entry.target.display()
        ),
        Operation::Restore | Operation::Uninstall => format!(
            "You already have a {kind} named {} in your home.\nDo you want to replace it with your backup?",
            entry.name.display()
        ),
    }
}
