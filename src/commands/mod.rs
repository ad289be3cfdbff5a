//! Top-level subcommand orchestration.
pub mod backup;
pub mod restore;
pub mod uninstall;

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::cli::{GlobalOpts, SelectOpts};
use crate::config::{Application, Config};
use crate::engine::{ErrorMode, Operation, Outcome, Reconciler, SyncOptions};
use crate::logging::Log;
use crate::platform::Platform;
use crate::prompt::TermConfirm;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates home resolution, platform detection, and catalog loading so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved home root.
    pub home: PathBuf,
    /// Detected platform.
    pub platform: Platform,
    /// Loaded catalog.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the home root, detect the platform, and load the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or the
    /// catalog fails to load or validate.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let home = resolve_home(global)?;
        let platform = Platform::detect();

        log.stage("Loading configuration");
        let catalog_path = global
            .config
            .clone()
            .unwrap_or_else(|| Config::default_path(&home));
        let config = Config::load(&catalog_path, &home)?;

        log.debug(&format!("home: {}", home.display()));
        log.debug(&format!("strategy: {}", config.strategy));
        log.info(&format!(
            "storage folder: {} ({} applications tracked)",
            config.storage.display(),
            config.applications.len()
        ));

        Ok(Self {
            home,
            platform,
            config,
        })
    }
}

/// Resolve the home root from `--home` or the environment.
///
/// Deliberately reads the `HOME` variable (`USERPROFILE` on Windows) rather
/// than any "current user" OS API, so isolated test environments can
/// substitute a fake home directory.
///
/// # Errors
///
/// Returns an error when neither the flag nor the environment provides a
/// home directory.
pub fn resolve_home(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(home) = &global.home {
        return Ok(home.clone());
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory: HOME is not set"))
}

/// Filter the catalog's applications by `--only` / `--skip`.
///
/// # Errors
///
/// Returns an error when a selection names an application the catalog does
/// not declare, which is almost certainly a typo worth surfacing.
fn select_applications<'a>(
    config: &'a Config,
    opts: &SelectOpts,
) -> Result<Vec<&'a Application>> {
    for name in opts.only.iter().chain(&opts.skip) {
        if !config.applications.iter().any(|a| &a.name == name) {
            bail!("unknown application '{name}' in selection");
        }
    }
    Ok(config
        .applications
        .iter()
        .filter(|a| opts.only.is_empty() || opts.only.contains(&a.name))
        .filter(|a| !opts.skip.contains(&a.name))
        .collect())
}

/// Run one sync operation over the selected applications.
///
/// This is the orchestrator: applications are processed in catalog order,
/// files strictly sequentially within each, and every decision is printed
/// as the loop proceeds.  There is no end-of-run summary; with
/// `--keep-going` a failure count is reported at the end instead of the
/// first error aborting the run.
///
/// # Errors
///
/// Returns an error on setup failure, on the first failing entry (default),
/// or with the failure count under `--keep-going`.
pub fn run_sync(
    op: Operation,
    global: &GlobalOpts,
    opts: &SelectOpts,
    log: &dyn Log,
) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let selected = select_applications(&setup.config, opts)?;

    if global.dry_run {
        log.dry_run("no changes will be made");
    } else if op == Operation::Backup {
        std::fs::create_dir_all(&setup.config.storage)?;
    }

    let sync_opts = SyncOptions {
        dry_run: global.dry_run,
        verbose: global.verbose,
        strategy: setup.config.strategy,
        error_mode: if global.keep_going {
            ErrorMode::Continue
        } else {
            ErrorMode::FailFast
        },
    };

    let mut gate = TermConfirm;
    let mut reconciler = Reconciler::new(
        setup.home,
        setup.config.storage.clone(),
        setup.platform,
        sync_opts,
        &mut gate,
        log,
    );

    let mut failed = 0usize;
    for app in selected {
        log.debug(&format!("application: {}", app.name));
        let outcomes = match op {
            Operation::Backup => reconciler.backup(app)?,
            Operation::Restore => reconciler.restore(app)?,
            Operation::Uninstall => reconciler.uninstall(app)?,
        };
        failed += outcomes.iter().filter(|o| **o == Outcome::Failed).count();
    }

    if failed > 0 {
        bail!("{failed} file(s) failed");
    }
    Ok(())
}
