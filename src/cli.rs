//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the synchronization engine.
#[derive(Parser, Debug)]
#[command(
    name = "confsync",
    about = "Configuration file synchronization engine",
    version
)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Show full source/target paths and "doing nothing" decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the home directory root
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Path to the application catalog (default: <home>/.confsync.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Continue past entries that fail instead of aborting the run
    #[arg(long, global = true)]
    pub keep_going: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Back up configuration files into the storage folder
    Backup(SelectOpts),
    /// Restore backed-up files into the home directory
    Restore(SelectOpts),
    /// Revert every tracked file to an ordinary copy in home
    Uninstall(SelectOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short command name, used for log file naming.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Backup(_) => "backup",
            Self::Restore(_) => "restore",
            Self::Uninstall(_) => "uninstall",
            Self::Version => "version",
        }
    }
}

/// Application selection shared by the sync subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct SelectOpts {
    /// Only sync these applications
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these applications
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}
