//! Command-line entry point for the `confsync` configuration synchronization tool.

use anyhow::Result;
use clap::Parser;

use confsync_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.global.verbose, args.command.name());
    let log = logging::Logger::new();

    match &args.command {
        cli::Command::Backup(opts) => commands::backup::run(&args.global, opts, &log),
        cli::Command::Restore(opts) => commands::restore::run(&args.global, opts, &log),
        cli::Command::Uninstall(opts) => commands::uninstall::run(&args.global, opts, &log),
        cli::Command::Version => {
            let version = option_env!("CONFSYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("confsync {version}");
            Ok(())
        }
    }
}
