//! Configuration file synchronization engine.
//!
//! Keeps a catalog of application configuration files in sync between the
//! user's home directory and a shared storage folder (e.g. a cloud-synced
//! directory) using symbolic links, so that edits in either location stay
//! consistent. Three operations are exposed: `backup` moves home files into
//! storage and links them back, `restore` links (or copies) stored files
//! into a fresh home, and `uninstall` reverts every tracked file to an
//! ordinary copy in the home directory.
//!
//! The public API is organised into five layers:
//!
//! - **[`config`]** — parse and validate the TOML application catalog
//! - **[`fsops`]** — side-effecting filesystem primitives (copy, delete, link)
//! - **[`engine`]** — per-file reconciliation: classify, decide, act
//! - **[`prompt`]** — the confirmation gate guarding destructive overwrites
//! - **[`commands`]** — top-level subcommand orchestration (`backup`, `restore`, `uninstall`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsops;
pub mod logging;
pub mod platform;
pub mod prompt;
