//! Application catalog loading and validation.
//!
//! The catalog is a single TOML file declaring the shared storage folder,
//! the default sync strategy, and the tracked application profiles:
//!
//! ```toml
//! [storage]
//! directory = "~/Dropbox/confsync"
//! strategy  = "link"
//!
//! [[application]]
//! name  = "vim"
//! files = [".vimrc", ".vim"]
//! ```
pub mod applications;

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use applications::Application;

/// How the home copy of a tracked file relates to the stored copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// The home path becomes a symlink into the storage folder.
    #[default]
    Link,
    /// The home path stays an independent duplicate of the stored copy.
    Copy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => write!(f, "link"),
            Self::Copy => write!(f, "copy"),
        }
    }
}

/// All loaded configuration for one run.
#[derive(Debug)]
pub struct Config {
    /// Absolute path of the shared storage folder.
    pub storage: PathBuf,
    /// Default strategy for applications without an override.
    pub strategy: Strategy,
    /// Tracked application profiles, in declaration order.
    pub applications: Vec<Application>,
}

/// `[storage]` section as written in the catalog.
#[derive(Debug, Deserialize)]
struct StorageSection {
    directory: String,
    #[serde(default)]
    strategy: Strategy,
}

/// Top-level catalog schema.
#[derive(Debug, Deserialize)]
struct RawConfig {
    storage: Option<StorageSection>,
    #[serde(default, rename = "application")]
    applications: Vec<Application>,
}

impl Config {
    /// Default catalog location for a given home root.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".confsync.toml")
    }

    /// Load and validate the catalog at `path`.
    ///
    /// The storage directory may be written with a leading `~` or as a
    /// relative path; both resolve against `home`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing or unreadable, fails
    /// to parse, lacks a `[storage]` section, declares an empty file entry,
    /// or repeats an application name.
    pub fn load(path: &Path, home: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let parsed: RawConfig = toml::from_str(&raw).map_err(|e| ConfigError::InvalidSyntax {
            file: path.display().to_string(),
            message: e.message().to_string(),
        })?;

        let storage_section = parsed.storage.ok_or(ConfigError::MissingStorage)?;
        let storage = resolve_storage_dir(&storage_section.directory, home);

        validate_applications(&parsed.applications)?;

        Ok(Self {
            storage,
            strategy: storage_section.strategy,
            applications: parsed.applications,
        })
    }
}

/// Resolve the configured storage directory against the home root.
///
/// `~` and `~/...` expand to home; a bare relative path is rooted at home.
fn resolve_storage_dir(directory: &str, home: &Path) -> PathBuf {
    let home_str = home.to_string_lossy();
    let expanded = shellexpand::tilde_with_context(directory, || Some(&*home_str));
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        path
    } else {
        home.join(path)
    }
}

/// Reject empty file entries and duplicate application names.
fn validate_applications(applications: &[Application]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for app in applications {
        if !seen.insert(app.name.as_str()) {
            return Err(ConfigError::DuplicateApplication(app.name.clone()));
        }
        if app.files.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::EmptySpec(app.name.clone()));
        }
    }
    Ok(())
}
