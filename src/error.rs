//! Domain-specific error types for the synchronization engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors ([`ConfigError`], [`EngineError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfsyncError
//! ├── Config(ConfigError) — catalog parsing, storage resolution
//! └── Engine(EngineError) — node classification, path resolution
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the synchronization engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum ConfsyncError {
    /// Configuration-related error (parsing, catalog validation, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reconciliation error (classification, path resolution).
    #[error("Sync error: {0}")]
    Engine(#[from] EngineError),
}

/// Errors that arise from loading and validating the application catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The catalog file does not exist.
    #[error("No catalog found at {0}; create one to declare tracked applications")]
    Missing(PathBuf),

    /// The catalog contains a TOML syntax or schema error.
    #[error("Invalid catalog {file}: {message}")]
    InvalidSyntax {
        /// Path of the file that failed to parse.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An application declares an empty file specification.
    #[error("Application '{0}' declares an empty file entry")]
    EmptySpec(String),

    /// Two application profiles share the same name.
    #[error("Duplicate application '{0}' in catalog")]
    DuplicateApplication(String),

    /// The catalog has no `[storage]` section.
    #[error("Catalog is missing the [storage] section")]
    MissingStorage,

    /// An I/O error occurred while reading the catalog.
    #[error("IO error reading catalog {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise during per-file reconciliation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A path exists but is neither a file, a directory, nor a symlink.
    ///
    /// Classification is load-bearing for every downstream decision, so
    /// there is no recovery path for the affected entry.
    #[error("Unsupported node type: {0}")]
    UnsupportedNode(PathBuf),

    /// A file specification resolves outside its root directory.
    #[error("Path escapes its root: {0}")]
    OutsideRoot(PathBuf),

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    BadPattern {
        /// The offending pattern as written in the catalog.
        pattern: String,
        /// Underlying pattern compilation error.
        source: glob::PatternError,
    },

    /// An I/O error occurred while inspecting a path.
    #[error("IO error inspecting {path}: {source}")]
    Io {
        /// Path that could not be inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
