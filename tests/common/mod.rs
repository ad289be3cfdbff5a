// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed pair of home/storage roots and a
// fluent set of filesystem helpers so each integration test can set up an
// isolated environment without repeating boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use confsync_cli::engine::{Reconciler, SyncOptions};
use confsync_cli::logging::Log;
use confsync_cli::platform::{Os, Platform};
use confsync_cli::prompt::Confirm;

/// Isolated home and storage roots backed by [`tempfile::TempDir`]s.
///
/// Both directories are automatically deleted when dropped.
pub struct SyncFixture {
    /// Synthetic home directory.
    pub home: tempfile::TempDir,
    /// Synthetic shared storage folder.
    pub storage: tempfile::TempDir,
}

impl SyncFixture {
    /// Create a fresh pair of empty roots.
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create home dir"),
            storage: tempfile::tempdir().expect("create storage dir"),
        }
    }

    /// Path of the home root.
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Path of the storage root.
    pub fn storage(&self) -> &Path {
        self.storage.path()
    }

    /// Absolute home path for a relative name.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    /// Absolute storage path for a relative name.
    pub fn storage_path(&self, rel: &str) -> PathBuf {
        self.storage.path().join(rel)
    }

    /// Write a file under home, creating parent directories.
    pub fn write_home(&self, rel: &str, contents: &str) {
        write_file(&self.home_path(rel), contents);
    }

    /// Write a file under storage, creating parent directories.
    pub fn write_storage(&self, rel: &str, contents: &str) {
        write_file(&self.storage_path(rel), contents);
    }

    /// Build an engine over the fixture's roots with a fixed Linux platform,
    /// so platform-predicate behaviour does not depend on the host OS.
    pub fn engine<'a>(
        &self,
        opts: SyncOptions,
        gate: &'a mut dyn Confirm,
        log: &'a dyn Log,
    ) -> Reconciler<'a> {
        Reconciler::new(
            self.home.path().to_path_buf(),
            self.storage.path().to_path_buf(),
            Platform::new(Os::Linux),
            opts,
            gate,
            log,
        )
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

/// Whether the path is a symlink (without following it).
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_symlink())
}

/// Whether the path is a regular file (without following links).
pub fn is_regular_file(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_file())
}

/// A confirmation gate that replays a fixed list of answers and records
/// every prompt it was shown.
///
/// Once the answers run out it declines, matching the engine's default-no
/// behaviour on end of input.
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    /// Every prompt shown, in order.
    pub prompts: Vec<String>,
}

impl ScriptedConfirm {
    /// Create a gate that will answer with `answers` in order.
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            prompts: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// A confirmation gate that fails the test if it is ever consulted.
pub struct PanicConfirm;

impl Confirm for PanicConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        panic!("confirmation gate must not be consulted, got prompt: {prompt}");
    }
}

/// Byte-for-byte snapshot of a directory tree, for dry-run purity checks.
///
/// Each line records the relative path, the node kind, and either the file
/// contents or the raw link target.  Lines are sorted, so two snapshots of
/// identical trees compare equal regardless of directory iteration order.
pub fn tree_snapshot(root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    collect_tree(root, root, &mut lines);
    lines.sort();
    lines
}

fn collect_tree(root: &Path, dir: &Path, lines: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read dir") {
        let entry = entry.expect("dir entry");
        let path = entry.path();
        let rel = path.strip_prefix(root).expect("under root").to_path_buf();
        let meta = path.symlink_metadata().expect("symlink metadata");
        if meta.is_symlink() {
            let target = fs::read_link(&path).expect("read link");
            lines.push(format!("l {} -> {}", rel.display(), target.display()));
        } else if meta.is_dir() {
            lines.push(format!("d {}", rel.display()));
            collect_tree(root, &path, lines);
        } else {
            let contents = fs::read(&path).expect("read file");
            lines.push(format!(
                "f {} {}",
                rel.display(),
                String::from_utf8_lossy(&contents)
            ));
        }
    }
}
