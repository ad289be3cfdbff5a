//! File specification resolution.
//!
//! Expands an application's file specifications — literal relative paths or
//! glob patterns — rooted at a source directory into concrete entries.
//! Non-existent files are legitimately included: presence is a per-file
//! reconciliation decision, not a resolution concern.
use std::path::{Component, Path, PathBuf};

use crate::config::Application;
use crate::error::EngineError;
use crate::fsops;

/// One tracked file, resolved for a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Absolute path on the side driving the operation
    /// (home for backup, storage for restore and uninstall).
    pub source: PathBuf,
    /// Absolute path on the receiving side.
    pub target: PathBuf,
    /// Path relative to its root, for display and the platform predicate.
    pub name: PathBuf,
}

/// Resolve an application's file specifications against a pair of roots.
///
/// Literal specs emit `(source_root/p, target_root/p, p)` without checking
/// existence.  Glob-enabled specs expand each pattern against `source_root`
/// and emit one entry per match.  Paths that exist are symlink-canonicalized
/// on the source side.  Ordering is stable for a single call on an
/// unchanged filesystem.
///
/// # Errors
///
/// Returns an error for a spec or match that escapes its root, an invalid
/// glob pattern, or an unreadable directory during expansion.
pub fn resolve(
    source_root: &Path,
    target_root: &Path,
    app: &Application,
) -> Result<Vec<ResolvedEntry>, EngineError> {
    let mut entries = Vec::new();
    for spec in &app.files {
        if app.glob {
            expand_pattern(source_root, target_root, spec, &mut entries)?;
        } else {
            let rel = PathBuf::from(spec);
            ensure_within_root(&rel)?;
            entries.push(ResolvedEntry {
                source: fsops::canonicalize_entry(source_root.join(&rel)),
                target: target_root.join(&rel),
                name: rel,
            });
        }
    }
    Ok(entries)
}

/// Expand one glob pattern and append an entry per match.
fn expand_pattern(
    source_root: &Path,
    target_root: &Path,
    spec: &str,
    entries: &mut Vec<ResolvedEntry>,
) -> Result<(), EngineError> {
    ensure_within_root(Path::new(spec))?;
    let pattern = source_root.join(spec);
    let matches =
        glob::glob(&pattern.to_string_lossy()).map_err(|source| EngineError::BadPattern {
            pattern: spec.to_string(),
            source,
        })?;

    for matched in matches {
        let matched = matched.map_err(|e| {
            let path = e.path().to_path_buf();
            EngineError::Io {
                path,
                source: e.into_error(),
            }
        })?;
        let rel = matched
            .strip_prefix(source_root)
            .map_err(|_| EngineError::OutsideRoot(matched.clone()))?
            .to_path_buf();
        ensure_within_root(&rel)?;
        entries.push(ResolvedEntry {
            source: fsops::canonicalize_entry(matched),
            target: target_root.join(&rel),
            name: rel,
        });
    }
    Ok(())
}

/// A relative name is never empty and never escapes its root.
fn ensure_within_root(rel: &Path) -> Result<(), EngineError> {
    if rel.as_os_str().is_empty() || rel.is_absolute() {
        return Err(EngineError::OutsideRoot(rel.to_path_buf()));
    }
    if rel
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        return Err(EngineError::OutsideRoot(rel.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn literal_specs_resolve_without_existence_checks() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::new("vim", &[".vimrc", ".vim"]);

        let entries = resolve(home.path(), storage.path(), &app).unwrap();

        assert_eq!(entries.len(), 2, "absent files are still resolved");
        assert_eq!(
            entries[0].source,
            fs::canonicalize(home.path()).unwrap().join(".vimrc")
        );
        assert_eq!(entries[0].target, storage.path().join(".vimrc"));
        assert_eq!(entries[0].name, PathBuf::from(".vimrc"));
    }

    #[test]
    fn literal_spec_preserves_subdirectories() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::new("git", &[".config/git/config"]);

        let entries = resolve(home.path(), storage.path(), &app).unwrap();

        assert_eq!(entries[0].target, storage.path().join(".config/git/config"));
        assert_eq!(entries[0].name, PathBuf::from(".config/git/config"));
    }

    #[test]
    fn glob_spec_emits_one_entry_per_match() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        fs::write(home.path().join(".profile_a"), b"a").unwrap();
        fs::write(home.path().join(".profile_b"), b"b").unwrap();
        fs::write(home.path().join(".unrelated"), b"c").unwrap();
        let app = Application::with_glob("shell", &[".profile_*"]);

        let mut entries = resolve(home.path(), storage.path(), &app).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, PathBuf::from(".profile_a"));
        assert_eq!(entries[1].name, PathBuf::from(".profile_b"));
        assert_eq!(entries[1].target, storage.path().join(".profile_b"));
    }

    #[test]
    fn glob_without_matches_is_empty_not_an_error() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::with_glob("shell", &[".nothing_*"]);

        let entries = resolve(home.path(), storage.path(), &app).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn glob_matches_directories() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        fs::create_dir(home.path().join(".vim")).unwrap();
        let app = Application::with_glob("vim", &[".vim"]);

        let entries = resolve(home.path(), storage.path(), &app).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, PathBuf::from(".vim"));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::new("evil", &["../outside"]);

        let err = resolve(home.path(), storage.path(), &app).unwrap_err();
        assert!(matches!(err, EngineError::OutsideRoot(_)), "got: {err}");
    }

    #[test]
    fn absolute_spec_is_rejected() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::new("evil", &["/etc/passwd"]);

        let err = resolve(home.path(), storage.path(), &app).unwrap_err();
        assert!(matches!(err, EngineError::OutsideRoot(_)), "got: {err}");
    }

    #[test]
    fn invalid_pattern_is_a_typed_error() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let app = Application::with_glob("bad", &["a["]);

        let err = resolve(home.path(), storage.path(), &app).unwrap_err();
        assert!(matches!(err, EngineError::BadPattern { .. }), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn existing_sources_are_canonicalized() {
        let home = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        fs::write(home.path().join(".vimrc"), b"x").unwrap();
        let app = Application::new("vim", &[".vimrc"]);

        let entries = resolve(home.path(), storage.path(), &app).unwrap();
        assert_eq!(
            entries[0].source,
            fs::canonicalize(home.path().join(".vimrc")).unwrap()
        );
    }
}
