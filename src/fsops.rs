//! Side-effecting filesystem primitives: copy, delete, link.
//!
//! These are the only functions in the crate that mutate the filesystem.
//! Regular-file copies are staged to a sibling temp path and renamed into
//! place, so a crash mid-copy cannot leave a half-written file under the
//! final name.  Deletion never follows a symlink to its target.
use anyhow::{Context as _, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Copy `src` to `dst`, recursively for directories.
///
/// Intermediate directories at `dst` are created as needed.  Symlinks within
/// a source tree are followed and their content materialised rather than
/// copying the link itself.  Regular files are staged to a sibling temp path
/// and renamed into place.
///
/// # Errors
///
/// Returns an error if any directory cannot be created or any file cannot
/// be copied; partial progress is reported, never silently swallowed.
pub fn copy(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent_dir(dst)?;
    if src.is_dir() {
        copy_dir_staged(src, dst)
    } else {
        copy_file_staged(src, dst)
    }
}

/// Copy a regular file: stage to a temp sibling, rename the temp file into
/// place.  The rename keeps the window where `dst` is incomplete invisible
/// under its final name.
fn copy_file_staged(src: &Path, dst: &Path) -> Result<()> {
    // Use a sibling temp name to keep the rename on the same filesystem.
    let tmp = dst.with_extension("confsync_tmp");
    fs::copy(src, &tmp).with_context(|| format!("copy {} to {}", src.display(), tmp.display()))?;

    if let Err(e) = fs::rename(&tmp, dst) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("rename {} to {}", tmp.display(), dst.display()));
    }
    Ok(())
}

/// Copy a directory: stage into a sibling temp directory, then rename the
/// temp directory into place.  Falls back to a plain copy when the rename
/// crosses a filesystem boundary (EXDEV).
fn copy_dir_staged(src: &Path, dst: &Path) -> Result<()> {
    let parent = dst.parent().unwrap_or_else(|| Path::new("."));
    let stem = dst.file_name().map_or_else(
        || "confsync_tmp".to_string(),
        |n| format!("{}_confsync_tmp", n.to_string_lossy()),
    );
    let tmp = parent.join(&stem);

    let cleanup_dir = || {
        let _ = fs::remove_dir_all(&tmp);
    };

    if let Err(e) = copy_dir_recursive(src, &tmp) {
        cleanup_dir();
        return Err(e)
            .with_context(|| format!("recursive copy {} to {}", src.display(), tmp.display()));
    }

    // Prefer atomic rename; fall back to copy+delete on cross-filesystem move.
    if fs::rename(&tmp, dst).is_err() {
        if let Err(e) = copy_dir_recursive(&tmp, dst) {
            cleanup_dir();
            return Err(e)
                .with_context(|| format!("cross-fs copy {} to {}", tmp.display(), dst.display()));
        }
        fs::remove_dir_all(&tmp).with_context(|| format!("remove tmp dir: {}", tmp.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are *followed*: the function uses
/// [`Path::is_dir`] (which follows symlinks) so directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Remove a file, a directory tree, or a symlink itself.
///
/// A symlink is removed as a link — its target is never touched.
///
/// # Errors
///
/// Returns an error if `path` does not exist or cannot be removed.
pub fn delete(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if meta.is_symlink() {
        remove_symlink(path, &meta)
    } else if meta.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("removing tree: {}", path.display()))
    } else {
        fs::remove_file(path).with_context(|| format!("removing file: {}", path.display()))
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`).  Rust's `symlink_metadata().is_dir()` returns `false` for
/// symlinks, so we check the raw `FILE_ATTRIBUTE_DIRECTORY` flag to detect
/// directory symlinks.
fn remove_symlink(path: &Path, meta: &fs::Metadata) -> Result<()> {
    if is_dir_like(meta) {
        fs::remove_dir(path).with_context(|| format!("removing dir link: {}", path.display()))
    } else {
        fs::remove_file(path).with_context(|| format!("removing link: {}", path.display()))
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Create a symbolic link at `link_path` pointing to `original`.
///
/// Fails if `link_path` already exists — callers must [`delete`] first.
/// Replacing unknown content implicitly is exactly what the confirmation
/// gate exists to prevent.
///
/// # Errors
///
/// Returns an error if `link_path` exists or the link cannot be created.
pub fn link(original: &Path, link_path: &Path) -> Result<()> {
    if link_path.symlink_metadata().is_ok() {
        bail!("link path already exists: {}", link_path.display());
    }
    ensure_parent_dir(link_path)?;
    create_symlink(original, link_path).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link_path.display(),
            original.display()
        )
    })
}

#[cfg(unix)]
fn create_symlink(original: &Path, link_path: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link_path)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link_path: &Path) -> std::io::Result<()> {
    if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link_path)
    } else {
        std::os::windows::fs::symlink_file(original, link_path)
    }
}

/// Whether `a` and `b` resolve to the same underlying filesystem entry.
///
/// On Unix this compares device and inode numbers after following symlinks,
/// so two hard-linked names compare equal even without a symlink between
/// them.  Elsewhere it falls back to canonicalized-path equality.  Returns
/// `false` when either path does not resolve.
#[cfg(unix)]
#[must_use]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt as _;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

/// Whether `a` and `b` resolve to the same underlying filesystem entry.
///
/// Canonicalized-path equality ([`dunce`] keeps Windows paths free of the
/// `\\?\` prefix).  Returns `false` when either path does not resolve.
#[cfg(not(unix))]
#[must_use]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// Canonicalize the directory portion of `path`, leaving the final
/// component untouched.
///
/// The engine must still be able to observe a symlink *at* the path itself
/// (that is how "already backed up" is detected), so only the base is
/// resolved.  Non-existent paths are legitimate inputs (a file may exist on
/// only one side), so resolution failure returns the path unchanged.
#[must_use]
pub fn canonicalize_entry(path: PathBuf) -> PathBuf {
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(resolved) = dunce::canonicalize(parent)
    {
        return resolved.join(name);
    }
    path
}
