//! Filesystem node classification.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Classification of a filesystem path at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    /// Nothing exists at the path.
    Absent,
    /// A regular file or directory.
    Regular {
        /// Whether the node is a directory.
        dir: bool,
    },
    /// A symbolic link, with its fully resolved target when it resolves.
    ///
    /// A broken link carries `None`.
    Symlink {
        /// Final resolution of the link chain, if any.
        resolved: Option<PathBuf>,
    },
}

impl NodeState {
    /// Whether the path holds real content (a regular node, or a link that
    /// resolves to one).
    #[must_use]
    pub const fn has_content(&self) -> bool {
        matches!(
            self,
            Self::Regular { .. } | Self::Symlink { resolved: Some(_) }
        )
    }

    /// Whether nothing exists at the path (a broken link still *exists*).
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Classify the node at `path` without following a leading symlink.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedNode`] when the path exists but is
/// neither a file, a directory, nor a symlink (fifo, socket, device).  The
/// classification is load-bearing for every downstream decision, so there
/// is no recovery for such an entry.  Other inspection failures surface as
/// [`EngineError::Io`].
pub fn classify(path: &Path) -> Result<NodeState, EngineError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(NodeState::Absent),
        Err(e) => {
            return Err(EngineError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        Ok(NodeState::Symlink {
            resolved: fs::canonicalize(path).ok(),
        })
    } else if file_type.is_file() || file_type.is_dir() {
        Ok(NodeState::Regular {
            dir: file_type.is_dir(),
        })
    } else {
        Err(EngineError::UnsupportedNode(path.to_path_buf()))
    }
}

/// The name a node goes by in confirmation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A regular file, or a link resolving to one.
    File,
    /// A directory, or a link resolving to one.
    Folder,
    /// A link that resolves to nothing.
    Link,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
            Self::Link => write!(f, "link"),
        }
    }
}

/// Determine the prompt name for an existing node, following links.
///
/// Only call on paths known to exist; a path that fails to resolve is named
/// a `link` (the broken-link case).
#[must_use]
pub fn kind_of(path: &Path) -> NodeKind {
    fs::metadata(path).map_or(NodeKind::Link, |meta| {
        if meta.is_dir() {
            NodeKind::Folder
        } else {
            NodeKind::File
        }
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn classify_absent() {
        let dir = tempfile::tempdir().unwrap();
        let state = classify(&dir.path().join("nothing")).unwrap();
        assert_eq!(state, NodeState::Absent);
        assert!(state.is_absent());
        assert!(!state.has_content());
    }

    #[test]
    fn classify_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        let state = classify(&file).unwrap();
        assert_eq!(state, NodeState::Regular { dir: false });
        assert!(state.has_content());
    }

    #[test]
    fn classify_directory() {
        let dir = tempfile::tempdir().unwrap();
        let state = classify(dir.path()).unwrap();
        assert_eq!(state, NodeState::Regular { dir: true });
    }

    #[cfg(unix)]
    #[test]
    fn classify_resolving_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        let link = dir.path().join("l");
        fs::write(&file, b"x").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();

        match classify(&link).unwrap() {
            NodeState::Symlink { resolved: Some(resolved) } => {
                assert_eq!(resolved, fs::canonicalize(&file).unwrap());
            }
            other => panic!("expected resolving symlink, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn classify_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();

        let state = classify(&link).unwrap();
        assert_eq!(state, NodeState::Symlink { resolved: None });
        assert!(!state.has_content());
        assert!(!state.is_absent(), "a broken link still exists");
    }

    #[cfg(unix)]
    #[test]
    fn classify_socket_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let sock = dir.path().join("ipc.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();

        let err = classify(&sock).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedNode(_)), "got: {err}");
    }

    #[test]
    fn kind_of_regular_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        assert_eq!(kind_of(&file), NodeKind::File);
        assert_eq!(kind_of(dir.path()), NodeKind::Folder);
    }

    #[cfg(unix)]
    #[test]
    fn kind_of_follows_links() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        let link = dir.path().join("l");
        fs::write(&file, b"x").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();
        assert_eq!(kind_of(&link), NodeKind::File, "a link to a file is a file");
    }

    #[cfg(unix)]
    #[test]
    fn kind_of_broken_link() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();
        assert_eq!(kind_of(&link), NodeKind::Link);
    }

    #[test]
    fn node_kind_display() {
        assert_eq!(NodeKind::File.to_string(), "file");
        assert_eq!(NodeKind::Folder.to_string(), "folder");
        assert_eq!(NodeKind::Link.to_string(), "link");
    }
}
