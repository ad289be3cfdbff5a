//! Platform detection and the per-path sync-support predicate.
use std::fmt;
use std::path::{Component, Path};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other Unix-like systems.
    Linux,
    /// Apple macOS.
    MacOs,
    /// Microsoft Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// The operating system the process is running on.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit operating system.
    ///
    /// Primarily useful in tests that need platform behaviour independent of
    /// the host the suite runs on.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether the platform is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Whether the platform is Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Whether a home-relative path makes sense to sync on this platform.
    ///
    /// Consulted during restore to suppress paths that are meaningless on
    /// the current OS: `Library/` subtrees exist only on macOS, `AppData/`
    /// subtrees only on Windows. Everything else is considered portable.
    #[must_use]
    pub fn can_sync(&self, relative: &Path) -> bool {
        match first_component(relative) {
            Some("Library") => self.is_macos(),
            Some("AppData") => self.is_windows(),
            _ => true,
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }
}

/// First normal component of a relative path, as UTF-8 when possible.
fn first_component(path: &Path) -> Option<&str> {
    path.components().find_map(|c| match c {
        Component::Normal(os) => os.to_str(),
        _ => None,
    })
}
