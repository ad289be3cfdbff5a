//! Tracked application profiles.
use serde::Deserialize;

use super::Strategy;

/// One tracked application: a name and the configuration files it owns.
///
/// Each entry in `files` is either a literal home-relative path or, when
/// `glob` is set, a glob pattern expanded against the operation's source
/// root.  Profiles are immutable for the duration of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    /// Display name, unique within the catalog.
    pub name: String,
    /// Home-relative file paths or glob patterns.
    pub files: Vec<String>,
    /// Whether `files` entries are glob patterns.
    #[serde(default)]
    pub glob: bool,
    /// Per-profile strategy override; the catalog default applies when absent.
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

impl Application {
    /// Convenience constructor for code that builds profiles directly
    /// (tests, embedded catalogs).
    #[must_use]
    pub fn new(name: &str, files: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            files: files.iter().map(ToString::to_string).collect(),
            glob: false,
            strategy: None,
        }
    }

    /// Same as [`new`](Self::new) with glob expansion enabled.
    #[must_use]
    pub fn with_glob(name: &str, patterns: &[&str]) -> Self {
        Self {
            glob: true,
            ..Self::new(name, patterns)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn new_builds_literal_profile() {
        let app = Application::new("vim", &[".vimrc", ".vim"]);
        assert_eq!(app.name, "vim");
        assert_eq!(app.files, vec![".vimrc", ".vim"]);
        assert!(!app.glob);
        assert!(app.strategy.is_none());
    }

    #[test]
    fn with_glob_enables_expansion() {
        let app = Application::with_glob("shell", &[".profile*"]);
        assert!(app.glob);
    }

    #[test]
    fn deserializes_with_defaults() {
        let app: Application = toml::from_str(
            r#"name = "git"
files = [".gitconfig"]
"#,
        )
        .unwrap();
        assert_eq!(app.name, "git");
        assert!(!app.glob);
        assert!(app.strategy.is_none());
    }
}
