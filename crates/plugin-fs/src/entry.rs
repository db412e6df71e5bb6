//! Archive entry paths
//!
//! Entry names inside a plugin archive always use forward slashes and are
//! relative to the archive root. [`EntryPath`] keeps that form internally and
//! converts to a platform-native path only when resolved under a directory.

use std::path::{Path, PathBuf};

/// A relative, slash-separated path to an entry inside an archive.
///
/// Construction never fails: backslashes become forward slashes, empty and
/// `.` components are dropped, and `..` pops the previous component without
/// ever escaping the archive root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl EntryPath {
    /// Create a new EntryPath from an entry name or declared path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let unified = path.as_ref().replace('\\', "/");
        let mut components: Vec<&str> = Vec::new();

        for component in unified.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    components.pop();
                }
                other => components.push(other),
            }
        }

        Self {
            inner: components.join("/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether the path points at the archive root itself.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over the path components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|c| !c.is_empty())
    }

    /// Whether this entry lives under `dir` (component-wise, so
    /// `META-INF/library/x` is not under `META-INF/lib`).
    pub fn starts_with(&self, dir: &EntryPath) -> bool {
        if dir.is_empty() {
            return true;
        }
        let mut own = self.components();
        dir.components().all(|prefix| own.next() == Some(prefix))
    }

    /// Resolve this entry to a native path under `base`.
    pub fn resolve_under(&self, base: &Path) -> PathBuf {
        self.components()
            .fold(base.to_path_buf(), |path, component| path.join(component))
    }
}

impl std::fmt::Display for EntryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
