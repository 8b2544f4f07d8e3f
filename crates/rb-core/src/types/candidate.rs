//! Paths discovered during a tree walk.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// What kind of filesystem entry a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link that is not followed.
    Symlink,
}

impl EntryKind {
    /// Returns a short lowercase label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        }
    }
}

/// A path found below the traversal root, not yet processed.
///
/// `depth` counts path components from the root: direct children of the
/// root have depth 1.
///
/// # Examples
///
/// ```
/// use rb_core::{Candidate, EntryKind};
///
/// let candidate = Candidate::new("root/src/lib.rs", EntryKind::File, 2);
/// assert!(candidate.is_file());
/// assert_eq!(candidate.file_name(), Some("lib.rs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Full path of the entry.
    pub path: Utf8PathBuf,
    /// Entry kind at discovery time.
    pub kind: EntryKind,
    /// Number of components below the root.
    pub depth: usize,
}

impl Candidate {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, kind: EntryKind, depth: usize) -> Self {
        Self {
            path: path.into(),
            kind,
            depth,
        }
    }

    /// Returns `true` for regular files.
    #[inline]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    /// Returns the final path component.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }

    /// Returns the candidate's path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accessors() {
        let candidate = Candidate::new("root/OldDir", EntryKind::Directory, 1);
        assert!(!candidate.is_file());
        assert_eq!(candidate.file_name(), Some("OldDir"));
        assert_eq!(candidate.path().as_str(), "root/OldDir");
    }

    #[test]
    fn test_entry_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&EntryKind::Directory).unwrap(),
            r#""directory""#
        );
        assert_eq!(EntryKind::Symlink.label(), "symlink");
    }
}
