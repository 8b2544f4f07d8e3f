//! Error types for the rb-engine crate.
//!
//! This module provides the [`EngineError`] type for errors that can occur
//! while walking the tree, rewriting file contents and renaming paths.

use camino::Utf8PathBuf;
use rb_core::{ErrorKind, Outcome, Pass};

/// Errors that can occur during a content or rename pass.
///
/// # Error Recovery Strategy
///
/// - **Per-path errors** ([`EngineError::Read`], [`EngineError::Write`],
///   [`EngineError::Encode`], [`EngineError::NameCollision`],
///   [`EngineError::InvalidName`], [`EngineError::Rename`],
///   [`EngineError::NonUtf8Path`]): recorded as an error outcome, the pass
///   continues with the next path
/// - **Walk errors** ([`EngineError::Walk`]): recorded per entry when the
///   walker can still continue
/// - **Setup errors** ([`EngineError::Pool`], [`EngineError::Config`]): fatal,
///   the pass does not start
///
/// # Examples
///
/// ```
/// use rb_engine::EngineError;
///
/// let err = EngineError::collision("root/A", "root/B");
/// assert_eq!(err.kind(), rb_core::ErrorKind::NameCollision);
/// assert_eq!(err.path().map(|p| p.as_str()), Some("root/A"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Failed to walk a directory entry.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the replacement file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The path of the file that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The substituted text has characters the original encoding lacks.
    #[error("substituted text of {path} cannot be encoded as {encoding}")]
    Encode {
        /// The file being rewritten.
        path: Utf8PathBuf,
        /// Name of the file's encoding.
        encoding: &'static str,
    },

    /// The rename target already exists.
    #[error("cannot rename {from}: {to} already exists")]
    NameCollision {
        /// The path being renamed.
        from: Utf8PathBuf,
        /// The existing target.
        to: Utf8PathBuf,
    },

    /// The substituted name is not a single path component.
    #[error("cannot rename {path}: substituted name '{name}' is not a valid file name")]
    InvalidName {
        /// The path being renamed.
        path: Utf8PathBuf,
        /// The substituted name.
        name: String,
    },

    /// The rename system call failed.
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        /// The path being renamed.
        from: Utf8PathBuf,
        /// The intended target.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl EngineError {
    /// Creates a new [`EngineError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`EngineError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`EngineError::Encode`] error.
    #[inline]
    pub fn encode(path: impl Into<Utf8PathBuf>, encoding: &'static str) -> Self {
        Self::Encode {
            path: path.into(),
            encoding,
        }
    }

    /// Creates a new [`EngineError::NameCollision`] error.
    #[inline]
    pub fn collision(from: impl Into<Utf8PathBuf>, to: impl Into<Utf8PathBuf>) -> Self {
        Self::NameCollision {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a new [`EngineError::InvalidName`] error.
    #[inline]
    pub fn invalid_name(path: impl Into<Utf8PathBuf>, name: impl Into<String>) -> Self {
        Self::InvalidName {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Creates a new [`EngineError::Rename`] error.
    #[inline]
    pub fn rename(
        from: impl Into<Utf8PathBuf>,
        to: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Creates a new [`EngineError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Encode { path, .. }
            | Self::InvalidName { path, .. } => Some(path),
            Self::NameCollision { from, .. } | Self::Rename { from, .. } => Some(from),
            Self::Walk(_) | Self::Pool(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }

    /// Returns the category recorded in outcomes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Walk(_) => ErrorKind::Walk,
            Self::Encode { .. } => ErrorKind::Encoding,
            Self::NameCollision { .. } => ErrorKind::NameCollision,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::NonUtf8Path(_) => ErrorKind::NonUtf8Path,
            Self::Read { .. }
            | Self::Write { .. }
            | Self::Rename { .. }
            | Self::Pool(_)
            | Self::Config(_) => ErrorKind::Io,
        }
    }

    /// Converts this error into an error outcome for `path`.
    ///
    /// Rename errors carry their intended target as the outcome's `new_path`.
    #[must_use]
    pub fn into_outcome(self, pass: Pass, path: impl Into<Utf8PathBuf>) -> Outcome {
        let kind = self.kind();
        let reason = self.to_string();
        let outcome = Outcome::failed(pass, path, kind, reason);
        match self {
            Self::NameCollision { to, .. } | Self::Rename { to, .. } => outcome.with_new_path(to),
            _ => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::OutcomeStatus;
    use std::io;

    #[test]
    fn test_engine_error_read() {
        let source = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err = EngineError::read("src/foo.txt", source);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.path().map(|p| p.as_str()), Some("src/foo.txt"));
        assert!(err.to_string().contains("src/foo.txt"));
    }

    #[test]
    fn test_engine_error_encode() {
        let err = EngineError::encode("legacy.txt", "windows-1252");
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(err.to_string().contains("windows-1252"));
    }

    #[test]
    fn test_engine_error_config() {
        let err = EngineError::config("root path does not exist");
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "invalid configuration: root path does not exist");
    }

    #[test]
    fn test_engine_error_non_utf8() {
        use std::path::PathBuf;
        let err = EngineError::NonUtf8Path(PathBuf::from("test"));
        assert_eq!(err.kind(), ErrorKind::NonUtf8Path);
        assert!(err.path().is_none());
    }

    #[test]
    fn test_collision_into_outcome() {
        let outcome =
            EngineError::collision("root/A", "root/B").into_outcome(Pass::Rename, "root/A");
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::NameCollision));
        assert_eq!(outcome.new_path.as_ref().map(|p| p.as_str()), Some("root/B"));
        assert!(outcome.error.is_some_and(|e| e.reason.contains("already exists")));
    }

    #[test]
    fn test_invalid_name_display() {
        let err = EngineError::invalid_name("root/x", "a/b");
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        assert!(err.to_string().contains("'a/b'"));
    }
}
