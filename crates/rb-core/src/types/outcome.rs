//! Per-path results.
//!
//! Every path a pass touches produces exactly one [`Outcome`]. Outcomes are
//! created by the workers, sent to the report writer, and never mutated
//! afterwards.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Which pass produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Textual substitution inside file contents.
    Content,
    /// Renaming of files and directories.
    Rename,
}

impl Pass {
    /// Returns a lowercase label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened to a path.
///
/// # Examples
///
/// ```
/// use rb_core::OutcomeStatus;
///
/// assert!(OutcomeStatus::Rewritten.is_change());
/// assert!(OutcomeStatus::SkippedBinary.is_skip());
/// assert!(!OutcomeStatus::Unchanged.is_change());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OutcomeStatus {
    /// Nothing matched; the path was not modified.
    Unchanged,
    /// File contents were substituted and written back.
    Rewritten,
    /// The path was moved to its new name.
    Renamed,
    /// The file was classified as binary and left untouched.
    SkippedBinary,
    /// The path matched the skip list and was never opened.
    SkippedFiltered,
    /// Processing failed; see [`Outcome::error`].
    Error,
}

impl OutcomeStatus {
    /// Returns `true` if the filesystem was modified.
    #[inline]
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Rewritten | Self::Renamed)
    }

    /// Returns `true` if the path was deliberately not processed.
    #[inline]
    #[must_use]
    pub const fn is_skip(self) -> bool {
        matches!(self, Self::SkippedBinary | Self::SkippedFiltered)
    }

    /// Returns `true` for failures.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns the label used in record files.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_core::OutcomeStatus;
    ///
    /// assert_eq!(OutcomeStatus::SkippedBinary.label(), "skipped-binary");
    /// ```
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Rewritten => "rewritten",
            Self::Renamed => "renamed",
            Self::SkippedBinary => "skipped-binary",
            Self::SkippedFiltered => "skipped-filtered",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of a per-path failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Read, write, permission or lock failure.
    Io,
    /// Substituted text cannot be represented in the file's encoding.
    Encoding,
    /// The rename target already exists.
    NameCollision,
    /// The substituted name is not a valid single path component.
    InvalidName,
    /// The directory walk could not read an entry.
    Walk,
    /// The path is not valid UTF-8.
    NonUtf8Path,
}

impl ErrorKind {
    /// Returns the label used in record files.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Encoding => "encoding",
            Self::NameCollision => "name-collision",
            Self::InvalidName => "invalid-name",
            Self::Walk => "walk",
            Self::NonUtf8Path => "non-utf8-path",
        }
    }
}

/// Details of a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable reason.
    pub reason: String,
}

/// The result of processing one path in one pass.
///
/// # Examples
///
/// ```
/// use rb_core::{Outcome, OutcomeStatus, Pass};
///
/// let outcome = Outcome::rewritten("src/lib.rs", "utf-8");
/// assert_eq!(outcome.pass, Pass::Content);
/// assert_eq!(outcome.status, OutcomeStatus::Rewritten);
/// assert_eq!(outcome.encoding.as_deref(), Some("utf-8"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Pass that produced this outcome.
    pub pass: Pass,
    /// Path as it was before processing.
    pub path: Utf8PathBuf,
    /// New location for renamed paths (and attempted target for collisions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<Utf8PathBuf>,
    /// What happened.
    pub status: OutcomeStatus,
    /// Encoding the file was decoded with, for text files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Failure details when `status` is [`OutcomeStatus::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl Outcome {
    fn new(pass: Pass, path: impl Into<Utf8PathBuf>, status: OutcomeStatus) -> Self {
        Self {
            pass,
            path: path.into(),
            new_path: None,
            status,
            encoding: None,
            error: None,
        }
    }

    /// A path that no rule affected.
    #[must_use]
    pub fn unchanged(pass: Pass, path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(pass, path, OutcomeStatus::Unchanged)
    }

    /// A file whose contents were substituted.
    #[must_use]
    pub fn rewritten(path: impl Into<Utf8PathBuf>, encoding: impl Into<String>) -> Self {
        Self::new(Pass::Content, path, OutcomeStatus::Rewritten).with_encoding(encoding)
    }

    /// A path moved to `new_path`.
    #[must_use]
    pub fn renamed(path: impl Into<Utf8PathBuf>, new_path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Pass::Rename, path, OutcomeStatus::Renamed).with_new_path(new_path)
    }

    /// A file classified as binary.
    #[must_use]
    pub fn skipped_binary(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(Pass::Content, path, OutcomeStatus::SkippedBinary)
    }

    /// A path matched by the skip list.
    #[must_use]
    pub fn skipped_filtered(pass: Pass, path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(pass, path, OutcomeStatus::SkippedFiltered)
    }

    /// A failed path.
    #[must_use]
    pub fn failed(
        pass: Pass,
        path: impl Into<Utf8PathBuf>,
        kind: ErrorKind,
        reason: impl Into<String>,
    ) -> Self {
        let mut outcome = Self::new(pass, path, OutcomeStatus::Error);
        outcome.error = Some(OutcomeError {
            kind,
            reason: reason.into(),
        });
        outcome
    }

    /// Attaches the encoding used to decode the file.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Attaches the new (or attempted) path.
    #[must_use]
    pub fn with_new_path(mut self, new_path: impl Into<Utf8PathBuf>) -> Self {
        self.new_path = Some(new_path.into());
        self
    }

    /// Returns the failure category, if any.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
