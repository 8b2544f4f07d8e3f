//! Error types for the rb-core crate.
//!
//! This module provides the [`ConfigError`] type for failures that happen
//! before any file is touched: loading settings, reading rule files and
//! building the rule set.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// Every variant is surfaced once at startup. Per-line problems in a rule
/// file are *not* errors; they are reported as
/// [`RuleWarning`](crate::RuleWarning)s and the line is dropped.
///
/// # Examples
///
/// ```
/// use rb_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// A configuration or rule file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the settings file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A literal rule could not be understood.
    #[error("invalid rule '{rule}': {reason}")]
    InvalidRule {
        /// The rule as given.
        rule: String,
        /// Explanation of why the rule is invalid.
        reason: String,
    },

    /// No usable rule survived loading.
    ///
    /// Running with an empty rule set would silently do nothing, so this
    /// aborts the run.
    #[error("rule set is empty: provide rules with --rule or a rule file")]
    EmptyRuleSet,

    /// The substitution automaton could not be built.
    #[error("failed to build rule matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ConfigError::ReadFile`] error.
    #[inline]
    pub fn read_file(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }
}
