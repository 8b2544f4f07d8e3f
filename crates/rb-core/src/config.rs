//! Configuration structures for the rebrand tool.
//!
//! This module provides configuration types for a run:
//!
//! - [`RunConfig`] - Traversal and execution settings (workers, links, root rename)
//! - [`SkipConfig`] - Names and suffixes that are never rewritten or renamed
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`]. A [`Config`] can be loaded
//! from a JSON settings file with [`Config::load`]; missing fields fall back
//! to their defaults. The rule set itself is *not* part of this file, it is
//! loaded separately through [`RuleSetBuilder`](crate::RuleSetBuilder).

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the default worker count.
///
/// Rewriting is I/O bound and every worker holds one file open, so the pool
/// stays well below typical file-descriptor limits.
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// Execution settings for both passes.
///
/// # Examples
///
/// ```
/// use rb_core::RunConfig;
///
/// let config = RunConfig::default();
/// assert!(config.workers.is_none());
/// assert!(!config.rename_root);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of content-rewrite workers.
    /// `None` means available parallelism, capped at [`DEFAULT_MAX_WORKERS`].
    pub workers: Option<usize>,

    /// Whether to follow symbolic links while walking the tree.
    pub follow_links: bool,

    /// Whether `.gitignore` / `.ignore` files exclude paths from both passes.
    pub respect_gitignore: bool,

    /// Whether the root directory's own name is renamed after everything else.
    pub rename_root: bool,

    /// Whether file extensions are left alone when renaming files.
    ///
    /// When set, only the file stem is substituted: with the rule `txt→md`,
    /// `notes.txt` is left alone while `txt_notes.txt` becomes `md_notes.txt`.
    pub keep_extensions: bool,

    /// Whether the rename pass records paths whose name did not change.
    pub report_unchanged: bool,
}

impl RunConfig {
    /// Returns the worker count to use for the content pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_core::RunConfig;
    ///
    /// let config = RunConfig { workers: Some(3), ..RunConfig::default() };
    /// assert_eq!(config.effective_workers(), 3);
    /// ```
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map_or(1, std::num::NonZeroUsize::get)
                .min(DEFAULT_MAX_WORKERS)
        })
    }
}

/// Paths that are never opened for rewrite or rename.
///
/// Entries in [`names`](Self::names) match a path component exactly (so a
/// directory named `.git` is skipped together with everything below it).
/// Entries in [`suffixes`](Self::suffixes) match the end of a file or
/// directory name.
///
/// # Examples
///
/// ```
/// use rb_core::SkipConfig;
///
/// let config = SkipConfig::default();
/// assert!(config.names.iter().any(|n| n == ".git"));
/// assert!(config.names.iter().any(|n| n == "launch.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    /// Exact file or directory names to skip.
    pub names: Vec<String>,

    /// Name suffixes to skip (e.g. `.lock`).
    pub suffixes: Vec<String>,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            names: vec![
                ".git".to_owned(),
                ".hg".to_owned(),
                ".svn".to_owned(),
                "launch.json".to_owned(),
                "Doxyfile".to_owned(),
            ],
            suffixes: Vec::new(),
        }
    }
}

/// Root configuration for the rebrand tool.
///
/// # Examples
///
/// ```
/// use rb_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("launch.json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Execution settings.
    pub run: RunConfig,

    /// Skip list.
    pub skip: SkipConfig,
}

impl Config {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON for this structure, and
    /// any error from [`validate`](Self::validate).
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_std_path())
            .map_err(|e| ConfigError::read_file(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `workers` is zero or a skip
    /// entry is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.workers == Some(0) {
            return Err(ConfigError::invalid_option("workers", "must be at least 1"));
        }
        if self.skip.names.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_option("skip.names", "entries must not be empty"));
        }
        if self.skip.suffixes.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_option(
                "skip.suffixes",
                "entries must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();
        assert!(config.workers.is_none());
        assert!(!config.follow_links);
        assert!(!config.respect_gitignore);
        assert!(!config.rename_root);
        assert!(!config.keep_extensions);
        assert!(!config.report_unchanged);
    }

    #[test]
    fn test_effective_workers_bounded() {
        let config = RunConfig::default();
        let workers = config.effective_workers();
        assert!(workers >= 1);
        assert!(workers <= DEFAULT_MAX_WORKERS);
    }

    #[test]
    fn test_skip_config_defaults() {
        let config = SkipConfig::default();
        for name in [".git", ".hg", ".svn", "launch.json", "Doxyfile"] {
            assert!(config.names.iter().any(|n| n == name), "missing {name}");
        }
        assert!(config.suffixes.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"run": {"workers": 4}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.run.workers, Some(4));
        assert!(!config.run.rename_root);
        assert_eq!(config.skip, SkipConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.run.workers = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_skip_name() {
        let mut config = Config::default();
        config.skip.names.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("settings.json");
        std::fs::write(&path, r#"{"skip": {"suffixes": [".lock"]}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.skip.suffixes, vec![".lock".to_owned()]);
        assert_eq!(config.run, RunConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Utf8Path::new("/nonexistent/settings.json"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
