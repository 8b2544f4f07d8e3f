//! Path filtering for both passes.
//!
//! A [`PathFilter`] decides, for every entry the walker visits, whether the
//! entry may be opened for rewrite or rename. Rejected directories are not
//! descended into, so a filter only needs to look at the entry itself.
//!
//! # Examples
//!
//! ```
//! use rb_engine::{PathFilter, SkipSet};
//! use camino::Utf8Path;
//!
//! let skip = SkipSet::new().with_name(".git").with_suffix(".lock");
//!
//! assert!(skip.should_process(Utf8Path::new("src/main.c")));
//! assert!(!skip.should_process(Utf8Path::new("repo/.git")));
//! assert!(!skip.should_process(Utf8Path::new("Cargo.lock")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use rb_core::SkipConfig;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// A predicate deciding which paths a pass may touch.
///
/// # Thread Safety
///
/// Filters are shared between the walker and the worker pool, so they must
/// be [`Send`] and [`Sync`].
///
/// # Examples
///
/// ```
/// use rb_engine::PathFilter;
/// use camino::Utf8Path;
///
/// struct NoVendor;
///
/// impl PathFilter for NoVendor {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         path.file_name() != Some("vendor")
///     }
/// }
/// ```
pub trait PathFilter: Send + Sync + 'static {
    /// Returns `true` if the entry at `path` may be rewritten or renamed.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// A filter that accepts every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl PathFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// The set of paths that are never opened.
///
/// Matches an entry when any of these hold:
///
/// - its file name equals one of the [names](Self::with_name)
/// - its file name ends with one of the [suffixes](Self::with_suffix)
/// - the path equals one of the exact [paths](Self::with_path)
///
/// Exact paths are compared as given, so callers pass the same form the
/// walker produces (the engine walks a canonicalized root).
#[derive(Debug, Clone, Default)]
pub struct SkipSet {
    names: SmallVec<[String; 8]>,
    suffixes: SmallVec<[String; 4]>,
    paths: FxHashSet<Utf8PathBuf>,
}

impl SkipSet {
    /// Creates an empty skip set that rejects nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a skip set from configured names and suffixes.
    #[must_use]
    pub fn from_config(config: &SkipConfig) -> Self {
        Self {
            names: config.names.iter().cloned().collect(),
            suffixes: config.suffixes.iter().cloned().collect(),
            paths: FxHashSet::default(),
        }
    }

    /// Adds an exact file or directory name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    /// Adds a file-name suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        if !self.suffixes.contains(&suffix) {
            self.suffixes.push(suffix);
        }
        self
    }

    /// Adds an exact path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// Returns `true` if no predicate is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.suffixes.is_empty() && self.paths.is_empty()
    }

    /// Returns `true` if `path` is in the set.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        if self.paths.contains(path) {
            return true;
        }
        let Some(name) = path.file_name() else {
            return false;
        };
        self.names.iter().any(|n| n == name)
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

impl PathFilter for SkipSet {
    fn should_process(&self, path: &Utf8Path) -> bool {
        !self.contains(path)
    }
}

impl<F: PathFilter + ?Sized> PathFilter for Box<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

impl<F: PathFilter + ?Sized> PathFilter for std::sync::Arc<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all_filter() {
        let filter = AcceptAllFilter;
        assert!(filter.should_process(Utf8Path::new("anything.txt")));
        assert!(filter.should_process(Utf8Path::new("")));
    }

    #[test]
    fn test_skip_set_from_default_config() {
        let skip = SkipSet::from_config(&SkipConfig::default());

        assert!(!skip.should_process(Utf8Path::new("/work/proj/.git")));
        assert!(!skip.should_process(Utf8Path::new("/work/proj/.vscode/launch.json")));
        assert!(!skip.should_process(Utf8Path::new("/work/proj/docs/Doxyfile")));
        assert!(skip.should_process(Utf8Path::new("/work/proj/src/main.c")));
        assert!(skip.should_process(Utf8Path::new("/work/proj/.gitignore")));
    }

    #[test]
    fn test_skip_set_suffix() {
        let skip = SkipSet::new().with_suffix(".min.js");
        assert!(!skip.should_process(Utf8Path::new("dist/app.min.js")));
        assert!(skip.should_process(Utf8Path::new("src/app.js")));
    }

    #[test]
    fn test_skip_set_exact_path() {
        let skip = SkipSet::new().with_path("/work/proj/rebrand.log");
        assert!(!skip.should_process(Utf8Path::new("/work/proj/rebrand.log")));
        assert!(skip.should_process(Utf8Path::new("/work/proj/sub/rebrand.log")));
    }

    #[test]
    fn test_skip_set_dedups_names() {
        let skip = SkipSet::new().with_name("rebrand").with_name("rebrand");
        assert_eq!(skip.names.len(), 1);
        assert!(!skip.is_empty());
        assert!(SkipSet::new().is_empty());
    }

    #[test]
    fn test_arc_and_box_filters() {
        let arc: std::sync::Arc<dyn PathFilter> =
            std::sync::Arc::new(SkipSet::new().with_name("x"));
        assert!(!arc.should_process(Utf8Path::new("a/x")));

        let boxed: Box<dyn PathFilter> = Box::new(AcceptAllFilter);
        assert!(boxed.should_process(Utf8Path::new("a/x")));
    }
}
