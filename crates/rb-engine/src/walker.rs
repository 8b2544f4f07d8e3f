//! Directory traversal shared by both passes.
//!
//! This module provides [`FileWalker`], which uses the `ignore` crate to walk
//! the tree once and collect every entry the [`PathFilter`] accepts.
//!
//! # Features
//!
//! - Visits files, directories and symbolic links, hidden ones included
//! - Never descends into a directory the filter rejects
//! - When following links, never leaves the root through a directory link
//! - Optionally respects `.gitignore` / `.ignore` patterns
//! - Converts paths to UTF-8 [`Utf8PathBuf`]; other paths become errors
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use camino::Utf8Path;
//! use rb_engine::{FileWalker, SkipSet};
//!
//! let walker = FileWalker::new(Utf8Path::new("/path/to/project"), Arc::new(SkipSet::new()));
//! let output = walker.walk();
//!
//! for candidate in &output.candidates {
//!     println!("Found: {}", candidate.path);
//! }
//! ```

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::{DirEntry, WalkBuilder};
use parking_lot::Mutex;
use rb_core::{Candidate, EntryKind};
use tracing::debug;

use crate::error::EngineError;
use crate::filter::PathFilter;

/// Everything one walk produced.
#[derive(Debug, Default)]
pub struct WalkOutput {
    /// Accepted entries in walk order. The root itself has depth 0.
    pub candidates: Vec<Candidate>,
    /// Entries the filter rejected. Their descendants were not visited.
    pub skipped: Vec<Utf8PathBuf>,
    /// Entries that could not be read or named.
    pub errors: Vec<(Utf8PathBuf, EngineError)>,
}

impl WalkOutput {
    /// Returns the accepted regular files.
    pub fn files(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| c.is_file())
    }
}

/// Walks a directory tree and classifies its entries.
///
/// Walking is single-threaded; the content pass parallelizes afterwards.
#[derive(Clone)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Decides which entries are kept.
    filter: Arc<dyn PathFilter>,
    /// Whether to follow symbolic links.
    follow_links: bool,
    /// Whether ignore files exclude entries.
    respect_gitignore: bool,
}

impl std::fmt::Debug for FileWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWalker")
            .field("root", &self.root)
            .field("follow_links", &self.follow_links)
            .field("respect_gitignore", &self.respect_gitignore)
            .finish_non_exhaustive()
    }
}

impl FileWalker {
    /// Creates a walker for `root`.
    ///
    /// The root is not checked here; [`Engine::new`](crate::Engine::new)
    /// validates it before any walk starts.
    #[must_use]
    pub fn new(root: &Utf8Path, filter: Arc<dyn PathFilter>) -> Self {
        Self {
            root: root.to_owned(),
            filter,
            follow_links: false,
            respect_gitignore: false,
        }
    }

    /// Configures whether to follow symbolic links.
    ///
    /// By default, symbolic links are not followed and are reported as
    /// [`EntryKind::Symlink`] entries. When following, a link to a directory
    /// outside the root is reported in [`WalkOutput::skipped`] and not
    /// descended into.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configures whether `.gitignore`, `.ignore` and git exclude files apply.
    #[must_use]
    pub const fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Walks the whole tree.
    ///
    /// Never fails as a whole: unreadable entries are collected in
    /// [`WalkOutput::errors`] and the walk continues with their siblings.
    #[must_use]
    pub fn walk(&self) -> WalkOutput {
        let skipped = Arc::new(Mutex::new(Vec::new()));
        let mut output = WalkOutput::default();

        for result in self.build_walker(Arc::clone(&skipped)) {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = walk_error_path(&e).unwrap_or_else(|| self.root.clone());
                    debug!(path = %path, error = %e, "Walk error");
                    output.errors.push((path, EngineError::Walk(e)));
                    continue;
                }
            };

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                let raw = entry.path().to_owned();
                let lossy = Utf8PathBuf::from(raw.to_string_lossy().into_owned());
                output.errors.push((lossy, EngineError::NonUtf8Path(raw)));
                continue;
            };

            let Some(kind) = entry_kind(&entry) else {
                debug!(path = %path, "Skipping special file");
                continue;
            };
            output
                .candidates
                .push(Candidate::new(path, kind, entry.depth()));
        }

        output.skipped = std::mem::take(&mut *skipped.lock());
        output
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self, skipped: Arc<Mutex<Vec<Utf8PathBuf>>>) -> ignore::Walk {
        let filter = Arc::clone(&self.filter);
        let follow_links = self.follow_links;
        let root = self
            .root
            .canonicalize_utf8()
            .unwrap_or_else(|_| self.root.clone());

        WalkBuilder::new(&self.root)
            // Hidden files are rewritten too; only explicit skips apply
            .standard_filters(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .follow_links(self.follow_links)
            // Use a single thread for walking (we parallelize later)
            .threads(1)
            // Don't require the root to be a git repo
            .require_git(false)
            // Deterministic order for records and tests
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                // Non-UTF-8 entries pass so the walk loop can report them.
                let Some(path) = Utf8Path::from_path(entry.path()) else {
                    return true;
                };
                if follow_links && leaves_root(entry, &root) {
                    debug!(path = %path, "Not following link out of root");
                    skipped.lock().push(path.to_owned());
                    return false;
                }
                if filter.should_process(path) {
                    true
                } else {
                    skipped.lock().push(path.to_owned());
                    false
                }
            })
            .build()
    }
}

/// Sockets, FIFOs and device nodes have no kind and are never visited.
fn entry_kind(entry: &DirEntry) -> Option<EntryKind> {
    if entry.path_is_symlink() {
        return Some(EntryKind::Symlink);
    }
    let ft = entry.file_type()?;
    if ft.is_dir() {
        Some(EntryKind::Directory)
    } else if ft.is_file() {
        Some(EntryKind::File)
    } else if ft.is_symlink() {
        Some(EntryKind::Symlink)
    } else {
        None
    }
}

/// Whether `entry` is a followed directory link that resolves outside `root`.
///
/// Unresolvable links count as outside.
fn leaves_root(entry: &DirEntry, root: &Utf8Path) -> bool {
    if !entry.path_is_symlink() || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return false;
    }
    !std::fs::canonicalize(entry.path()).is_ok_and(|target| target.starts_with(root))
}

/// Extracts the path an `ignore` error refers to, if any.
fn walk_error_path(error: &ignore::Error) -> Option<Utf8PathBuf> {
    match error {
        ignore::Error::WithPath { path, .. } => Utf8PathBuf::from_path_buf(path.clone()).ok(),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Utf8PathBuf::from_path_buf(child.clone()).ok(),
        _ => None,
    }
}
