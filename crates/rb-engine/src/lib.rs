//! Content rewrite and rename passes for the rebrand tool.
//!
//! This crate walks a directory tree, substitutes rule tokens inside every
//! text file, and renames every file and directory whose name contains a
//! token. Binary files and skipped paths are never modified. Symbolic links
//! are not followed unless asked, and even then a link to a directory outside
//! the root is skipped, so nothing outside the root is written.
//!
//! # Overview
//!
//! The main entry point is [`Engine`], which combines:
//!
//! - [`FileWalker`]: Directory traversal with a [`PathFilter`] skip list
//! - [`ContentDispatcher`]: Parallel [`rewrite`] calls on a bounded rayon pool
//! - [`RenamePlan`]: Depth-ordered, collision-checked renames
//! - [`PassStats`]: Atomic per-pass counters
//!
//! # Streaming API
//!
//! Each pass streams [`PassUpdate`]s over a `tokio` channel. The receiving
//! end is usually a report thread started with [`spawn_report_thread`]:
//!
//! ```no_run
//! use camino::Utf8Path;
//! use rb_core::RuleSet;
//! use rb_engine::{Engine, EngineConfig, LogSink, ReportSink, spawn_report_thread};
//! use tokio::sync::mpsc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = RuleSet::from_pairs([("Acme", "Globex")])?;
//! let engine = Engine::new(EngineConfig::new(Utf8Path::new("./project")), rules)?;
//!
//! let (tx, rx) = mpsc::channel(rb_engine::CHANNEL_CAPACITY);
//! let sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(LogSink)];
//! let report = spawn_report_thread(rx, sinks)?;
//!
//! engine.run_content_pass(tx.clone())?;
//! engine.run_rename_pass(tx)?;
//!
//! for summary in report.join().unwrap_or_default() {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Engine (main entry point)
//!     │
//!     ├── FileWalker (one walk per pass)
//!     │       │
//!     │       └── WalkBuilder (ignore crate) + PathFilter
//!     │
//!     ├── content pass
//!     │       │
//!     │       └── ContentDispatcher (rayon pool) ── rewrite ── detect
//!     │
//!     ├── rename pass
//!     │       │
//!     │       └── RenamePlan (build, then execute deepest first)
//!     │
//!     └── PassUpdate channel ──▶ report thread ──▶ ReportSinks
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod dispatcher;
mod encoding;
mod error;
mod filter;
mod planner;
mod report;
mod rewriter;
mod stats;
mod walker;

pub use dispatcher::ContentDispatcher;
pub use encoding::{
    CANDIDATES, CONTROL_RATIO_PERCENT, Detection, SAMPLE_LEN, TextEncoding, detect,
};
pub use error::EngineError;
pub use filter::{AcceptAllFilter, PathFilter, SkipSet};
pub use planner::{PlanOptions, RenameEntry, RenamePlan};
pub use report::{
    CHANNEL_CAPACITY, LogSink, PassUpdate, RecordFormat, RecordWriter, ReportSink,
    spawn_report_thread,
};
pub use rewriter::{TEMP_PREFIX, rewrite};
pub use stats::{PassStats, PassSummary, StatsSnapshot};
pub use walker::{FileWalker, WalkOutput};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use rb_core::{Candidate, Outcome, OutcomeStatus, Pass, RuleSet, RunConfig};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::report::emit;

/// Configuration for the engine.
///
/// # Examples
///
/// ```
/// use rb_engine::{EngineConfig, SkipSet};
/// use camino::Utf8Path;
///
/// let config = EngineConfig::new(Utf8Path::new("./project"))
///     .with_workers(4)
///     .with_filter(SkipSet::new().with_name(".git"));
/// assert_eq!(config.workers, 4);
/// ```
#[derive(Clone)]
pub struct EngineConfig {
    /// Root directory of both passes.
    pub root: Utf8PathBuf,
    /// Content-rewrite worker threads.
    pub workers: usize,
    /// Whether to follow symbolic links.
    pub follow_links: bool,
    /// Whether ignore files exclude paths.
    pub respect_gitignore: bool,
    /// Whether the root directory itself is renamed.
    pub rename_root: bool,
    /// Whether file extensions are left alone when renaming.
    pub keep_extensions: bool,
    /// Whether the rename pass reports paths whose name did not change.
    pub report_unchanged: bool,
    /// Paths never opened by either pass.
    pub filter: Arc<dyn PathFilter>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("root", &self.root)
            .field("workers", &self.workers)
            .field("follow_links", &self.follow_links)
            .field("respect_gitignore", &self.respect_gitignore)
            .field("rename_root", &self.rename_root)
            .field("keep_extensions", &self.keep_extensions)
            .field("report_unchanged", &self.report_unchanged)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    /// Creates a configuration with default run settings and no skip list.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self::from_run_config(root, &RunConfig::default())
    }

    /// Creates a configuration from loaded run settings.
    #[must_use]
    pub fn from_run_config(root: &Utf8Path, run: &RunConfig) -> Self {
        Self {
            root: root.to_owned(),
            workers: run.effective_workers(),
            follow_links: run.follow_links,
            respect_gitignore: run.respect_gitignore,
            rename_root: run.rename_root,
            keep_extensions: run.keep_extensions,
            report_unchanged: run.report_unchanged,
            filter: Arc::new(AcceptAllFilter),
        }
    }

    /// Sets the number of content-rewrite workers.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the path filter.
    #[must_use]
    pub fn with_filter<F: PathFilter>(mut self, filter: F) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configures whether ignore files apply.
    #[must_use]
    pub const fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Configures whether the root directory itself is renamed.
    #[must_use]
    pub const fn with_rename_root(mut self, rename_root: bool) -> Self {
        self.rename_root = rename_root;
        self
    }

    /// Configures whether file extensions are left alone when renaming.
    #[must_use]
    pub const fn with_keep_extensions(mut self, keep: bool) -> Self {
        self.keep_extensions = keep;
        self
    }

    /// Configures whether unchanged names are reported by the rename pass.
    #[must_use]
    pub const fn with_report_unchanged(mut self, report: bool) -> Self {
        self.report_unchanged = report;
        self
    }
}

/// Outcomes and summary of a pass run through the collecting API.
#[derive(Debug, Clone)]
pub struct PassResult {
    /// Final counters.
    pub summary: PassSummary,
    /// Every outcome, in the order the report side received them.
    pub outcomes: Vec<Outcome>,
}

impl PassResult {
    /// Returns the outcomes with the given status.
    pub fn with_status(&self, status: OutcomeStatus) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }
}

/// Runs the content and rename passes over one tree.
///
/// # Cloning
///
/// `Engine` is cheaply cloneable. Clones share the rule set and the
/// cancellation flag, so a clone can be moved into a blocking task while
/// another handle cancels it.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Engine configuration, root canonicalized.
    config: EngineConfig,
    /// Substitution rules.
    rules: Arc<RuleSet>,
    /// Set once to stop both passes early.
    cancel: Arc<AtomicBool>,
}

impl Engine {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the root does not exist, is not a
    /// directory, or cannot be resolved to a UTF-8 path.
    pub fn new(mut config: EngineConfig, rules: RuleSet) -> Result<Self, EngineError> {
        if !config.root.exists() {
            return Err(EngineError::config(format!(
                "root path does not exist: {}",
                config.root
            )));
        }
        if !config.root.is_dir() {
            return Err(EngineError::config(format!(
                "root path is not a directory: {}",
                config.root
            )));
        }
        config.root = config.root.canonicalize_utf8().map_err(|e| {
            EngineError::config(format!("cannot resolve root path {}: {e}", config.root))
        })?;

        info!(
            root = %config.root,
            rules = rules.len(),
            workers = config.workers,
            "Creating engine"
        );

        Ok(Self {
            config,
            rules: Arc::new(rules),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.config.root
    }

    /// Returns the rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the shared cancellation flag.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Requests cancellation of the running and any later pass.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Rewrites the contents of every text file under the root.
    ///
    /// # Channel Protocol
    ///
    /// Sends [`PassUpdate::Started`], then one [`PassUpdate::Outcome`] per
    /// filtered path, walk error and processed file, then
    /// [`PassUpdate::Complete`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Pool`] if the worker pool cannot be created.
    #[allow(clippy::needless_pass_by_value)] // Sender is cloned internally for rayon threads
    pub fn run_content_pass(
        &self,
        tx: mpsc::Sender<PassUpdate>,
    ) -> Result<PassSummary, EngineError> {
        info!(root = %self.config.root, "Starting content pass");
        let stats = PassStats::new();

        let walk = self.walker().walk();
        let files: Vec<Candidate> = walk.files().cloned().collect();
        info!(count = files.len(), "Collected files");

        let candidates = files.len() + walk.skipped.len() + walk.errors.len();
        let _ = tx.blocking_send(PassUpdate::Started {
            pass: Pass::Content,
            candidates,
        });
        report_walk(Pass::Content, walk, &tx, &stats);

        let cancelled = if self.is_cancelled() {
            true
        } else {
            ContentDispatcher::new(self.config.workers).dispatch(
                &files,
                &self.rules,
                &tx,
                &stats,
                &self.cancel,
            )?
        };

        Ok(self.complete(Pass::Content, &stats, cancelled, &tx))
    }

    /// Renames every file and directory whose name contains a rule token.
    ///
    /// Walks the tree again, so it sees the results of an earlier content
    /// pass but shares no state with it.
    #[allow(clippy::needless_pass_by_value)] // Mirrors run_content_pass
    pub fn run_rename_pass(
        &self,
        tx: mpsc::Sender<PassUpdate>,
    ) -> Result<PassSummary, EngineError> {
        info!(root = %self.config.root, "Starting rename pass");
        let stats = PassStats::new();

        let walk = self.walker().walk();
        let plan = RenamePlan::build(&walk.candidates, &self.rules, self.plan_options());
        info!(renames = plan.len(), invalid = plan.invalid().len(), "Planned renames");

        let candidates = plan.reported_len(self.config.report_unchanged)
            + walk.skipped.len()
            + walk.errors.len();
        let _ = tx.blocking_send(PassUpdate::Started {
            pass: Pass::Rename,
            candidates,
        });
        report_walk(Pass::Rename, walk, &tx, &stats);

        let cancelled = self.is_cancelled()
            || plan.execute(&tx, &stats, &self.cancel, self.config.report_unchanged);

        Ok(self.complete(Pass::Rename, &stats, cancelled, &tx))
    }

    /// Builds the rename plan for the current tree without executing it.
    #[must_use]
    pub fn plan_renames(&self) -> RenamePlan {
        let walk = self.walker().walk();
        RenamePlan::build(&walk.candidates, &self.rules, self.plan_options())
    }

    /// Runs the content pass and collects every outcome.
    ///
    /// # Errors
    ///
    /// See [`run_content_pass`](Self::run_content_pass).
    pub fn rewrite_content(&self) -> Result<PassResult, EngineError> {
        self.collect(Self::run_content_pass)
    }

    /// Runs the rename pass and collects every outcome.
    ///
    /// # Errors
    ///
    /// See [`run_rename_pass`](Self::run_rename_pass).
    pub fn rename_paths(&self) -> Result<PassResult, EngineError> {
        self.collect(Self::run_rename_pass)
    }

    fn collect<F>(&self, run: F) -> Result<PassResult, EngineError>
    where
        F: FnOnce(&Self, mpsc::Sender<PassUpdate>) -> Result<PassSummary, EngineError>,
    {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

        std::thread::scope(|scope| {
            let collector = scope.spawn(move || {
                let mut outcomes = Vec::new();
                while let Some(update) = rx.blocking_recv() {
                    if let PassUpdate::Outcome(outcome) = update {
                        outcomes.push(*outcome);
                    }
                }
                outcomes
            });

            let summary = run(self, tx);
            let outcomes = collector
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
            Ok(PassResult {
                summary: summary?,
                outcomes,
            })
        })
    }

    fn walker(&self) -> FileWalker {
        FileWalker::new(&self.config.root, Arc::clone(&self.config.filter))
            .with_follow_links(self.config.follow_links)
            .with_respect_gitignore(self.config.respect_gitignore)
    }

    const fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            rename_root: self.config.rename_root,
            keep_extensions: self.config.keep_extensions,
        }
    }

    fn complete(
        &self,
        pass: Pass,
        stats: &PassStats,
        cancelled: bool,
        tx: &mpsc::Sender<PassUpdate>,
    ) -> PassSummary {
        let summary = PassSummary {
            pass,
            stats: stats.snapshot(),
            cancelled,
        };
        debug!(
            root = %self.config.root,
            %pass,
            total = summary.stats.total,
            changed = summary.stats.changed,
            errors = summary.stats.errors,
            cancelled,
            "Pass completed"
        );
        let _ = tx.blocking_send(PassUpdate::Complete(summary));
        summary
    }
}

/// Reports filtered entries and walk errors of one pass.
fn report_walk(pass: Pass, walk: WalkOutput, tx: &mpsc::Sender<PassUpdate>, stats: &PassStats) {
    for path in walk.skipped {
        emit(tx, stats, Outcome::skipped_filtered(pass, path));
    }
    for (path, error) in walk.errors {
        emit(tx, stats, error.into_outcome(pass, path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::{ErrorKind, SkipConfig};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned())
            .unwrap()
            .canonicalize_utf8()
            .unwrap();
        (dir, root)
    }

    fn engine(root: &Utf8Path, pairs: &[(&str, &str)]) -> Engine {
        let config = EngineConfig::new(root)
            .with_workers(2)
            .with_filter(SkipSet::from_config(&SkipConfig::default()));
        Engine::new(config, RuleSet::from_pairs(pairs.iter().copied()).unwrap()).unwrap()
    }

    #[test]
    fn test_engine_config_new() {
        let config = EngineConfig::new(Utf8Path::new("./src"));
        assert_eq!(config.root.as_str(), "./src");
        assert!(config.workers >= 1);
        assert!(!config.follow_links);
        assert!(!config.rename_root);
        assert!(!config.report_unchanged);
    }

    #[test]
    fn test_engine_config_builders() {
        let config = EngineConfig::new(Utf8Path::new("."))
            .with_workers(3)
            .with_follow_links(true)
            .with_respect_gitignore(true)
            .with_rename_root(true)
            .with_keep_extensions(true)
            .with_report_unchanged(true);
        assert_eq!(config.workers, 3);
        assert!(config.follow_links);
        assert!(config.respect_gitignore);
        assert!(config.rename_root);
        assert!(config.keep_extensions);
        assert!(config.report_unchanged);
    }

    #[test]
    fn test_engine_invalid_root() {
        let rules = RuleSet::from_pairs([("a", "b")]).unwrap();
        let config = EngineConfig::new(Utf8Path::new("/nonexistent/path/that/does/not/exist"));
        let err = Engine::new(config, rules).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_engine_root_is_file() {
        let (_dir, root) = setup();
        fs::write(root.join("file"), "x").unwrap();
        let rules = RuleSet::from_pairs([("a", "b")]).unwrap();
        let err = Engine::new(EngineConfig::new(&root.join("file")), rules).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_content_pass_substitutes_and_is_idempotent() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.txt"), "foo bar foo Foo").unwrap();
        fs::write(root.join("b.txt"), "nothing").unwrap();
        let engine = engine(&root, &[("foo", "baz")]);

        let first = engine.rewrite_content().unwrap();
        assert_eq!(first.summary.stats.changed, 1);
        assert_eq!(first.summary.stats.unchanged, 1);
        assert_eq!(fs::read_to_string(root.join("src/a.txt")).unwrap(), "baz bar baz Foo");

        let second = engine.rewrite_content().unwrap();
        assert_eq!(second.summary.stats.changed, 0);
        assert_eq!(second.summary.stats.unchanged, 2);
    }

    #[test]
    fn test_content_pass_enforces_skip_set() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join(".vscode")).unwrap();
        fs::write(root.join(".git/config"), "foo").unwrap();
        fs::write(root.join(".vscode/launch.json"), "foo").unwrap();
        fs::write(root.join("main.c"), "foo").unwrap();
        let engine = engine(&root, &[("foo", "baz")]);

        let result = engine.rewrite_content().unwrap();

        assert_eq!(fs::read_to_string(root.join(".git/config")).unwrap(), "foo");
        assert_eq!(fs::read_to_string(root.join(".vscode/launch.json")).unwrap(), "foo");
        assert_eq!(fs::read_to_string(root.join("main.c")).unwrap(), "baz");

        let skipped: Vec<_> = result
            .with_status(OutcomeStatus::SkippedFiltered)
            .map(|o| o.path.clone())
            .collect();
        assert_eq!(skipped.len(), 2);
        assert!(skipped.contains(&root.join(".git")));
        assert!(skipped.contains(&root.join(".vscode/launch.json")));
        assert!(result.outcomes.iter().all(|o| !o.path.starts_with(root.join(".git/config"))));
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_links_never_writes_outside_root() {
        let (_dir, root) = setup();
        let outside = TempDir::new().unwrap();
        let shared = outside.path().join("foo.txt");
        fs::write(&shared, "foo").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("shared")).unwrap();
        fs::write(root.join("own.txt"), "foo").unwrap();

        let config = EngineConfig::new(&root).with_follow_links(true);
        let engine = Engine::new(config, RuleSet::from_pairs([("foo", "baz")]).unwrap()).unwrap();

        let content = engine.rewrite_content().unwrap();
        assert_eq!(content.summary.stats.changed, 1);
        assert!(content.outcomes.iter().any(|o| {
            o.path == root.join("shared") && o.status == rb_core::OutcomeStatus::SkippedFiltered
        }));
        engine.rename_paths().unwrap();

        assert_eq!(fs::read_to_string(&shared).unwrap(), "foo");
        assert_eq!(fs::read_to_string(root.join("baz.txt")).unwrap(), "baz");
    }

    #[test]
    fn test_content_pass_leaves_binary_untouched() {
        let (_dir, root) = setup();
        let bytes = b"\x89PNG\r\n\x1a\n\x00\x00foo".to_vec();
        fs::write(root.join("logo.png"), &bytes).unwrap();
        let engine = engine(&root, &[("foo", "baz")]);

        let result = engine.rewrite_content().unwrap();
        assert_eq!(result.summary.stats.skipped, 1);
        assert_eq!(fs::read(root.join("logo.png")).unwrap(), bytes);
    }

    #[test]
    fn test_rename_pass_orders_by_depth() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join("OldDir/OldDir")).unwrap();
        fs::write(root.join("OldDir/OldDir/file_old.txt"), "x").unwrap();
        let engine = engine(&root, &[("Old", "New"), ("old", "new")]);

        let result = engine.rename_paths().unwrap();
        assert_eq!(result.summary.stats.changed, 3);
        assert_eq!(result.summary.stats.errors, 0);
        assert!(root.join("NewDir/NewDir/file_new.txt").is_file());

        let renamed: Vec<_> = result
            .with_status(OutcomeStatus::Renamed)
            .map(|o| o.path.strip_prefix(&root).unwrap().to_string())
            .collect();
        assert_eq!(
            renamed,
            vec!["OldDir/OldDir/file_old.txt", "OldDir/OldDir", "OldDir"]
        );
    }

    #[test]
    fn test_rename_pass_collision() {
        let (_dir, root) = setup();
        fs::write(root.join("A"), "a").unwrap();
        fs::write(root.join("B"), "b").unwrap();
        let engine = engine(&root, &[("A", "B")]);

        let result = engine.rename_paths().unwrap();
        assert_eq!(result.summary.stats.errors, 1);
        assert_eq!(
            result.outcomes[0].error_kind(),
            Some(ErrorKind::NameCollision)
        );
        assert_eq!(fs::read_to_string(root.join("A")).unwrap(), "a");
        assert_eq!(fs::read_to_string(root.join("B")).unwrap(), "b");
    }

    #[test]
    fn test_rename_pass_skips_filtered_names() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join(".git/old_refs")).unwrap();
        let engine = engine(&root, &[("old", "new")]);

        let result = engine.rename_paths().unwrap();
        assert!(root.join(".git/old_refs").is_dir());
        assert_eq!(result.summary.stats.changed, 0);
        assert_eq!(result.summary.stats.skipped, 1);
    }

    #[test]
    fn test_rename_root_runs_last() {
        let (dir, _) = setup();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_owned())
            .unwrap()
            .canonicalize_utf8()
            .unwrap();
        let root = base.join("OldProject");
        fs::create_dir_all(root.join("OldLib")).unwrap();

        let config = EngineConfig::new(&root).with_rename_root(true);
        let rules = RuleSet::from_pairs([("Old", "New")]).unwrap();
        let engine = Engine::new(config, rules).unwrap();

        let result = engine.rename_paths().unwrap();
        assert_eq!(result.summary.stats.changed, 2);
        assert!(base.join("NewProject/NewLib").is_dir());
        assert_eq!(result.outcomes.last().map(|o| o.path.clone()), Some(root));
    }

    #[test]
    fn test_plan_renames_does_not_touch_disk() {
        let (_dir, root) = setup();
        fs::write(root.join("old.txt"), "").unwrap();
        let engine = engine(&root, &[("old", "new")]);

        let plan = engine.plan_renames();
        assert_eq!(plan.len(), 1);
        assert!(root.join("old.txt").exists());
    }

    #[test]
    fn test_cancelled_engine_does_no_work() {
        let (_dir, root) = setup();
        fs::write(root.join("old.txt"), "old").unwrap();
        let engine = engine(&root, &[("old", "new")]);
        engine.clone().cancel();
        assert!(engine.is_cancelled());

        let content = engine.rewrite_content().unwrap();
        assert!(content.summary.cancelled);
        let rename = engine.rename_paths().unwrap();
        assert!(rename.summary.cancelled);
        assert_eq!(fs::read_to_string(root.join("old.txt")).unwrap(), "old");
    }
}
