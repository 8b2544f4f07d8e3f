//! Parallel content rewriting using a bounded rayon pool.
//!
//! This module provides [`ContentDispatcher`], which runs [`rewrite`] over a
//! list of files on a dedicated thread pool and streams every outcome to the
//! report thread.
//!
//! # Design
//!
//! Uses the "collect-then-parallelize" pattern:
//!
//! 1. Paths are collected first by [`FileWalker`](crate::FileWalker)
//! 2. `ContentDispatcher` processes them with `par_iter()` on its own pool
//! 3. Each rayon thread clones the channel sender once via `for_each_init()`
//!
//! Files share no state, so no lock is held across files.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rb_core::{Candidate, RuleSet};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::EngineError;
use crate::report::{PassUpdate, emit};
use crate::rewriter::rewrite;
use crate::stats::PassStats;

/// Runs the content rewriter over many files in parallel.
///
/// # Examples
///
/// ```ignore
/// use rb_engine::ContentDispatcher;
///
/// let dispatcher = ContentDispatcher::new(8);
/// let cancelled = dispatcher.dispatch(&files, &rules, &tx, &stats, &cancel)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContentDispatcher {
    workers: usize,
}

impl ContentDispatcher {
    /// Creates a dispatcher with `workers` threads (at least one).
    #[inline]
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the number of worker threads.
    #[inline]
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Rewrites every file in `files`, sending one outcome per started file.
    ///
    /// `cancel` is checked before each file. Once it is set, files that have
    /// not started are left alone and produce no outcome; files already in
    /// flight finish normally.
    ///
    /// # Returns
    ///
    /// `true` if the pass stopped early because of `cancel`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Pool`] if the worker pool cannot be created.
    /// Per-file failures are reported as outcomes instead.
    pub fn dispatch(
        &self,
        files: &[Candidate],
        rules: &RuleSet,
        tx: &mpsc::Sender<PassUpdate>,
        stats: &PassStats,
        cancel: &AtomicBool,
    ) -> Result<bool, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("rebrand-worker-{i}"))
            .build()?;

        debug!(files = files.len(), workers = self.workers, "Dispatching content rewrites");

        pool.install(|| {
            files.par_iter().for_each_init(
                || tx.clone(),
                |sender, candidate| {
                    if cancel.load(Ordering::Relaxed) {
                        return;
                    }
                    emit(sender, stats, rewrite(&candidate.path, rules));
                },
            );
        });

        Ok(cancel.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rb_core::{EntryKind, Outcome, OutcomeStatus};
    use std::fs;
    use tempfile::TempDir;

    fn setup(count: usize) -> (TempDir, Vec<Candidate>) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        let files = (0..count)
            .map(|i| {
                let path = root.join(format!("f{i}.txt"));
                fs::write(&path, format!("foo {i}")).unwrap();
                Candidate::new(path, EntryKind::File, 1)
            })
            .collect();
        (dir, files)
    }

    fn drain(mut rx: mpsc::Receiver<PassUpdate>) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(update) = rx.try_recv() {
            if let PassUpdate::Outcome(outcome) = update {
                outcomes.push(*outcome);
            }
        }
        outcomes
    }

    #[test]
    fn test_dispatch_rewrites_every_file_once() {
        let (_dir, files) = setup(20);
        let rules = RuleSet::from_pairs([("foo", "bar")]).unwrap();
        let (tx, rx) = mpsc::channel(64);
        let stats = PassStats::new();

        let cancelled = ContentDispatcher::new(4)
            .dispatch(&files, &rules, &tx, &stats, &AtomicBool::new(false))
            .unwrap();
        drop(tx);

        assert!(!cancelled);
        let outcomes = drain(rx);
        assert_eq!(outcomes.len(), 20);
        assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Rewritten));
        assert_eq!(stats.snapshot().changed, 20);
        for file in &files {
            assert!(fs::read_to_string(&file.path).unwrap().starts_with("bar "));
        }
    }

    #[test]
    fn test_dispatch_cancelled_before_start() {
        let (_dir, files) = setup(5);
        let rules = RuleSet::from_pairs([("foo", "bar")]).unwrap();
        let (tx, rx) = mpsc::channel(16);
        let stats = PassStats::new();

        let cancelled = ContentDispatcher::new(2)
            .dispatch(&files, &rules, &tx, &stats, &AtomicBool::new(true))
            .unwrap();
        drop(tx);

        assert!(cancelled);
        assert!(drain(rx).is_empty());
        for file in &files {
            assert!(fs::read_to_string(&file.path).unwrap().starts_with("foo "));
        }
    }

    #[test]
    fn test_dispatcher_has_at_least_one_worker() {
        assert_eq!(ContentDispatcher::new(0).workers(), 1);
        assert_eq!(ContentDispatcher::new(3).workers(), 3);
    }
}
