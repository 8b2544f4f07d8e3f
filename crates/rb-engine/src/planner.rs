//! Depth-ordered rename planning and execution.
//!
//! Renaming happens in two phases. [`RenamePlan::build`] looks at every
//! walked entry and records the ones whose name changes. Nothing on disk is
//! touched yet. [`RenamePlan::execute`] then renames them deepest first, so
//! when a directory is finally renamed everything below it already carries
//! its new name and every recorded path is still valid.
//!
//! # Ordering
//!
//! Entries run in strictly decreasing depth. Entries at the same depth run
//! in lexicographic order of their original path. The root, when it is
//! renamed at all, has depth 0 and therefore always runs last.
//!
//! # Examples
//!
//! ```ignore
//! use rb_engine::{PlanOptions, RenamePlan};
//!
//! let plan = RenamePlan::build(&walk.candidates, &rules, PlanOptions::default());
//! for entry in plan.entries() {
//!     println!("{} -> {}", entry.original, entry.target);
//! }
//! ```

use std::cmp::Reverse;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use rb_core::{Candidate, EntryKind, Outcome, Pass, RuleSet};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::EngineError;
use crate::report::{PassUpdate, emit};
use crate::stats::PassStats;

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    /// Current path.
    pub original: Utf8PathBuf,
    /// Same parent, new name.
    pub target: Utf8PathBuf,
    /// Depth below the root (the root is 0).
    pub depth: usize,
    /// What the path is.
    pub kind: EntryKind,
}

/// Options affecting which names are planned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Plan a rename of the root directory itself.
    pub rename_root: bool,
    /// Substitute only the stem of regular files.
    pub keep_extensions: bool,
}

/// The complete, ordered set of renames for one tree.
#[derive(Debug, Default)]
pub struct RenamePlan {
    entries: Vec<RenameEntry>,
    invalid: Vec<(Utf8PathBuf, EngineError)>,
    unchanged: Vec<Utf8PathBuf>,
}

impl RenamePlan {
    /// Plans renames for every candidate whose name changes under `rules`.
    ///
    /// Names that would become empty, `.` or `..`, or that would contain a
    /// path separator, are not planned; they are reported as errors when the
    /// plan executes.
    #[must_use]
    pub fn build(candidates: &[Candidate], rules: &RuleSet, options: PlanOptions) -> Self {
        let mut plan = Self::default();

        for candidate in candidates {
            if candidate.depth == 0 && !options.rename_root {
                continue;
            }
            let (Some(parent), Some(name)) = (candidate.path.parent(), candidate.file_name())
            else {
                continue;
            };

            let keep_extension = options.keep_extensions && candidate.kind == EntryKind::File;
            let Some(new_name) = substitute_name(name, rules, keep_extension) else {
                plan.unchanged.push(candidate.path.clone());
                continue;
            };

            if !is_valid_name(&new_name) {
                plan.invalid.push((
                    candidate.path.clone(),
                    EngineError::invalid_name(&candidate.path, new_name),
                ));
                continue;
            }

            plan.entries.push(RenameEntry {
                original: candidate.path.clone(),
                target: parent.join(&new_name),
                depth: candidate.depth,
                kind: candidate.kind,
            });
        }

        plan.entries
            .sort_by(|a, b| (Reverse(a.depth), &a.original).cmp(&(Reverse(b.depth), &b.original)));
        plan
    }

    /// Returns the planned renames in execution order.
    #[must_use]
    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    /// Returns the number of planned renames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing will be renamed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns paths whose substituted name is invalid.
    #[must_use]
    pub fn invalid(&self) -> &[(Utf8PathBuf, EngineError)] {
        &self.invalid
    }

    /// Returns paths whose name does not change.
    #[must_use]
    pub fn unchanged(&self) -> &[Utf8PathBuf] {
        &self.unchanged
    }

    /// Returns how many outcomes [`execute`](Self::execute) will report at
    /// most.
    #[must_use]
    pub fn reported_len(&self, report_unchanged: bool) -> usize {
        let unchanged = if report_unchanged { self.unchanged.len() } else { 0 };
        self.entries.len() + self.invalid.len() + unchanged
    }

    /// Executes the plan on a single thread.
    ///
    /// Invalid names (and, when `report_unchanged` is set, unchanged paths)
    /// are reported first. Then every entry is renamed in order. An entry
    /// whose target already exists is reported as a name collision and
    /// skipped; the rest continue.
    ///
    /// # Returns
    ///
    /// `true` if `cancel` was set before the plan finished. Cancellation is
    /// checked between renames, never during one.
    pub fn execute(
        self,
        tx: &mpsc::Sender<PassUpdate>,
        stats: &PassStats,
        cancel: &AtomicBool,
        report_unchanged: bool,
    ) -> bool {
        for (path, error) in self.invalid {
            emit(tx, stats, error.into_outcome(Pass::Rename, path));
        }
        if report_unchanged {
            for path in self.unchanged {
                emit(tx, stats, Outcome::unchanged(Pass::Rename, path));
            }
        }

        debug!(renames = self.entries.len(), "Executing rename plan");
        for entry in self.entries {
            if cancel.load(Ordering::Relaxed) {
                return true;
            }
            let outcome = match rename_entry(&entry) {
                Ok(()) => {
                    trace!(from = %entry.original, to = %entry.target, "Renamed");
                    Outcome::renamed(entry.original, entry.target)
                }
                Err(e) => e.into_outcome(Pass::Rename, entry.original),
            };
            emit(tx, stats, outcome);
        }

        false
    }
}

fn rename_entry(entry: &RenameEntry) -> Result<(), EngineError> {
    // symlink_metadata so a dangling link at the target still counts.
    if fs::symlink_metadata(&entry.target).is_ok() {
        return Err(EngineError::collision(&entry.original, &entry.target));
    }
    fs::rename(&entry.original, &entry.target)
        .map_err(|e| EngineError::rename(&entry.original, &entry.target, e))
}

/// Applies the rules to a file name, optionally leaving its extension alone.
fn substitute_name(name: &str, rules: &RuleSet, keep_extension: bool) -> Option<String> {
    if keep_extension {
        let path = Utf8Path::new(name);
        if let (Some(stem), Some(extension)) = (path.file_stem(), path.extension()) {
            return rules
                .rename(stem)
                .map(|new_stem| format!("{new_stem}.{extension}"));
        }
    }
    rules.rename(name)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('\0')
        && !name.chars().any(std::path::is_separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::{ErrorKind, OutcomeStatus};
    use tempfile::TempDir;

    fn candidate(path: &str, kind: EntryKind) -> Candidate {
        let depth = Utf8Path::new(path).components().count() - 1;
        Candidate::new(path, kind, depth)
    }

    fn rules() -> RuleSet {
        RuleSet::from_pairs([("Old", "New"), ("old", "new")]).unwrap()
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
    fn test_build_orders_deepest_first() {
        let candidates = vec![
            candidate("root", EntryKind::Directory),
            candidate("root/OldDir", EntryKind::Directory),
            candidate("root/OldDir/OldDir", EntryKind::Directory),
            candidate("root/OldDir/OldDir/file_old.txt", EntryKind::File),
            candidate("root/OldDir/b_old", EntryKind::File),
            candidate("root/OldDir/a_old", EntryKind::File),
            candidate("root/keep.txt", EntryKind::File),
        ];
        let plan = RenamePlan::build(&candidates, &rules(), PlanOptions::default());

        let order: Vec<_> = plan
            .entries()
            .iter()
            .map(|e| (e.original.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("root/OldDir/OldDir/file_old.txt", "root/OldDir/OldDir/file_new.txt"),
                ("root/OldDir/OldDir", "root/OldDir/NewDir"),
                ("root/OldDir/a_old", "root/OldDir/a_new"),
                ("root/OldDir/b_old", "root/OldDir/b_new"),
                ("root/OldDir", "root/NewDir"),
            ]
        );
        assert_eq!(plan.unchanged(), &[Utf8PathBuf::from("root/keep.txt")]);
    }

    #[test]
    fn test_build_root_only_when_enabled() {
        let candidates = vec![Candidate::new("work/OldRoot", EntryKind::Directory, 0)];

        let plan = RenamePlan::build(&candidates, &rules(), PlanOptions::default());
        assert!(plan.is_empty());
        assert!(plan.unchanged().is_empty());

        let options = PlanOptions {
            rename_root: true,
            ..PlanOptions::default()
        };
        let plan = RenamePlan::build(&candidates, &rules(), options);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].target, Utf8PathBuf::from("work/NewRoot"));
    }

    #[test]
    fn test_build_keep_extensions() {
        let rules = RuleSet::from_pairs([("txt", "md")]).unwrap();
        let candidates = vec![
            candidate("root/notes.txt", EntryKind::File),
            candidate("root/txt_notes.txt", EntryKind::File),
            candidate("root/dir.txt", EntryKind::Directory),
        ];
        let options = PlanOptions {
            keep_extensions: true,
            ..PlanOptions::default()
        };
        let plan = RenamePlan::build(&candidates, &rules, options);

        let targets: Vec<_> = plan.entries().iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["root/dir.md", "root/md_notes.txt"]);
        assert_eq!(plan.unchanged(), &[Utf8PathBuf::from("root/notes.txt")]);
    }

    #[test]
    fn test_build_rejects_invalid_names() {
        let rules = RuleSet::from_pairs([("bad", "a/b"), ("gone", "")]).unwrap();
        let candidates = vec![
            candidate("root/bad", EntryKind::File),
            candidate("root/gone", EntryKind::File),
        ];
        let plan = RenamePlan::build(&candidates, &rules, PlanOptions::default());
        assert!(plan.is_empty());
        assert_eq!(plan.invalid().len(), 2);
        assert_eq!(plan.reported_len(false), 2);
    }

    #[test]
    fn test_execute_renames_tree() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        fs::create_dir_all(root.join("OldDir/OldDir")).unwrap();
        fs::write(root.join("OldDir/OldDir/file_old.txt"), "x").unwrap();

        let candidates = vec![
            Candidate::new(root.join("OldDir"), EntryKind::Directory, 1),
            Candidate::new(root.join("OldDir/OldDir"), EntryKind::Directory, 2),
            Candidate::new(root.join("OldDir/OldDir/file_old.txt"), EntryKind::File, 3),
        ];
        let plan = RenamePlan::build(&candidates, &rules(), PlanOptions::default());
        let (tx, rx) = mpsc::channel(16);
        let stats = PassStats::new();

        let cancelled = plan.execute(&tx, &stats, &AtomicBool::new(false), false);
        drop(tx);

        assert!(!cancelled);
        assert!(root.join("NewDir/NewDir/file_new.txt").is_file());
        assert!(!root.join("OldDir").exists());
        let outcomes = drain(rx);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Renamed));
    }

    #[test]
    fn test_execute_collision_keeps_both() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        fs::write(root.join("A"), "a").unwrap();
        fs::write(root.join("B"), "b").unwrap();
        fs::write(root.join("A2"), "a2").unwrap();

        let rules = RuleSet::from_pairs([("A", "B")]).unwrap();
        let candidates = vec![
            Candidate::new(root.join("A"), EntryKind::File, 1),
            Candidate::new(root.join("A2"), EntryKind::File, 1),
            Candidate::new(root.join("B"), EntryKind::File, 1),
        ];
        let plan = RenamePlan::build(&candidates, &rules, PlanOptions::default());
        let (tx, rx) = mpsc::channel(16);
        let stats = PassStats::new();
        plan.execute(&tx, &stats, &AtomicBool::new(false), true);
        drop(tx);

        assert_eq!(fs::read_to_string(root.join("A")).unwrap(), "a");
        assert_eq!(fs::read_to_string(root.join("B")).unwrap(), "b");
        assert_eq!(fs::read_to_string(root.join("B2")).unwrap(), "a2");

        let outcomes = drain(rx);
        let collision = outcomes
            .iter()
            .find(|o| o.path == root.join("A"))
            .unwrap();
        assert_eq!(collision.error_kind(), Some(ErrorKind::NameCollision));
        assert_eq!(collision.new_path.as_ref(), Some(&root.join("B")));
        assert!(outcomes
            .iter()
            .any(|o| o.path == root.join("B") && o.status == OutcomeStatus::Unchanged));
        assert_eq!(stats.snapshot().errors, 1);
        assert_eq!(stats.snapshot().changed, 1);
    }

    #[test]
    fn test_execute_stops_when_cancelled() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        fs::write(root.join("old_a"), "").unwrap();

        let candidates = vec![Candidate::new(root.join("old_a"), EntryKind::File, 1)];
        let plan = RenamePlan::build(&candidates, &rules(), PlanOptions::default());
        let (tx, rx) = mpsc::channel(4);

        let cancelled = plan.execute(&tx, &PassStats::new(), &AtomicBool::new(true), false);
        drop(tx);

        assert!(cancelled);
        assert!(root.join("old_a").exists());
        assert!(drain(rx).is_empty());
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("file.txt"));
        assert!(is_valid_name(".hidden"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
    }
}
