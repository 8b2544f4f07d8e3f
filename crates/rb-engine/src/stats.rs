//! Pass statistics with atomic counters.
//!
//! This module provides [`PassStats`] for counting outcomes while a pass runs
//! and [`StatsSnapshot`] / [`PassSummary`] for the per-pass summary.
//!
//! # Thread Safety
//!
//! All counters use [`AtomicU64`] with [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering. Statistics are informational and only read once workers finish.
//!
//! # Examples
//!
//! ```
//! use rb_core::{Outcome, Pass};
//! use rb_engine::PassStats;
//!
//! let stats = PassStats::new();
//! stats.record(&Outcome::rewritten("a.txt", "utf-8"));
//! stats.record(&Outcome::unchanged(Pass::Content, "b.txt"));
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.total, 2);
//! assert_eq!(snapshot.changed, 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rb_core::{Outcome, OutcomeStatus, Pass};
use serde::{Deserialize, Serialize};

/// Atomic counters for one pass.
#[derive(Debug, Default)]
pub struct PassStats {
    /// Outcomes recorded.
    total: AtomicU64,
    /// Rewritten files or renamed paths.
    changed: AtomicU64,
    /// Paths no rule affected.
    unchanged: AtomicU64,
    /// Binary or filtered paths.
    skipped: AtomicU64,
    /// Failed paths.
    errors: AtomicU64,
}

impl PassStats {
    /// Creates a new [`PassStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one outcome.
    pub fn record(&self, outcome: &Outcome) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome.status {
            OutcomeStatus::Rewritten | OutcomeStatus::Renamed => &self.changed,
            OutcomeStatus::Unchanged => &self.unchanged,
            OutcomeStatus::SkippedBinary | OutcomeStatus::SkippedFiltered => &self.skipped,
            _ => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            changed: self.changed.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`PassStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Outcomes recorded.
    pub total: u64,
    /// Rewritten files (content pass) or renamed paths (rename pass).
    pub changed: u64,
    /// Paths no rule affected.
    pub unchanged: u64,
    /// Binary or filtered paths.
    pub skipped: u64,
    /// Failed paths.
    pub errors: u64,
}

impl StatsSnapshot {
    /// Returns `true` if no outcome was an error.
    #[inline]
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Final statistics of one pass.
///
/// Displays as the human-readable summary printed after each pass:
///
/// ```text
/// content pass: 12 paths
///   rewritten  4
///   unchanged  6
///   skipped    1
///   errors     1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Which pass ran.
    pub pass: Pass,
    /// Final counters.
    pub stats: StatsSnapshot,
    /// Whether the pass stopped early on cancellation.
    pub cancelled: bool,
}

impl PassSummary {
    /// Label used for [`StatsSnapshot::changed`] in this pass.
    #[must_use]
    pub const fn changed_label(&self) -> &'static str {
        match self.pass {
            Pass::Content => "rewritten",
            Pass::Rename => "renamed",
        }
    }
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} pass: {} paths", self.pass, self.stats.total)?;
        writeln!(f, "  {:<11}{}", self.changed_label(), self.stats.changed)?;
        writeln!(f, "  {:<11}{}", "unchanged", self.stats.unchanged)?;
        writeln!(f, "  {:<11}{}", "skipped", self.stats.skipped)?;
        write!(f, "  {:<11}{}", "errors", self.stats.errors)?;
        if self.cancelled {
            write!(f, "\n  cancelled before completion")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::ErrorKind;

    #[test]
    fn test_pass_stats_new() {
        let snap = PassStats::new().snapshot();
        assert_eq!(snap, StatsSnapshot::default());
        assert!(snap.is_clean());
    }

    #[test]
    fn test_pass_stats_record() {
        let stats = PassStats::new();
        stats.record(&Outcome::rewritten("a", "utf-8"));
        stats.record(&Outcome::renamed("b", "c"));
        stats.record(&Outcome::unchanged(Pass::Content, "d"));
        stats.record(&Outcome::skipped_binary("e"));
        stats.record(&Outcome::skipped_filtered(Pass::Rename, "f"));
        stats.record(&Outcome::failed(Pass::Content, "g", ErrorKind::Io, "denied"));

        let snap = stats.snapshot();
        assert_eq!(snap.total, 6);
        assert_eq!(snap.changed, 2);
        assert_eq!(snap.unchanged, 1);
        assert_eq!(snap.skipped, 2);
        assert_eq!(snap.errors, 1);
        assert!(!snap.is_clean());
    }

    #[test]
    fn test_content_summary_display() {
        let summary = PassSummary {
            pass: Pass::Content,
            stats: StatsSnapshot {
                total: 12,
                changed: 4,
                unchanged: 6,
                skipped: 1,
                errors: 1,
            },
            cancelled: false,
        };
        insta::assert_snapshot!(summary.to_string(), @r"
        content pass: 12 paths
          rewritten  4
          unchanged  6
          skipped    1
          errors     1
        ");
    }

    #[test]
    fn test_cancelled_rename_summary_display() {
        let summary = PassSummary {
            pass: Pass::Rename,
            stats: StatsSnapshot {
                total: 3,
                changed: 2,
                unchanged: 1,
                ..StatsSnapshot::default()
            },
            cancelled: true,
        };
        let text = summary.to_string();
        assert!(text.starts_with("rename pass: 3 paths\n  renamed    2\n"));
        assert!(text.ends_with("cancelled before completion"));
    }

    #[test]
    fn test_summary_serialization() {
        let summary = PassSummary {
            pass: Pass::Content,
            stats: StatsSnapshot::default(),
            cancelled: false,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: PassSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, parsed);
    }
}
