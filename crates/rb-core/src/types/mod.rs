//! Domain types shared by both passes.
//!
//! # Module Organization
//!
//! - [`candidate`] - Paths discovered by the tree walk
//! - [`outcome`] - Per-path results and their status
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use rb_core::{Candidate, Outcome, OutcomeStatus, Pass};
//! ```

mod candidate;
mod outcome;

pub use candidate::{Candidate, EntryKind};
pub use outcome::{ErrorKind, Outcome, OutcomeError, OutcomeStatus, Pass};
