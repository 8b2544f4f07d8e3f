//! Core types, rule sets, configuration and errors for the rebrand tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`RuleSet`]: the ordered, immutable old→new token mapping
//! - [`Config`]: run settings (workers, skip list, traversal options)
//! - [`Outcome`]: the per-path result produced by every pass
//! - [`ConfigError`]: configuration and rule-loading failures

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod rules;
pub mod types;

pub use config::{Config, RunConfig, SkipConfig, DEFAULT_MAX_WORKERS};
pub use error::ConfigError;
pub use rules::{Rule, RuleSet, RuleSetBuilder, RuleWarning, RuleWarningKind};
pub use types::{Candidate, EntryKind, ErrorKind, Outcome, OutcomeError, OutcomeStatus, Pass};
