//! Single-file content rewriting.
//!
//! [`rewrite`] reads one file, applies the rule set, and replaces the file
//! only when the text changed. The replacement is written to a temporary
//! file in the same directory, synced, given the original permissions, and
//! renamed over the original, so a reader sees either the old or the new
//! contents and never a partial write.

use std::fs;
use std::io::Write;

use camino::Utf8Path;
use rb_core::{Outcome, Pass, RuleSet};
use tracing::trace;

use crate::encoding::{Detection, detect};
use crate::error::EngineError;

/// Prefix of temporary files created next to the file being replaced.
pub const TEMP_PREFIX: &str = ".rebrand-";

/// Rewrites the contents of one file.
///
/// Never fails: every problem becomes an error [`Outcome`].
///
/// - Binary files are reported as skipped and never opened for writing.
/// - Files with no match are reported unchanged and left untouched.
/// - Otherwise the text is re-encoded with the encoding it was read with.
///   If a substituted character has no representation there, the file is
///   left as it was and an encoding error is reported.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use rb_core::{OutcomeStatus, RuleSet};
///
/// let rules = RuleSet::from_pairs([("foo", "baz")])?;
/// let outcome = rb_engine::rewrite(Utf8Path::new("notes.txt"), &rules);
/// assert!(matches!(outcome.status, OutcomeStatus::Rewritten | OutcomeStatus::Unchanged));
/// # Ok::<(), rb_core::ConfigError>(())
/// ```
#[must_use]
pub fn rewrite(path: &Utf8Path, rules: &RuleSet) -> Outcome {
    try_rewrite(path, rules).unwrap_or_else(|e| e.into_outcome(Pass::Content, path))
}

fn try_rewrite(path: &Utf8Path, rules: &RuleSet) -> Result<Outcome, EngineError> {
    let bytes = fs::read(path).map_err(|e| EngineError::read(path, e))?;

    let encoding = match detect(&bytes) {
        Detection::Binary => return Ok(Outcome::skipped_binary(path)),
        Detection::Text(encoding) => encoding,
    };
    // Detection only returns encodings that decode the buffer and encode the
    // decoded text back to the same bytes.
    let Some(text) = encoding.decode(&bytes) else {
        return Ok(Outcome::skipped_binary(path));
    };

    let replaced = rules.apply(&text);
    if replaced == text {
        return Ok(Outcome::unchanged(Pass::Content, path).with_encoding(encoding.name()));
    }

    let encoded = encoding
        .encode(&replaced)
        .ok_or_else(|| EngineError::encode(path, encoding.name()))?;
    replace_atomically(path, &encoded)?;

    trace!(path = %path, encoding = %encoding, "Rewrote file");
    Ok(Outcome::rewritten(path, encoding.name()))
}

/// Replaces `path` with `contents` via a synced temporary file in the same
/// directory.
///
/// The temporary file is removed if anything fails before the final rename.
fn replace_atomically(path: &Utf8Path, contents: &[u8]) -> Result<(), EngineError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let permissions = fs::metadata(path)
        .map_err(|e| EngineError::read(path, e))?
        .permissions();

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| EngineError::write(path, e))?;
    temp.write_all(contents)
        .map_err(|e| EngineError::write(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| EngineError::write(path, e))?;
    fs::set_permissions(temp.path(), permissions).map_err(|e| EngineError::write(path, e))?;
    temp.persist(path)
        .map_err(|e| EngineError::write(path, e.error))?;
    Ok(())
}
