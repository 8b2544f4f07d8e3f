//! The ordered old→new token mapping that drives both passes.
//!
//! A [`RuleSet`] is immutable once built and is passed by reference into
//! every operation. Substitution is literal and case-sensitive and happens in
//! a single left-to-right pass: at each position the leftmost match wins, and
//! when several rules match at the same position the one declared first wins.
//! Replacement output is never scanned again, so `a→b` followed by `b→c`
//! turns `ab` into `bc`, not `cc`.
//!
//! Rules come from rule files (one whitespace-separated `old new` pair per
//! line) and from literal `OLD=NEW` arguments, collected through
//! [`RuleSetBuilder`].
//!
//! # Examples
//!
//! ```
//! use rb_core::RuleSet;
//!
//! let rules = RuleSet::from_pairs([("foo", "baz")]).unwrap();
//! assert_eq!(rules.apply("foo bar foo"), "baz bar baz");
//! assert_eq!(rules.apply("Foo"), "Foo");
//! ```

use std::borrow::Cow;
use std::fmt;

use aho_corasick::{AhoCorasick, MatchKind};
use camino::Utf8Path;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A single substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// The token to look for. Never empty inside a [`RuleSet`].
    pub old: String,
    /// The replacement token. May be empty.
    pub new: String,
}

impl Rule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Parses a literal `OLD=NEW` rule.
    ///
    /// Only the first `=` separates the tokens, so `a=b=c` maps `a` to `b=c`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRule`] if there is no `=` or `OLD` is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_core::Rule;
    ///
    /// let rule = Rule::parse_literal("Acme=Globex").unwrap();
    /// assert_eq!(rule.old, "Acme");
    /// assert_eq!(rule.new, "Globex");
    /// assert!(Rule::parse_literal("=Globex").is_err());
    /// ```
    pub fn parse_literal(literal: &str) -> Result<Self, ConfigError> {
        let Some((old, new)) = literal.split_once('=') else {
            return Err(ConfigError::InvalidRule {
                rule: literal.to_owned(),
                reason: "expected OLD=NEW".to_owned(),
            });
        };
        if old.is_empty() {
            return Err(ConfigError::InvalidRule {
                rule: literal.to_owned(),
                reason: "OLD must not be empty".to_owned(),
            });
        }
        Ok(Self::new(old, new))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old, self.new)
    }
}

/// Why a rule was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleWarningKind {
    /// The line did not contain exactly two whitespace-separated tokens.
    Malformed(String),
    /// The rule had an empty `old` token.
    EmptyToken,
    /// An earlier rule already maps this `old` token.
    Duplicate(String),
}

/// A non-fatal problem found while loading rules.
///
/// The offending rule is dropped; loading continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWarning {
    /// Where the rule came from, e.g. `rules.txt:12` or `--rule`.
    pub origin: String,
    /// What was wrong with it.
    pub kind: RuleWarningKind,
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuleWarningKind::Malformed(line) => write!(
                f,
                "{}: skipping malformed rule '{line}' (expected 'old new')",
                self.origin
            ),
            RuleWarningKind::EmptyToken => {
                write!(f, "{}: skipping rule with empty token", self.origin)
            }
            RuleWarningKind::Duplicate(old) => write!(
                f,
                "{}: skipping duplicate rule for '{old}' (first definition wins)",
                self.origin
            ),
        }
    }
}

/// Collects rules from files and literals, then builds a [`RuleSet`].
///
/// Order of insertion is the order of application priority.
///
/// # Examples
///
/// ```
/// use rb_core::{Rule, RuleSetBuilder};
///
/// let mut builder = RuleSetBuilder::new();
/// builder.add_source("inline", "Acme Globex\n# comment\nbroken line here\n");
/// builder.add(Rule::new("acme", "globex"), "--rule");
///
/// assert_eq!(builder.warnings().len(), 1);
/// let rules = builder.build().unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    seen: FxHashSet<String>,
    warnings: Vec<RuleWarning>,
}

impl RuleSetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one rule. Returns `false` if it was dropped with a warning.
    pub fn add(&mut self, rule: Rule, origin: impl Into<String>) -> bool {
        if rule.old.is_empty() {
            self.warn(origin, RuleWarningKind::EmptyToken);
            return false;
        }
        if !self.seen.insert(rule.old.clone()) {
            self.warn(origin, RuleWarningKind::Duplicate(rule.old));
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Parses rule-file text and adds every well-formed line.
    ///
    /// Blank lines and lines starting with `#` are ignored. Lines that do
    /// not split into exactly two whitespace-separated tokens are dropped
    /// with a [`RuleWarningKind::Malformed`] warning.
    pub fn add_source(&mut self, origin: &str, text: &str) {
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let location = format!("{origin}:{}", index + 1);
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(old), Some(new), None) => {
                    self.add(Rule::new(old, new), location);
                }
                _ => self.warn(location, RuleWarningKind::Malformed(line.to_owned())),
            }
        }
    }

    /// Reads a rule file and adds its rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] if the file cannot be read.
    pub fn add_file(&mut self, path: &Utf8Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path.as_std_path())
            .map_err(|e| ConfigError::read_file(path, e))?;
        self.add_source(path.as_str(), &text);
        Ok(())
    }

    /// Returns the warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }

    /// Returns the number of accepted rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Builds the immutable rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRuleSet`] if no rule was accepted.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        RuleSet::new(self.rules)
    }

    fn warn(&mut self, origin: impl Into<String>, kind: RuleWarningKind) {
        self.warnings.push(RuleWarning {
            origin: origin.into(),
            kind,
        });
    }
}

/// An immutable, ordered set of substitution rules.
///
/// Cheap to share by reference across worker threads.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    matcher: AhoCorasick,
}

impl RuleSet {
    fn new(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(rules.iter().map(|rule| rule.old.as_str()))?;
        Ok(Self { rules, matcher })
    }

    /// Builds a rule set directly from `(old, new)` pairs.
    ///
    /// Duplicate `old` tokens keep their first definition.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRule`] if an `old` token is empty and
    /// [`ConfigError::EmptyRuleSet`] if no pair is given.
    pub fn from_pairs<I, O, N>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        let mut builder = RuleSetBuilder::new();
        for (old, new) in pairs {
            let rule = Rule::new(old, new);
            if rule.old.is_empty() {
                return Err(ConfigError::InvalidRule {
                    rule: rule.to_string(),
                    reason: "OLD must not be empty".to_owned(),
                });
            }
            builder.add(rule, "pairs");
        }
        builder.build()
    }

    /// Returns the rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always `false`; an empty rule set cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if any rule matches somewhere in `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Applies every rule to `text` in a single pass.
    ///
    /// Borrows the input when nothing matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_core::RuleSet;
    ///
    /// let rules = RuleSet::from_pairs([("Cat", "Dog"), ("CatDog", "Bird")]).unwrap();
    /// // Declared first, so `Cat` wins at the shared start position.
    /// assert_eq!(rules.apply("CatDog.txt"), "DogDog.txt");
    /// ```
    #[must_use]
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.matches(text) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        self.matcher.replace_all_with(text, &mut out, |mat, _, dst| {
            dst.push_str(&self.rules[mat.pattern().as_usize()].new);
            true
        });
        Cow::Owned(out)
    }

    /// Applies the rules to a single path component.
    ///
    /// Returns `None` when the name would not change.
    #[must_use]
    pub fn rename(&self, name: &str) -> Option<String> {
        match self.apply(name) {
            Cow::Owned(renamed) if renamed != name => Some(renamed),
            _ => None,
        }
    }
}
