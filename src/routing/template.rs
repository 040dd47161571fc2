//! Route template values.
//!
//! # Responsibilities
//! - Hold an immutable route-path fragment
//! - Provide the case-insensitive comparison key
//! - Join two templates at a single path separator
//!
//! # Design Decisions
//! - Equality and hashing use the normalized key, display uses the raw text
//! - Combining always builds a fresh template; inputs are never mutated
//! - Contents are opaque: placeholders, wildcards and constraints pass through

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

const SEPARATOR: char = '/';

/// Returns the comparison key for a template string.
///
/// Only letter case is folded; every other character is kept as-is.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
}

/// Which operand of [`combine`] ends up in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineSide {
    /// The prefix goes in front: `prefix/existing`.
    #[default]
    Left,
    /// The prefix goes behind: `existing/prefix`.
    Right,
}

/// An immutable route template.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct Template {
    raw: String,
    key: String,
}

impl Template {
    /// Create a template from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = normalize(&raw);
        Self { raw, key }
    }

    /// The template text as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalized comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.raw
    }
}

/// Join `prefix` and `existing` into a new template.
///
/// With [`CombineSide::Left`] the prefix leads; with [`CombineSide::Right`]
/// the operands are swapped first. Separators at the join point collapse to
/// one. An operand that is empty once its join-side separators are removed
/// contributes nothing.
pub fn combine(prefix: &Template, existing: &Template, side: CombineSide) -> Template {
    let (left, right) = match side {
        CombineSide::Left => (prefix.as_str(), existing.as_str()),
        CombineSide::Right => (existing.as_str(), prefix.as_str()),
    };

    let left = left.trim_end_matches(SEPARATOR);
    let right = right.trim_start_matches(SEPARATOR);

    let joined = match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (false, true) => left.to_string(),
        (false, false) => format!("{left}{SEPARATOR}{right}"),
    };

    Template::new(joined)
}
