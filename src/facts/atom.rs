//! Atom Normalization
//!
//! The only path from model text into fact syntax. Anything that ends up
//! inside a predicate goes through [`to_atom`] first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]+").unwrap());
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Fallback for absent text when no better one applies
pub const DEFAULT_FALLBACK: &str = "unknown";

/// Normalize free text into a lowercase atom.
///
/// 1. absent or empty text is replaced by `fallback`
/// 2. lowercase, every run of non-word characters becomes `_`
/// 3. repeated `_` collapse, leading/trailing `_` are trimmed
/// 4. an empty result is replaced by the normalized `fallback`, or by `x`
///    when that is empty too
/// 5. a result not starting with `a-z` gets an `x_` prefix
pub fn to_atom(text: Option<&str>, fallback: &str) -> String {
    let source = match text {
        Some(t) if !t.is_empty() => t,
        _ => fallback,
    };

    let mut atom = normalize(source);
    if atom.is_empty() {
        atom = normalize(fallback);
    }
    if atom.is_empty() {
        return "x".to_string();
    }

    if atom.starts_with(|c: char| c.is_ascii_lowercase()) {
        atom
    } else {
        format!("x_{atom}")
    }
}

fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced = NON_WORD.replace_all(&lowered, "_");
    let collapsed = UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// A normalized atom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Atom(String);

impl Atom {
    /// Normalize `text`, falling back to `fallback`
    pub fn new(text: Option<&str>, fallback: &str) -> Self {
        Self(to_atom(text, fallback))
    }

    /// Normalize a database value, falling back to [`DEFAULT_FALLBACK`]
    pub fn from_value(text: Option<&str>) -> Self {
        Self::new(text, DEFAULT_FALLBACK)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
