//! Basename-only ignore rules, read from `.gitignore`-style files.
//!
//! Every rule is reduced to the final segment of its path, so `./node_modules/`
//! and `frontend/node_modules` both exclude any entry named `node_modules`.
//! A line starting with `#` re-includes the basename that follows it if that
//! basename is currently excluded, and is a plain comment otherwise.

use std::collections::HashSet;
use std::path::Path;

/// The set of basenames excluded in one directory scope.
///
/// Sets are plain values: a nested scope gets its own copy seeded from the
/// parent and extended by whatever rule file it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from rule text with nothing inherited.
    pub fn from_rules(content: &str) -> Self {
        Self::new().merge_rules(content)
    }

    /// Returns the set produced by applying `content`, line by line, on top of
    /// `self`. The receiver is left untouched.
    pub fn merge_rules(&self, content: &str) -> Self {
        let mut names = self.names.clone();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(marked) = trimmed.strip_prefix('#') {
                if let Some(name) = normalize_rule(marked) {
                    names.remove(name);
                }
                continue;
            }

            if let Some(name) = normalize_rule(trimmed) {
                names.insert(name.to_string());
            }
        }

        Self { names }
    }

    /// True iff the final component of `path` is excluded.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.names.contains(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reduces one rule to the basename it excludes.
///
/// Strips a single trailing `/` and a single leading `./`, then keeps the last
/// non-empty `/`-separated segment. Returns `None` when nothing is left.
fn normalize_rule(rule: &str) -> Option<&str> {
    let mut rule = rule.trim();
    if let Some(stripped) = rule.strip_suffix('/') {
        rule = stripped;
    }
    if let Some(stripped) = rule.strip_prefix("./") {
        rule = stripped;
    }

    rule.split('/').filter(|segment| !segment.is_empty()).last()
}
