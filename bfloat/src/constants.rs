//! Constant table: named string values visible to every macro.
//!
//! The text format is line oriented:
//!
//! | Line | Action |
//! |------|--------|
//! | `key=value` | bind `key` (identifier chars only) to `value` (may be empty) |
//! | blank | ignored |
//! | `# …` | comment, ignored |
//! | anything else | [`Error::ConstantsSyntax`] for the whole table |
//!
//! Later definitions of the same key overwrite earlier ones.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Error, Result};

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)=([A-Za-z0-9_]*)$").expect("valid regex"));

/// Ordered `name → value` mapping, insertion ordered by first definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    values: IndexMap<String, String>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `key=value` text format.
    pub fn parse(src: &str) -> Result<Self> {
        let mut table = Self::new();
        for (i, raw) in src.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(caps) = LINE_RE.captures(line) else {
                return Err(Error::ConstantsSyntax {
                    line: i + 1,
                    text: line.to_owned(),
                });
            };
            table.set(&caps[1], &caps[2]);
        }
        Ok(table)
    }

    /// Bind (or rebind) a constant.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterate in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConstantTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
