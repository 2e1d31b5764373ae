//! Macro definitions.
//!
//! A brainfloat macro is a named block of source text.  Macros take
//! positional arguments, referenced inside the body as `/0/`, `/1/`, …,
//! and are invoked from other macros as `name(arg, arg)`.  The macro named
//! [`crate::compiler::ENTRY_MACRO`] is the program entry point.
//!
//! [`MacroSet`] is handed to the compiler by shared reference, so it cannot
//! change while a compilation is in progress.

use std::collections::HashMap;

// ── Macro ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub content: String,
}

impl Macro {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

// ── MacroSet ──────────────────────────────────────────────────────────────────

/// Macros unique by name, kept in definition order.
#[derive(Debug, Clone, Default)]
pub struct MacroSet {
    macros: Vec<Macro>,
    by_name: HashMap<String, usize>,
}

impl MacroSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a macro, replacing any previous macro with the same name.
    ///
    /// Returns the replaced macro, if there was one.
    pub fn insert(&mut self, mac: Macro) -> Option<Macro> {
        match self.by_name.get(&mac.name) {
            Some(&idx) => Some(std::mem::replace(&mut self.macros[idx], mac)),
            None => {
                self.by_name.insert(mac.name.clone(), self.macros.len());
                self.macros.push(mac);
                None
            }
        }
    }

    /// Convenience wrapper around [`MacroSet::insert`].
    pub fn define(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.insert(Macro::new(name, content));
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.by_name.get(name).map(|&idx| &self.macros[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

impl FromIterator<Macro> for MacroSet {
    fn from_iter<T: IntoIterator<Item = Macro>>(iter: T) -> Self {
        let mut set = Self::new();
        for mac in iter {
            set.insert(mac);
        }
        set
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let mut set = MacroSet::new();
        set.define("program", "+.");
        assert_eq!(set.get("program").map(|m| m.content.as_str()), Some("+."));
        assert!(set.contains("program"));
        assert!(!set.contains("other"));
    }

    #[test]
    fn redefinition_replaces_in_place() {
        let mut set = MacroSet::new();
        set.define("a", "+");
        set.define("b", "-");
        let old = set.insert(Macro::new("a", "++"));
        assert_eq!(old, Some(Macro::new("a", "+")));
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().content, "++");
    }

    #[test]
    fn missing_returns_none() {
        let set = MacroSet::new();
        assert!(set.get("nope").is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn collect_from_iterator() {
        let set: MacroSet = vec![Macro::new("x", "<"), Macro::new("y", ">")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
