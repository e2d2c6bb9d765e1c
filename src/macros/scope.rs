//! Ordered macro sets and scope merging.

use std::fmt;

use indexmap::IndexMap;

use super::expand::MacroLookup;

/// Ordered name -> value map of text macros.
///
/// Insertion order is kept so written files list macros the way they were
/// defined. Re-adding a name replaces its value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Macros {
    entries: IndexMap<String, String>,
}

impl Macros {
    /// Create an empty macro set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a macro (builder).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Add or replace a macro.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Remove a macro, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Value of a macro.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether a macro is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Macro names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of macros.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `overlay` on top of `self`: names defined in both take the
    /// overlay's value.
    pub fn merged(&self, overlay: &Macros) -> Macros {
        let mut result = self.clone();
        for (name, value) in overlay.iter() {
            result.add(name, value);
        }
        result
    }

    /// Expand `$(NAME)` and `${NAME}` references in `text` against this set.
    pub fn expand(&self, text: &str) -> String {
        super::expand::expand(text, self)
    }
}

impl MacroLookup for Macros {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Macros {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut macros = Macros::new();
        for (name, value) in iter {
            macros.add(name, value);
        }
        macros
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
