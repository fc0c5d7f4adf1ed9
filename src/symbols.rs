//! # symbols
//!
//! The interpreter's variable store: an insertion-ordered map from symbol
//! name to [`SymbolEntry`], built on [`indexmap::IndexMap`] so `list` can show
//! entries in the order they were first defined. Keys are unique by
//! construction; storing to an existing name updates that entry in place.
//!
//! ## Example
//! ```rust
//! # use strp::symbols::{SymbolTable, SymbolError};
//! let mut table = SymbolTable::new();
//! table.set("x", "ab".to_string()).unwrap();
//! table.set("x", "cd".to_string()).unwrap();
//! assert_eq!(table.get("x").unwrap(), "cd");
//! assert_eq!(table.len(), 1);
//!
//! table.define_readonly("PI", "3.14".to_string());
//! assert!(matches!(table.set("PI", "3".to_string()), Err(SymbolError::ReadOnly { .. })));
//! ```

use indexmap::{map::Entry, IndexMap};
use std::fmt;
use thiserror::Error;

/// Errors raised by [`SymbolTable`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The symbol has never been defined.
    #[error("Cannot find symbol {name}")]
    Undefined { name: String },

    /// The symbol exists but may not change.
    #[error("Cannot change value of symbol {name} as it's readonly")]
    ReadOnly { name: String },
}

/// A named value. Only the table hands out mutable access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    name: String,
    value: String,
    readonly: bool,
}

impl SymbolEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }
}

impl fmt::Display for SymbolEntry {
    /// `name -> "escaped value" [readonly]`, the line `list` prints.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} -> {} {}",
            self.name,
            crate::text::dump(&self.value),
            if self.readonly { "[readonly]" } else { "" }
        )
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// A table holding the constants every session starts with.
    pub fn with_constants() -> Self {
        let mut table = Self::new();
        table.define_readonly("SPACE", " ".to_string());
        table.define_readonly("TAB", "\t".to_string());
        table.define_readonly("NEWLINE", "\n".to_string());
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&str, SymbolError> {
        self.entries
            .get(name)
            .map(SymbolEntry::value)
            .ok_or_else(|| SymbolError::Undefined {
                name: name.to_string(),
            })
    }

    /// Stores `value` under `name`, creating a writable entry if needed.
    pub fn set(&mut self, name: &str, value: String) -> Result<(), SymbolError> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(mut o) => {
                let entry = o.get_mut();
                if entry.readonly {
                    return Err(SymbolError::ReadOnly {
                        name: name.to_string(),
                    });
                }
                entry.value = value;
            }
            Entry::Vacant(v) => {
                v.insert(SymbolEntry {
                    name: name.to_string(),
                    value,
                    readonly: false,
                });
            }
        }
        Ok(())
    }

    /// Seeds a constant. Replaces any entry of the same name, readonly or not.
    pub fn define_readonly(&mut self, name: &str, value: String) {
        self.entries.insert(
            name.to_string(),
            SymbolEntry {
                name: name.to_string(),
                value,
                readonly: true,
            },
        );
    }

    pub fn list(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_seeded_in_order() {
        let table = SymbolTable::with_constants();
        let names: Vec<&str> = table.list().map(SymbolEntry::name).collect();
        assert_eq!(names, vec!["SPACE", "TAB", "NEWLINE"]);
        assert!(table.list().all(SymbolEntry::readonly));
        assert_eq!(table.get("TAB").unwrap(), "\t");
    }

    #[test]
    fn set_overwrites_instead_of_duplicating() {
        let mut table = SymbolTable::new();
        table.set("a", "1".to_string()).unwrap();
        table.set("b", "2".to_string()).unwrap();
        table.set("a", "3".to_string()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").unwrap(), "3");
        let names: Vec<&str> = table.list().map(SymbolEntry::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn readonly_entries_refuse_writes() {
        let mut table = SymbolTable::with_constants();
        let err = table.set("SPACE", "y".to_string()).unwrap_err();
        assert_eq!(
            err,
            SymbolError::ReadOnly {
                name: "SPACE".to_string()
            }
        );
        assert_eq!(table.get("SPACE").unwrap(), " ");
    }

    #[test]
    fn missing_symbol_is_undefined() {
        let table = SymbolTable::new();
        assert!(!table.exists("nope"));
        assert!(table.is_empty());
        assert!(matches!(table.get("nope"), Err(SymbolError::Undefined { .. })));
    }

    #[test]
    fn entry_display_marks_readonly() {
        let mut table = SymbolTable::with_constants();
        table.set("x", "a\"b".to_string()).unwrap();
        let lines: Vec<String> = table.list().map(|e| e.to_string()).collect();
        assert_eq!(lines[0], "SPACE -> \" \" [readonly]");
        assert_eq!(lines[3], "x -> \"a\\\"b\" ");
    }
}
