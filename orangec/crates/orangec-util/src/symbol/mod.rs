//! String interning.
//!
//! A [`Symbol`] is a 4-byte handle to an interned string: comparing two
//! symbols is an integer compare, not a byte-for-byte one, which matters
//! here because every AST `Var` node and every symbol-tree lookup compares
//! names. The compiler is single-threaded and synchronous end to end
//! (spec.md §5), so the interner is a single global table behind a
//! `RefCell`-style cell rather than a lock-free concurrent map — there is
//! never contention to design around.
//!
//! ```
//! use orangec_util::Symbol;
//!
//! let a = Symbol::intern("start");
//! let b = Symbol::intern("start");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "start");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// A handle to an interned string. Cheap to copy, compare, and hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s`, returning the existing handle if it was already interned.
    pub fn intern(s: &str) -> Symbol {
        STRING_TABLE.with(|table| table.borrow_mut().intern(s))
    }

    /// The original string this symbol was interned from.
    pub fn as_str(self) -> &'static str {
        STRING_TABLE.with(|table| table.borrow().get(self))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The backing table. Interned strings are leaked to `'static` — the
/// compiler runs for a single, bounded compilation and never frees this
/// table, so the leak is the whole process's lifetime, not a growth leak.
struct StringTable {
    strings: Vec<&'static str>,
    lookup: HashMap<&'static str, u32>,
}

impl StringTable {
    fn new() -> Self {
        let mut table = StringTable {
            strings: Vec::new(),
            lookup: HashMap::new(),
        };
        for kw in KEYWORDS {
            table.intern(kw);
        }
        table
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&idx) = self.lookup.get(s) {
            return Symbol(idx);
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let idx = self.strings.len() as u32;
        self.strings.push(leaked);
        self.lookup.insert(leaked, idx);
        Symbol(idx)
    }

    fn get(&self, sym: Symbol) -> &'static str {
        self.strings[sym.0 as usize]
    }
}

thread_local! {
    static STRING_TABLE: RefCell<StringTable> = RefCell::new(StringTable::new());
}

/// Reserved words recognized by the lexer (spec.md §4.1, §6.1). Pre-interning
/// them gives every keyword a small, stable [`Symbol`] id before any source
/// file is read.
pub const KEYWORDS: &[&str] = &[
    "struct", "enum", "private", "static", "const", "if", "else", "while",
    "return", "true", "false", "null", "is", "isnt", "and", "or", "cast",
    "new", "free", "verbatim",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        assert_eq!(Symbol::intern("Main"), Symbol::intern("Main"));
    }

    #[test]
    fn different_strings_intern_to_different_symbols() {
        assert_ne!(Symbol::intern("Main"), Symbol::intern("Other"));
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("start");
        assert_eq!(sym.as_str(), "start");
    }

    #[test]
    fn keywords_are_preinterned() {
        let fresh = Symbol::intern("struct");
        assert_eq!(fresh.as_str(), "struct");
    }
}
