//! String interning for compiler identifiers.
//!
//! This core is single-threaded end to end (one `Interner` per compilation
//! run, never shared across threads), so interning is a plain owned table
//! rather than a concurrent map with collision-probing.

use rustc_hash::FxHashMap;

use crate::error::{SymbolError, SymbolResult};

/// An interned identifier. Two symbols compare equal iff the underlying text
/// is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Owns the canonical text for every identifier seen during a compilation.
pub struct Interner {
    strings: Vec<Box<str>>,
    map: FxHashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    /// Intern `text`, returning its existing symbol or allocating a new one.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.map.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = Box::from(text);
        self.strings.push(boxed.clone());
        self.map.insert(boxed, sym);
        sym
    }

    /// Resolve a symbol back to its text.
    ///
    /// # Panics
    /// Panics if `sym` was not produced by this interner.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.try_resolve(sym).expect("symbol not produced by this interner")
    }

    /// Fallible form of [`Interner::resolve`], for callers that may be
    /// handed a symbol from a different interner.
    pub fn try_resolve(&self, sym: Symbol) -> SymbolResult<&str> {
        self.strings
            .get(sym.0 as usize)
            .map(|s| &**s)
            .ok_or(SymbolError::OutOfRange {
                index: sym.0,
                len: self.strings.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
