//! String interning.
//!
//! A [`Symbol`] is a 4-byte handle to a string stored in a process-global
//! table. Interning makes name comparison an integer comparison and lets
//! AST nodes and scope maps stay `Copy`-friendly. Interned strings are
//! never freed; the set of distinct names and raw literal slices in one
//! compilation is small and bounded by the input.

use std::fmt;
use std::sync::{OnceLock, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{SymbolError, SymbolResult};

/// An interned string.
///
/// Two symbols are equal iff the strings they were interned from are
/// equal. Comparison and hashing are O(1).
///
/// # Examples
///
/// ```
/// use esfc_util::Symbol;
///
/// let a = Symbol::intern("eval");
/// let b = Symbol::intern("eval");
/// let c = Symbol::intern("arguments");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.as_str(), "eval");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns a string, returning its symbol.
    ///
    /// Repeated calls with the same string return the same symbol.
    pub fn intern(string: &str) -> Self {
        table().write().expect("symbol table poisoned").intern(string)
    }

    /// Returns the interned string.
    pub fn as_str(self) -> &'static str {
        table().read().expect("symbol table poisoned").get(self)
    }

    /// Raw table index, for debugging.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Checked inverse of [`Symbol::as_u32`]: reconstructs a symbol from
    /// a raw index, refusing indices the table has never handed out.
    pub fn from_u32(index: u32) -> SymbolResult<Self> {
        let table = table().read().expect("symbol table poisoned");
        if (index as usize) < table.strings.len() {
            Ok(Symbol(index))
        } else {
            Err(SymbolError::NotFound { index })
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The global table. Strings are leaked to obtain `'static` slices; the
/// table only ever grows.
struct Table {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Table {
    fn intern(&mut self, string: &str) -> Symbol {
        if let Some(&id) = self.index.get(string) {
            return Symbol(id);
        }
        let owned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let id = self.strings.len() as u32;
        self.strings.push(owned);
        self.index.insert(owned, id);
        Symbol(id)
    }

    fn get(&self, symbol: Symbol) -> &'static str {
        self.strings[symbol.0 as usize]
    }
}

fn table() -> &'static RwLock<Table> {
    static TABLE: OnceLock<RwLock<Table>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RwLock::new(Table {
            index: FxHashMap::default(),
            strings: Vec::new(),
        })
    })
}
