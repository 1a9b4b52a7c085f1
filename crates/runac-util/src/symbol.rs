//! String interning.
//!
//! Identifiers, field names, and type names are compared constantly during
//! parsing and codegen (variable lookup, field resolution, variant tag
//! assignment). Interning them once up front turns every later comparison
//! into an integer compare instead of a byte-by-byte one.

use ahash::AHasher;
use dashmap::DashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

/// An interned string. Cheap to copy, compare, and hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

static TABLE: LazyLock<Interner> = LazyLock::new(Interner::new);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        TABLE.intern(s)
    }

    pub fn as_str(&self) -> &'static str {
        TABLE.resolve(*self)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe string table. Strings are leaked to `'static` once interned;
/// the compiler never runs long enough for that to matter.
struct Interner {
    by_hash: DashMap<u64, (&'static str, u32)>,
    by_index: DashMap<u32, &'static str>,
    next: AtomicU32,
}

impl Interner {
    fn new() -> Self {
        Self {
            by_hash: DashMap::new(),
            by_index: DashMap::new(),
            next: AtomicU32::new(0),
        }
    }

    fn intern(&self, s: &str) -> Symbol {
        let hash = Self::hash(s);
        if let Some(entry) = self.by_hash.get(&hash) {
            if entry.value().0 == s {
                return Symbol(entry.value().1);
            }
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.by_hash.insert(hash, (leaked, idx));
        self.by_index.insert(idx, leaked);
        Symbol(idx)
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        *self
            .by_index
            .get(&sym.0)
            .expect("symbol not present in interner")
            .value()
    }

    fn hash(s: &str) -> u64 {
        let mut h = AHasher::default();
        s.hash(&mut h);
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups() {
        let a = Symbol::intern("radius");
        let b = Symbol::intern("radius");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let a = Symbol::intern("Circle");
        let b = Symbol::intern("Square");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_as_str() {
        let s = Symbol::intern("multiplied by");
        assert_eq!(s.as_str(), "multiplied by");
    }
}
