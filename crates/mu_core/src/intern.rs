//! Name interning for the compiler.
//!
//! Stack, service and document names are interned so that symbol tables can
//! key on a small `Copy` handle and compare names in O(1).

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// An interned name. This is a lightweight handle (u32) that can be
/// resolved back to its text through the [`NameInterner`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Name(Spur);

impl Name {
    /// Create from a raw lasso key.
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    /// Get the raw lasso key.
    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.0)
    }
}

/// Thread-safe name interner.
///
/// Cloning is cheap and every clone shares the same storage, so documents
/// bound on different threads agree on the handle for a given name.
#[derive(Clone)]
pub struct NameInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl NameInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern a name, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        Name::from_spur(self.rodeo.get_or_intern(s))
    }

    /// Look up an already-interned name without interning it if absent.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Name> {
        self.rodeo.get(s).map(Name::from_spur)
    }

    /// Resolve a handle back to its text.
    #[inline]
    pub fn resolve(&self, name: Name) -> &str {
        self.rodeo.resolve(&name.as_spur())
    }

    /// Wrap a handle so it can be formatted with `{}`.
    pub fn display(&self, name: Name) -> DisplayName<'_> {
        DisplayName {
            name,
            interner: self,
        }
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NameInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameInterner")
            .field("len", &self.len())
            .finish()
    }
}

/// Displaying a [`Name`] requires access to the interner.
pub struct DisplayName<'a> {
    pub name: Name,
    pub interner: &'a NameInterner,
}

impl fmt::Display for DisplayName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interner.resolve(self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let interner = NameInterner::new();
        let a = interner.intern("net");
        let b = interner.intern("net");
        let c = interner.intern("web");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "net");
        assert_eq!(interner.resolve(c), "web");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_get() {
        let interner = NameInterner::new();
        assert!(interner.get("net").is_none());
        let a = interner.intern("net");
        assert_eq!(interner.get("net"), Some(a));
    }

    #[test]
    fn test_clones_share_storage() {
        let interner = NameInterner::new();
        let clone = interner.clone();
        let a = interner.intern("db");
        assert_eq!(clone.get("db"), Some(a));
    }

    #[test]
    fn test_display() {
        let interner = NameInterner::new();
        let a = interner.intern("a.json");
        assert_eq!(interner.display(a).to_string(), "a.json");
    }
}
