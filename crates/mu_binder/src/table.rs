//! The symbol table.

use crate::symbol::{Symbol, SymbolKind};
use indexmap::map::Entry;
use indexmap::IndexMap;
use mu_ast::{Document, Service, Stack};
use mu_core::intern::Name;
use rustc_hash::FxBuildHasher;

/// Returned by [`SymbolTable::insert`] when the name is already bound.
/// The table keeps `existing`; `incoming` was not inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a {} with this name is already bound", .existing.kind())]
pub struct Conflict<'a> {
    pub existing: Symbol<'a>,
    pub incoming: Symbol<'a>,
}

/// A flat namespace mapping names to symbols.
///
/// Iteration follows insertion order. A name, once bound, stays bound to
/// the first symbol inserted for it.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable<'a> {
    symbols: IndexMap<Name, Symbol<'a>, FxBuildHasher>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        Self {
            symbols: IndexMap::default(),
        }
    }

    /// Bind `symbol` under its name, unless the name is taken.
    pub fn insert(&mut self, symbol: Symbol<'a>) -> Result<(), Conflict<'a>> {
        match self.symbols.entry(symbol.name()) {
            Entry::Occupied(entry) => Err(Conflict {
                existing: *entry.get(),
                incoming: symbol,
            }),
            Entry::Vacant(entry) => {
                entry.insert(symbol);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, name: Name) -> Option<Symbol<'a>> {
        self.symbols.get(&name).copied()
    }

    pub fn contains(&self, name: Name) -> bool {
        self.symbols.contains_key(&name)
    }

    /// Every bound symbol, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = Symbol<'a>> + '_ {
        self.symbols.values().copied()
    }

    /// Bound symbols of one kind, in insertion order.
    pub fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = Symbol<'a>> + '_ {
        self.all().filter(move |symbol| symbol.kind() == kind)
    }

    pub fn lookup_stack(&self, name: Name) -> Option<&'a Stack<'a>> {
        self.lookup(name).and_then(|symbol| symbol.as_stack())
    }

    pub fn lookup_service(&self, name: Name) -> Option<&'a Service<'a>> {
        self.lookup(name).and_then(|symbol| symbol.as_service())
    }

    pub fn lookup_document(&self, name: Name) -> Option<&'a Document<'a>> {
        self.lookup(name).and_then(|symbol| symbol.as_document())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl PartialEq for SymbolTable<'_> {
    /// Tables are equal when they bind the same symbols in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.symbols.len() == other.symbols.len()
            && self.symbols.iter().eq(other.symbols.iter())
    }
}

impl Eq for SymbolTable<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use mu_ast::AstBuilder;
    use mu_core::intern::NameInterner;
    use mu_core::text::TextSpan;

    #[test]
    fn test_insert_and_lookup() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let doc = builder.document("a.json", "");
        let stack = builder.stack(doc, "net", TextSpan::new(0, 3), None);

        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        assert!(table.insert(Symbol::new_stack(stack.name, stack)).is_ok());

        let found = table.lookup(interner.intern("net")).unwrap();
        assert_eq!(found.kind(), SymbolKind::Stack);
        assert!(std::ptr::eq(table.lookup_stack(stack.name).unwrap(), stack));
        assert!(table.lookup_service(stack.name).is_none());
        assert!(table.lookup(interner.intern("missing")).is_none());
    }

    #[test]
    fn test_conflict_keeps_first() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let doc = builder.document("a.json", "");
        let first = builder.stack(doc, "net", TextSpan::new(0, 3), None);
        let second = builder.service(doc, "net", TextSpan::new(10, 3), None);

        let mut table = SymbolTable::new();
        table.insert(Symbol::new_stack(first.name, first)).unwrap();
        let conflict = table
            .insert(Symbol::new_service(second.name, second))
            .unwrap_err();

        assert_eq!(conflict.existing.kind(), SymbolKind::Stack);
        assert_eq!(conflict.incoming.kind(), SymbolKind::Service);
        assert_eq!(conflict.to_string(), "a stack with this name is already bound");
        assert_eq!(table.len(), 1);
        assert!(std::ptr::eq(table.lookup_stack(first.name).unwrap(), first));
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let arena = Bump::new();
        let interner = NameInterner::new();
        let builder = AstBuilder::new(&arena, &interner);
        let doc = builder.document("a.json", "");

        let mut table = SymbolTable::new();
        for name in ["zeta", "alpha", "mid"] {
            let stack = builder.stack(doc, name, TextSpan::empty(0), None);
            table.insert(Symbol::new_stack(stack.name, stack)).unwrap();
        }
        table.insert(Symbol::new_document(doc.name, doc)).unwrap();

        let names: Vec<_> = table.all().map(|s| interner.resolve(s.name()).to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "a.json"]);
        assert_eq!(table.of_kind(SymbolKind::Stack).count(), 3);
        assert_eq!(table.of_kind(SymbolKind::Document).count(), 1);
        assert!(table.lookup_document(doc.name).is_some());
    }
}
