//! Symbol definitions.

use mu_ast::{Declaration, Document, Node, Service, Stack};
use mu_core::intern::Name;
use mu_core::text::TextSpan;
use mu_diagnostics::Location;
use std::fmt;

/// What sort of construct a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Stack,
    Service,
    Document,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Stack => write!(f, "stack"),
            SymbolKind::Service => write!(f, "service"),
            SymbolKind::Document => write!(f, "document"),
        }
    }
}

/// A symbol represents a named top-level construct in the program.
///
/// The variant is the kind and carries the matching payload, so a stack
/// symbol can only ever hold a [`Stack`]. Payloads are borrowed from the AST
/// arena; a symbol never owns or outlives the tree it points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol<'a> {
    Stack { name: Name, stack: &'a Stack<'a> },
    Service { name: Name, service: &'a Service<'a> },
    Document { name: Name, document: &'a Document<'a> },
}

impl<'a> Symbol<'a> {
    pub fn new_stack(name: Name, stack: &'a Stack<'a>) -> Self {
        Symbol::Stack { name, stack }
    }

    pub fn new_service(name: Name, service: &'a Service<'a>) -> Self {
        Symbol::Service { name, service }
    }

    pub fn new_document(name: Name, document: &'a Document<'a>) -> Self {
        Symbol::Document { name, document }
    }

    /// Create the symbol a declaration introduces, under its own name.
    pub fn from_declaration(declaration: Declaration<'a>) -> Self {
        match declaration {
            Declaration::Stack(stack) => Symbol::new_stack(stack.name, stack),
            Declaration::Service(service) => Symbol::new_service(service.name, service),
            Declaration::Document(document) => Symbol::new_document(document.name, document),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Stack { .. } => SymbolKind::Stack,
            Symbol::Service { .. } => SymbolKind::Service,
            Symbol::Document { .. } => SymbolKind::Document,
        }
    }

    pub fn name(&self) -> Name {
        match *self {
            Symbol::Stack { name, .. }
            | Symbol::Service { name, .. }
            | Symbol::Document { name, .. } => name,
        }
    }

    /// The AST node that introduced this symbol. Documents have none.
    pub fn defining_node(&self) -> Option<&'a Node<'a>> {
        match *self {
            Symbol::Stack { stack, .. } => Some(&stack.node),
            Symbol::Service { service, .. } => Some(&service.node),
            Symbol::Document { .. } => None,
        }
    }

    /// The document this symbol was defined in.
    pub fn document(&self) -> &'a Document<'a> {
        match *self {
            Symbol::Stack { stack, .. } => stack.node.document,
            Symbol::Service { service, .. } => service.node.document,
            Symbol::Document { document, .. } => document,
        }
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.defining_node().map(|node| node.span)
    }

    /// Where to point diagnostics about this symbol.
    pub fn location(&self) -> Location {
        match self.defining_node() {
            Some(node) => node.location(),
            None => self.document().location(),
        }
    }

    pub fn as_stack(&self) -> Option<&'a Stack<'a>> {
        match *self {
            Symbol::Stack { stack, .. } => Some(stack),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&'a Service<'a>> {
        match *self {
            Symbol::Service { service, .. } => Some(service),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&'a Document<'a>> {
        match *self {
            Symbol::Document { document, .. } => Some(document),
            _ => None,
        }
    }
}
