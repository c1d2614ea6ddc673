//! AST node definitions.
//!
//! Nodes reference their document and each other via arena-allocated
//! references, so nothing here owns heap memory of its own.

use mu_core::intern::Name;
use mu_core::text::{LineMap, TextSpan};
use mu_diagnostics::Location;

// ============================================================================
// Documents
// ============================================================================

/// A source unit that declarations originate from.
#[derive(Debug, PartialEq, Eq)]
pub struct Document<'a> {
    /// The document's name, interned from its path.
    pub name: Name,
    pub path: &'a str,
    pub text: &'a str,
    /// Computed once when the document is built; see [`Document::line_map`].
    pub line_starts: &'a [u32],
}

impl<'a> Document<'a> {
    /// A location covering the whole document.
    pub fn location(&self) -> Location {
        Location::document(self.path)
    }

    /// A location for a span inside this document.
    pub fn location_of(&self, span: TextSpan) -> Location {
        let position = self.line_map().line_and_character_of(span.start);
        Location::span(self.path, span, position)
    }

    pub fn line_map(&self) -> LineMap<'a> {
        LineMap::new(self.line_starts)
    }
}

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// The location-bearing part shared by every declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    pub document: &'a Document<'a>,
    pub span: TextSpan,
}

impl<'a> Node<'a> {
    pub fn new(document: &'a Document<'a>, span: TextSpan) -> Self {
        Self { document, span }
    }

    pub fn location(&self) -> Location {
        self.document.location_of(self.span)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A stack: a named, deployable collection of services.
#[derive(Debug, PartialEq, Eq)]
pub struct Stack<'a> {
    pub node: Node<'a>,
    pub name: Name,
    pub description: Option<&'a str>,
}

/// A service instantiated inside a program.
#[derive(Debug, PartialEq, Eq)]
pub struct Service<'a> {
    pub node: Node<'a>,
    pub name: Name,
    /// The type the service instantiates, e.g. `aws/ec2`.
    pub service_type: Option<&'a str>,
}

/// A top-level declaration, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'a> {
    Stack(&'a Stack<'a>),
    Service(&'a Service<'a>),
    Document(&'a Document<'a>),
}

impl<'a> Declaration<'a> {
    pub fn name(&self) -> Name {
        match self {
            Declaration::Stack(s) => s.name,
            Declaration::Service(s) => s.name,
            Declaration::Document(d) => d.name,
        }
    }

    /// The document this declaration came from. A document declaration is
    /// its own document.
    pub fn document(&self) -> &'a Document<'a> {
        match *self {
            Declaration::Stack(s) => s.node.document,
            Declaration::Service(s) => s.node.document,
            Declaration::Document(d) => d,
        }
    }
}

/// The top-level declarations of one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program<'a> {
    pub declarations: &'a [Declaration<'a>],
}

impl<'a> Program<'a> {
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
