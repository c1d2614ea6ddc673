//! Arena-backed construction of AST values.
//!
//! Whatever produces declarations (the manifest loader, tests, an embedding
//! tool) goes through the builder so names are interned consistently and
//! every value lands in the same arena.

use crate::node::*;
use bumpalo::Bump;
use mu_core::intern::NameInterner;
use mu_core::text::{compute_line_starts, TextSpan};

pub struct AstBuilder<'a> {
    arena: &'a Bump,
    interner: NameInterner,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a Bump, interner: &NameInterner) -> Self {
        Self {
            arena,
            interner: interner.clone(),
        }
    }

    pub fn interner(&self) -> &NameInterner {
        &self.interner
    }

    /// Allocate a document. Its name is the interned path.
    pub fn document(&self, path: &str, text: &str) -> &'a Document<'a> {
        self.arena.alloc(Document {
            name: self.interner.intern(path),
            path: self.alloc_str(path),
            text: self.alloc_str(text),
            line_starts: self.arena.alloc_slice_copy(&compute_line_starts(text)),
        })
    }

    pub fn stack(
        &self,
        document: &'a Document<'a>,
        name: &str,
        span: TextSpan,
        description: Option<&str>,
    ) -> &'a Stack<'a> {
        self.arena.alloc(Stack {
            node: Node::new(document, span),
            name: self.interner.intern(name),
            description: description.map(|d| self.alloc_str(d)),
        })
    }

    pub fn service(
        &self,
        document: &'a Document<'a>,
        name: &str,
        span: TextSpan,
        service_type: Option<&str>,
    ) -> &'a Service<'a> {
        self.arena.alloc(Service {
            node: Node::new(document, span),
            name: self.interner.intern(name),
            service_type: service_type.map(|t| self.alloc_str(t)),
        })
    }

    fn alloc_str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    pub fn program(&self, declarations: &[Declaration<'a>]) -> Program<'a> {
        Program {
            declarations: self.arena.alloc_slice_copy(declarations),
        }
    }
}
