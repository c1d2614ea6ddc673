//! The binder implementation.
//!
//! Walks a program's top-level declarations in document order and builds
//! its symbol table. Handles:
//! - Symbol creation for stacks, services and documents
//! - Duplicate detection within the flat top-level namespace
//! - Batch reporting: every clash is reported, none aborts the pass

use crate::symbol::Symbol;
use crate::table::{Conflict, SymbolTable};
use log::{debug, trace};
use mu_ast::{Declaration, Program};
use mu_core::intern::NameInterner;
use mu_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticSink};

/// The result of binding one program: its table and what went wrong.
///
/// The table only holds the first declaration of any clashing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundProgram<'a> {
    pub table: SymbolTable<'a>,
    pub diagnostics: DiagnosticCollection,
}

impl BoundProgram<'_> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// The binder creates symbols and records them in a table it owns until
/// binding is finished.
pub struct Binder<'a> {
    /// Used to spell names in diagnostics.
    interner: NameInterner,
    table: SymbolTable<'a>,
}

impl<'a> Binder<'a> {
    pub fn new(interner: &NameInterner) -> Self {
        Self {
            interner: interner.clone(),
            table: SymbolTable::new(),
        }
    }

    /// Bind `declarations` into a fresh table, collecting diagnostics.
    pub fn bind(mut self, declarations: &[Declaration<'a>]) -> BoundProgram<'a> {
        let mut diagnostics = DiagnosticCollection::new();
        self.bind_declarations(declarations, &mut diagnostics);

        debug!(
            "bound {} symbols from {} declarations ({} duplicates)",
            self.table.len(),
            declarations.len(),
            diagnostics.len()
        );

        BoundProgram {
            table: self.table,
            diagnostics,
        }
    }

    /// Bind `declarations` into a fresh table, reporting clashes into a sink
    /// the caller owns.
    pub fn bind_into(
        mut self,
        declarations: &[Declaration<'a>],
        sink: &mut impl DiagnosticSink,
    ) -> SymbolTable<'a> {
        self.bind_declarations(declarations, sink);
        self.table
    }

    /// Bind `declarations`, reporting clashes into a sink the caller owns.
    pub fn bind_declarations(
        &mut self,
        declarations: &[Declaration<'a>],
        sink: &mut impl DiagnosticSink,
    ) {
        for declaration in declarations {
            self.bind_declaration(*declaration, sink);
        }
    }

    pub fn bind_declaration(&mut self, declaration: Declaration<'a>, sink: &mut impl DiagnosticSink) {
        let symbol = Symbol::from_declaration(declaration);
        trace!(
            "declaring {} '{}'",
            symbol.kind(),
            self.interner.display(symbol.name())
        );

        if let Err(conflict) = self.table.insert(symbol) {
            self.report_conflict(conflict, sink);
        }
    }

    fn report_conflict(&self, conflict: Conflict<'a>, sink: &mut impl DiagnosticSink) {
        let name = self.interner.resolve(conflict.incoming.name());
        let incoming_kind = conflict.incoming.kind().to_string();
        let existing_kind = conflict.existing.kind().to_string();

        let first_declared = Diagnostic::with_location(
            conflict.existing.location(),
            &messages::_0_WAS_FIRST_DECLARED_HERE_AS_A_1,
            &[name, existing_kind.as_str()],
        );
        let duplicate = Diagnostic::with_location(
            conflict.incoming.location(),
            &messages::DUPLICATE_0_1,
            &[incoming_kind.as_str(), name],
        )
        .with_related(first_declared);

        trace!("{}", duplicate);
        sink.report(duplicate);
    }

    /// The table as bound so far.
    pub fn table(&self) -> &SymbolTable<'a> {
        &self.table
    }

    pub fn into_table(self) -> SymbolTable<'a> {
        self.table
    }
}

/// Bind a whole program into a fresh table.
pub fn bind_program<'a>(program: &Program<'a>, interner: &NameInterner) -> BoundProgram<'a> {
    Binder::new(interner).bind(program.declarations)
}
