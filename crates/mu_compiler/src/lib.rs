//! mu_compiler: Compiler orchestration.
//!
//! Creates the program, loads every manifest into the AST arena and binds
//! the result, either as one namespace or one namespace per document.

pub mod manifest;

use bumpalo::Bump;
use log::{debug, info};
use mu_ast::{AstBuilder, Declaration, Document};
use mu_binder::{Binder, BoundProgram, Symbol, SymbolTable};
use mu_core::intern::NameInterner;
use mu_diagnostics::{DiagnosticCollection, DiagnosticSink};
use mu_options::{BindScope, CompilerOptions};
use rayon::prelude::*;
use std::path::PathBuf;

pub use manifest::{load_document, LoadedDocument};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One symbol table and the documents it covers.
#[derive(Debug, Clone)]
pub struct BoundUnit<'a> {
    /// The document this table belongs to; `None` for a program-wide table.
    pub document: Option<&'a Document<'a>>,
    pub table: SymbolTable<'a>,
}

/// The result of compiling a program.
#[derive(Debug, Clone)]
pub struct Compilation<'a> {
    pub units: Vec<BoundUnit<'a>>,
    pub diagnostics: DiagnosticCollection,
}

impl<'a> Compilation<'a> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Every bound symbol across all units, in unit order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol<'a>> + '_ {
        self.units.iter().flat_map(|unit| unit.table.all())
    }
}

/// The program represents the entire compilation unit.
pub struct Program<'a> {
    pub options: CompilerOptions,
    pub root_files: Vec<PathBuf>,
    /// Arena every AST value is allocated in.
    arena: &'a Bump,
    interner: NameInterner,
    /// Loaded sources as (file name, text), in load order.
    source_files: Vec<(String, String)>,
}

impl<'a> Program<'a> {
    pub fn new(arena: &'a Bump, root_files: Vec<PathBuf>, options: CompilerOptions) -> Self {
        Self {
            options,
            root_files,
            arena,
            interner: NameInterner::new(),
            source_files: Vec::new(),
        }
    }

    pub fn add_source(&mut self, file_name: impl Into<String>, source_text: impl Into<String>) {
        self.source_files.push((file_name.into(), source_text.into()));
    }

    /// Load all root files from disk.
    pub fn load_root_files(&mut self) -> Result<(), LoadError> {
        for path in &self.root_files {
            let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;
            self.source_files
                .push((path.to_string_lossy().into_owned(), content));
        }
        Ok(())
    }

    pub fn interner(&self) -> &NameInterner {
        &self.interner
    }

    pub fn source_text(&self, file_name: &str) -> Option<&str> {
        self.source_files
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, text)| text.as_str())
    }

    /// Build the AST for every source, reporting malformed manifests.
    pub fn load(&self, sink: &mut impl DiagnosticSink) -> Vec<LoadedDocument<'a>> {
        let builder = AstBuilder::new(self.arena, &self.interner);
        let documents: Vec<_> = self
            .source_files
            .iter()
            .map(|(file_name, text)| load_document(&builder, file_name, text, sink))
            .collect();
        info!("loaded {} documents", documents.len());
        documents
    }

    /// Run the pipeline: load -> bind. Returns the tables and all
    /// diagnostics, sorted by file and position.
    pub fn compile(&self) -> Compilation<'a> {
        let mut diagnostics = DiagnosticCollection::new();
        let documents = self.load(&mut diagnostics);

        let units = match self.options.bind_scope() {
            BindScope::Program => {
                let declarations: Vec<Declaration<'a>> = documents
                    .iter()
                    .flat_map(|loaded| loaded.declarations.iter().copied())
                    .collect();
                let bound = Binder::new(&self.interner).bind(&declarations);
                vec![(None, bound)]
            }
            BindScope::Document => self.bind_documents(&documents),
        };

        let units = units
            .into_iter()
            .map(|(document, bound)| {
                diagnostics.extend(bound.diagnostics);
                BoundUnit {
                    document,
                    table: bound.table,
                }
            })
            .collect();

        diagnostics.sort();
        Compilation { units, diagnostics }
    }

    /// One table per document. Results come back in document order even
    /// when bound in parallel.
    fn bind_documents(
        &self,
        documents: &[LoadedDocument<'a>],
    ) -> Vec<(Option<&'a Document<'a>>, BoundProgram<'a>)> {
        let interner = &self.interner;
        let bind = |loaded: &LoadedDocument<'a>| {
            debug!("binding {}", loaded.document.path);
            (
                Some(loaded.document),
                Binder::new(interner).bind(&loaded.declarations),
            )
        };

        if self.options.parallel() {
            documents.par_iter().map(bind).collect()
        } else {
            documents.iter().map(bind).collect()
        }
    }
}
