//! mu_binder: Symbol table construction for mu programs.
//!
//! The binder walks a program's top-level declarations, gives each one a
//! kind-tagged symbol and records it in a flat, insertion-ordered table.
//! Name clashes are reported as diagnostics and never stop the pass.

mod binder;
mod symbol;
mod table;

pub use binder::{bind_program, Binder, BoundProgram};
pub use symbol::{Symbol, SymbolKind};
pub use table::{Conflict, SymbolTable};
