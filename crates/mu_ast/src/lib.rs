//! mu_ast: Syntax tree definitions for mu documents.
//!
//! Only the top-level shapes the binder consumes live here: documents,
//! stacks and services. All values are allocated in a caller-owned
//! `bumpalo::Bump` and refer to each other through shared borrows.

pub mod builder;
pub mod node;

pub use builder::AstBuilder;
pub use node::*;
