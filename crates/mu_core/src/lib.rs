//! mu_core: Core utilities for the mu compiler.
//!
//! Provides name interning and text spans used by every later phase.

pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{DisplayName, Name, NameInterner};
pub use text::{compute_line_starts, LineAndCharacter, LineMap, TextSpan};
