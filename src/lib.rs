//! Tooling around the Harneet tree-sitter grammar: parsing, syntax
//! diagnostics, highlighting and editor deployment.

pub mod check;
pub mod deploy;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod highlight;
pub mod parser;

pub use crate::document::SourceDocument;
pub use crate::error::{ErrorKind, HarneetError, HarneetResult};
pub use crate::parser::{parse_rope, parse_str};
