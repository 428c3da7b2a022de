//! Tree-sitter grammar for the Harneet programming language.
//!
//! The parser tables are compiled from `src/parser.c` when it is present, or
//! generated from `src/grammar.json` at build time otherwise. Either way the
//! resulting static library exports a single C symbol, `tree_sitter_harneet`,
//! declared in [`C_HEADER`].
//!
//! ```
//! let mut parser = tree_sitter::Parser::new();
//! parser
//!     .set_language(&tree_sitter_harneet::LANGUAGE.into())
//!     .expect("Error loading Harneet grammar");
//! let tree = parser.parse("package main", None).unwrap();
//! assert_eq!(tree.root_node().kind(), "source_file");
//! ```

use tree_sitter_language::LanguageFn;

unsafe extern "C" {
    fn tree_sitter_harneet() -> *const ();
}

/// The tree-sitter [`LanguageFn`] for the Harneet grammar.
///
/// The wrapped function returns a pointer to statically allocated parse
/// tables. It is the same pointer on every call and stays valid for the
/// lifetime of the process.
pub const LANGUAGE: LanguageFn = unsafe { LanguageFn::from_raw(tree_sitter_harneet) };

/// The Harneet language as a [`tree_sitter::Language`].
pub fn language() -> tree_sitter::Language {
    LANGUAGE.into()
}

/// Name the grammar was generated under; also the suffix of the C symbol.
pub const GRAMMAR_NAME: &str = "harneet";

/// The C declaration of the language accessor.
pub const C_HEADER: &str = include_str!("../bindings/c/tree-sitter-harneet.h");

/// The syntax highlighting query for this language.
pub const HIGHLIGHTS_QUERY: &str = include_str!("../queries/highlights.scm");

/// The local-variable scoping query for this language.
pub const LOCALS_QUERY: &str = include_str!("../queries/locals.scm");

/// Returns the raw descriptor pointer without going through the tree-sitter
/// runtime.
pub fn raw_language() -> *const () {
    // SAFETY: the accessor takes no arguments, has no side effects and returns
    // a pointer to immutable static data.
    unsafe { (LANGUAGE.into_raw())() }
}
