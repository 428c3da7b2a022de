//! Thread-local tree-sitter parser for Harneet source text.
//!
//! `tree_sitter::Parser` is `Send` but not `Sync`, so each thread keeps its
//! own instance configured with the Harneet language.

use std::cell::RefCell;

use ropey::Rope;
use tree_sitter::{Language, Parser, Tree};

use crate::error::{ErrorKind, HarneetResult};

thread_local! {
    static PARSER: RefCell<Parser> = {
        let parser = new_parser().expect("Failed to set the Harneet language");
        RefCell::new(parser)
    };
}

/// The Harneet language as a `tree_sitter::Language`.
pub fn language() -> Language {
    tree_sitter_harneet::language()
}

/// Create a fresh parser configured for Harneet.
pub fn new_parser() -> HarneetResult<Parser> {
    let mut parser = Parser::new();
    parser.set_language(&language())?;
    Ok(parser)
}

/// Parse a complete source string.
pub fn parse_str(source: &str) -> HarneetResult<Tree> {
    PARSER
        .with(|parser| parser.borrow_mut().parse(source, None))
        .ok_or_else(|| ErrorKind::ParseCancelled.into())
}

/// Parse a rope, reusing `old_tree` for incremental reparsing when given.
///
/// `old_tree` must already have been edited to match `rope`.
pub fn parse_rope(rope: &Rope, old_tree: Option<&Tree>) -> HarneetResult<Tree> {
    let len = rope.len_bytes();
    let tree = PARSER.with(|parser| {
        parser.borrow_mut().parse_with_options(
            &mut |byte, _| {
                let byte = byte.min(len);
                let (chunk, chunk_start, _, _) = rope.chunk_at_byte(byte);
                &chunk.as_bytes()[byte - chunk_start..]
            },
            old_tree,
            None,
        )
    });
    tree.ok_or_else(|| ErrorKind::ParseCancelled.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_parse_package_declaration() {
        let tree = parse_str("package main").unwrap();
        assert_snapshot!(
            tree.root_node().to_sexp(),
            @"(source_file (package_declaration name: (identifier)))"
        );
    }

    #[test]
    fn test_parse_rope_matches_parse_str() {
        let source = "var greeting = \"hello\"\nconst answer = 42\n".repeat(200);
        let rope = Rope::from_str(&source);
        assert!(rope.chunks().count() > 1);

        let from_rope = parse_rope(&rope, None).unwrap();
        let from_str = parse_str(&source).unwrap();
        assert_eq!(from_rope.root_node().to_sexp(), from_str.root_node().to_sexp());
        assert_eq!(from_rope.root_node().end_byte(), source.len());
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse_str("").unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert_eq!(tree.root_node().child_count(), 0);
    }

    #[test]
    fn test_parsers_are_per_thread() {
        let handle =
            std::thread::spawn(|| parse_str("package worker").map(|t| t.root_node().to_sexp()));
        let other = handle.join().unwrap().unwrap();
        let here = parse_str("package main").unwrap().root_node().to_sexp();
        assert_eq!(other, here);
    }
}
