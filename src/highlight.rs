//! Capture-based highlighting with the bundled highlights query.

use std::ops::Range;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Point, Query, QueryCursor, Tree};

use crate::error::HarneetResult;
use crate::parser::language;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    pub capture: String,
    pub range: Range<usize>,
    pub start: Point,
    pub end: Point,
}

pub struct Highlighter {
    query: Query,
}

impl Highlighter {
    /// Compile the bundled `highlights.scm` against the Harneet language.
    pub fn new() -> HarneetResult<Self> {
        Self::with_query(tree_sitter_harneet::HIGHLIGHTS_QUERY)
    }

    pub fn with_query(source: &str) -> HarneetResult<Self> {
        let query = Query::new(&language(), source)?;
        Ok(Self { query })
    }

    pub fn capture_names(&self) -> &[&str] {
        self.query.capture_names()
    }

    /// Every capture in `tree`, ordered by position.
    ///
    /// A node matched by several patterns is reported once per capture.
    pub fn highlight(&self, tree: &Tree, source: &str) -> Vec<HighlightSpan> {
        let names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.query, tree.root_node(), source.as_bytes());

        let mut spans = Vec::new();
        while let Some((m, index)) = captures.next() {
            let capture = m.captures[*index];
            let node = capture.node;
            spans.push(HighlightSpan {
                capture: names[capture.index as usize].to_owned(),
                range: node.byte_range(),
                start: node.start_position(),
                end: node.end_position(),
            });
        }
        spans
    }
}
