//! Syntax diagnostics derived from ERROR and MISSING nodes.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use tree_sitter::{Node, Point, Tree};

/// What kind of syntax problem a node represents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Input the parser could not fit into the grammar.
    Unexpected,
    /// A token or node the parser inserted to recover, e.g. a closing `}`.
    Missing(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub range: Range<usize>,
    pub start: Point,
    pub message: String,
}

impl SyntaxError {
    fn from_node(node: Node<'_>, source: &str) -> Self {
        let range = node.byte_range();
        let start = node.start_position();
        if node.is_missing() {
            let kind = node.kind().to_owned();
            let message = format!("missing `{kind}`");
            return Self {
                kind: SyntaxErrorKind::Missing(kind),
                range,
                start,
                message,
            };
        }

        let message = match source.get(range.clone()).map(str::trim) {
            Some(text) if !text.is_empty() => {
                let snippet = text.lines().next().unwrap_or(text);
                format!("unexpected `{}`", truncate(snippet, 32))
            }
            _ => "unexpected input".to_owned(),
        };
        Self {
            kind: SyntaxErrorKind::Unexpected,
            range,
            start,
            message,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

/// Collect every syntax error in `tree`, in document order.
///
/// ERROR nodes are reported once; their contents are not searched further.
pub fn collect_syntax_errors(tree: &Tree, source: &str) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    let root = tree.root_node();
    if !root.has_error() {
        return errors;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let is_problem = node.is_error() || node.is_missing();
        if is_problem {
            errors.push(SyntaxError::from_node(node, source));
        }

        // Only subtrees flagged with has_error can contain problems.
        if !is_problem && node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return errors;
            }
        }
    }
}

/// Fraction of nodes in `tree` that are ERROR nodes.
pub fn error_ratio(tree: &Tree) -> f64 {
    let mut total = 0usize;
    let mut errors = 0usize;

    let mut cursor = tree.walk();
    loop {
        total += 1;
        if cursor.node().is_error() {
            errors += 1;
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return errors as f64 / total as f64;
            }
        }
    }
}

/// Get the display color for a syntax error kind.
pub fn kind_color(kind: &SyntaxErrorKind) -> Color {
    match kind {
        SyntaxErrorKind::Unexpected => Color::Red,
        SyntaxErrorKind::Missing(_) => Color::Yellow,
    }
}

/// Normalize a span to ensure end > start (required by ariadne).
pub fn normalize_span(start: usize, end: usize) -> (usize, usize) {
    (start, end.max(start + 1))
}

/// Clamp a byte span into `source` for display.
///
/// MISSING nodes at the end of input have an empty span at `source.len()`;
/// widening it would point past the text, so it is moved onto the last byte.
pub fn display_span(range: &Range<usize>, source: &str) -> Range<usize> {
    let len = source.len();
    let start = range.start.min(len.saturating_sub(1));
    let (start, end) = normalize_span(start, range.end.min(len));
    start..end
}

/// Print a syntax error using ariadne for pretty output.
pub fn print_syntax_error(error: &SyntaxError, source: &str, file_path: &str) {
    let span = display_span(&error.range, source);
    let code = match error.kind {
        SyntaxErrorKind::Unexpected => "syntax",
        SyntaxErrorKind::Missing(_) => "missing",
    };

    Report::build(ReportKind::Error, (file_path, span.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_code(code)
        .with_message(&error.message)
        .with_label(
            Label::new((file_path, span))
                .with_message(&error.message)
                .with_color(kind_color(&error.kind)),
        )
        .finish()
        .eprint((file_path, Source::from(source)))
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_clean_source_has_no_errors() {
        let source = "package main\nvar x = 1\n";
        let tree = parse_str(source).unwrap();
        assert!(collect_syntax_errors(&tree, source).is_empty());
        assert_eq!(error_ratio(&tree), 0.0);
    }

    #[test]
    fn test_unexpected_input_is_located() {
        let source = "package main\nvar = 5\n";
        let tree = parse_str(source).unwrap();
        let errors = collect_syntax_errors(&tree, source);
        assert!(!errors.is_empty());

        // Everything on the first line is valid.
        let first = &errors[0];
        assert!(first.range.start >= "package main\n".len(), "{first:?}");
        assert_eq!(first.start.row, 1);
    }

    #[test]
    fn test_errors_are_in_document_order() {
        let source = "var = 1\npackage main\nvar = 2\n";
        let tree = parse_str(source).unwrap();
        let errors = collect_syntax_errors(&tree, source);
        assert!(!errors.is_empty());
        assert!(
            errors
                .windows(2)
                .all(|pair| pair[0].range.start <= pair[1].range.start)
        );
    }

    #[test]
    fn test_garbage_is_unexpected() {
        let source = "package main\n) ) )\n";
        let tree = parse_str(source).unwrap();
        let errors = collect_syntax_errors(&tree, source);
        assert!(errors.iter().any(|e| {
            e.kind == SyntaxErrorKind::Unexpected && source[e.range.clone()].contains(')')
        }));
        assert!(error_ratio(&tree) > 0.0);
    }

    #[test]
    fn test_unclosed_block_reports_missing_brace() {
        let source = "function f() {";
        let tree = parse_str(source).unwrap();
        let errors = collect_syntax_errors(&tree, source);

        let missing = errors
            .iter()
            .find(|e| e.kind == SyntaxErrorKind::Missing("}".into()))
            .unwrap_or_else(|| panic!("no missing brace in {errors:?}"));
        assert_eq!(missing.range, source.len()..source.len());
        assert_eq!(missing.message, "missing `}`");
        assert_eq!(
            display_span(&missing.range, source),
            source.len() - 1..source.len()
        );
    }

    #[test]
    fn test_deeply_nested_source_is_walked_iteratively() {
        let depth = 20_000;
        let source = format!("var x = {}1{}", "(".repeat(depth), ")".repeat(depth));
        let tree = parse_str(&source).unwrap();
        assert_eq!(error_ratio(&tree), 0.0);
        assert!(collect_syntax_errors(&tree, &source).is_empty());
    }

    #[test]
    fn test_display_span() {
        assert_eq!(display_span(&(2..2), "abcd"), 2..3);
        assert_eq!(display_span(&(4..4), "abcd"), 3..4);
        assert_eq!(display_span(&(1..3), "abcd"), 1..3);
        assert_eq!(display_span(&(0..0), ""), 0..1);
    }

    #[test]
    fn test_kind_color() {
        assert_eq!(kind_color(&SyntaxErrorKind::Unexpected), Color::Red);
        assert_eq!(
            kind_color(&SyntaxErrorKind::Missing("}".into())),
            Color::Yellow
        );
    }

    #[test]
    fn test_normalize_span() {
        assert_eq!(normalize_span(4, 4), (4, 5));
        assert_eq!(normalize_span(4, 9), (4, 9));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 32), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
