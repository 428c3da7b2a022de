//! Rope-backed source documents with incremental reparsing.

use std::path::{Path, PathBuf};

use ropey::Rope;
use tree_sitter::{InputEdit, Point, Tree};

use crate::error::{HarneetError, HarneetResult};
use crate::parser::parse_rope;

/// A Harneet source text together with its current syntax tree.
pub struct SourceDocument {
    path: Option<PathBuf>,
    text: Rope,
    tree: Tree,
}

impl SourceDocument {
    pub fn new(text: &str) -> HarneetResult<Self> {
        let text = Rope::from_str(text);
        let tree = parse_rope(&text, None)?;
        Ok(Self {
            path: None,
            text,
            tree,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> HarneetResult<Self> {
        let path = path.as_ref();
        let text = std::fs::File::open(path)
            .and_then(Rope::from_reader)
            .map_err(|e| HarneetError::io(path, e))?;
        let tree = parse_rope(&text, None)?;
        tracing::debug!(path = %path.display(), bytes = text.len_bytes(), "Parsed document");
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
            tree,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Replace the bytes in `start_byte..old_end_byte` with `new_text` and
    /// reparse, reusing the unchanged parts of the previous tree.
    ///
    /// Both offsets must lie on char boundaries; otherwise the document is
    /// left untouched.
    pub fn apply_edit(
        &mut self,
        start_byte: usize,
        old_end_byte: usize,
        new_text: &str,
    ) -> HarneetResult<()> {
        let len = self.text.len_bytes();
        if start_byte > old_end_byte || old_end_byte > len {
            return Err(HarneetError::invalid_edit(format!(
                "range {start_byte}..{old_end_byte} is outside the document (length {len})"
            )));
        }
        let start_char = self.char_at_boundary(start_byte)?;
        let old_end_char = self.char_at_boundary(old_end_byte)?;

        let start_position = point_at(&self.text, start_byte);
        let old_end_position = point_at(&self.text, old_end_byte);
        let new_end_position = point_after_text(start_position, new_text);
        let new_end_byte = start_byte + new_text.len();

        self.text.remove(start_char..old_end_char);
        self.text.insert(start_char, new_text);

        self.tree.edit(&InputEdit {
            start_byte,
            old_end_byte,
            new_end_byte,
            start_position,
            old_end_position,
            new_end_position,
        });
        self.tree = parse_rope(&self.text, Some(&self.tree))?;

        tracing::trace!(
            start_byte,
            old_end_byte,
            new_end_byte,
            "Reparsed document after edit"
        );
        Ok(())
    }

    /// Replace the whole text and parse from scratch.
    pub fn replace_all(&mut self, text: &str) -> HarneetResult<()> {
        let rope = Rope::from_str(text);
        self.tree = parse_rope(&rope, None)?;
        self.text = rope;
        Ok(())
    }

    fn char_at_boundary(&self, byte: usize) -> HarneetResult<usize> {
        let char_idx = self.text.byte_to_char(byte);
        if self.text.char_to_byte(char_idx) != byte {
            return Err(HarneetError::invalid_edit(format!(
                "byte offset {byte} is not on a character boundary"
            )));
        }
        Ok(char_idx)
    }
}

/// Row and byte column of `byte` in `rope`, as tree-sitter counts them.
pub fn point_at(rope: &Rope, byte: usize) -> Point {
    let row = rope.byte_to_line(byte);
    let column = byte - rope.line_to_byte(row);
    Point { row, column }
}

fn point_after_text(start: Point, text: &str) -> Point {
    let mut row = start.row;
    let mut column = start.column;
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        column += first.len();
    }
    for line in lines {
        row += 1;
        column = line.len();
    }
    Point { row, column }
}
