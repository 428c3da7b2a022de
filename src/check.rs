//! Batch syntax checking of Harneet source files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::diagnostics::{SyntaxError, collect_syntax_errors, error_ratio};
use crate::error::{HarneetError, HarneetResult};
use crate::parser::parse_str;

pub const DEFAULT_EXTENSION: &str = "ha";

pub struct FileReport {
    pub path: PathBuf,
    pub source: String,
    pub errors: Vec<SyntaxError>,
    pub error_ratio: f64,
}

impl FileReport {
    /// A file passes when its share of ERROR nodes is within `max_error_ratio`
    /// and, for a zero threshold, it has no syntax errors at all.
    pub fn passes(&self, max_error_ratio: f64) -> bool {
        if max_error_ratio <= 0.0 {
            self.errors.is_empty()
        } else {
            self.error_ratio <= max_error_ratio
        }
    }
}

/// Expand `paths` into source files: files are taken as given, directories
/// are walked recursively for files ending in `.{extension}`.
pub fn collect_sources(paths: &[PathBuf], extension: &str) -> HarneetResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(path.as_path()).to_path_buf();
                HarneetError::io(at, e.into())
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

pub fn check_file(path: &Path) -> HarneetResult<FileReport> {
    let bytes = std::fs::read(path).map_err(|e| HarneetError::io(path, e))?;
    let source = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
    let tree = parse_str(&source)?;
    let errors = collect_syntax_errors(&tree, &source);
    let ratio = error_ratio(&tree);
    tracing::debug!(
        path = %path.display(),
        errors = errors.len(),
        error_ratio = ratio,
        "Checked file"
    );
    Ok(FileReport {
        path: path.to_path_buf(),
        source,
        errors,
        error_ratio: ratio,
    })
}
