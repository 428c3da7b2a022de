//! Error types for the Harneet toolkit

use std::io;
use std::path::{Path, PathBuf};

use derive_more::{Display, From};

pub type HarneetResult<T> = Result<T, HarneetError>;

#[derive(Display, Debug, From)]
#[display("{kind}")]
pub struct HarneetError {
    #[from]
    kind: Box<ErrorKind>,
}

impl<E> From<E> for HarneetError
where
    ErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        HarneetError {
            kind: Box::new(ErrorKind::from(error)),
        }
    }
}

impl HarneetError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ErrorKind::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
        .into()
    }

    pub(crate) fn invalid_edit(msg: impl std::fmt::Display) -> Self {
        ErrorKind::InvalidEdit(msg.to_string()).into()
    }

    pub(crate) fn deploy(step: DeployStep, msg: impl std::fmt::Display) -> Self {
        ErrorKind::Deploy {
            step,
            message: msg.to_string(),
        }
        .into()
    }
}

#[derive(Display, Debug, From)]
pub enum ErrorKind {
    #[display("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[display("Failed to load the Harneet grammar: {_0}")]
    Language(tree_sitter::LanguageError),

    #[display("Invalid query: {_0}")]
    Query(tree_sitter::QueryError),

    #[display("Parsing was cancelled before a tree was produced")]
    ParseCancelled,

    #[display("Invalid edit: {_0}")]
    #[from(ignore)]
    InvalidEdit(String),

    #[display("{step} failed: {message}")]
    Deploy { step: DeployStep, message: String },
}

/// The stage of a Helix deployment an error came from.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum DeployStep {
    #[display("Resolving the Helix path")]
    ResolvePath,
    #[display("Validating the Helix checkout")]
    Validate,
    #[display("Cleaning build artifacts")]
    Clean,
    #[display("Generating the parser")]
    Generate,
    #[display("Building the grammar library")]
    Build,
    #[display("Copying the grammar library")]
    CopyGrammar,
    #[display("Copying queries")]
    CopyQueries,
}

impl std::error::Error for HarneetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            ErrorKind::Io { source, .. } => Some(source),
            ErrorKind::Language(e) => Some(e),
            ErrorKind::Query(e) => Some(e),
            _ => None,
        }
    }
}
