//! Export errors and diagnostics.

use std::{fmt, io};

use thiserror::Error;

/// Fatal export error.
///
/// The document produced so far is invalid when one of these is returned.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output sink failure.
    #[error("Failed to write the document: {0}")]
    Io(#[from] io::Error),
    /// Closing tag does not match the innermost open node.
    #[error("Cannot close node {tag:?}: innermost open node is {open:?}")]
    UnbalancedClose {
        /// Tag being closed.
        tag: &'static str,
        /// Innermost open tag.
        open: Option<&'static str>,
    },
    /// Document finished with open nodes.
    #[error("Document finished with unclosed nodes: {open:?}")]
    UnclosedNodes {
        /// Open tags, outermost first.
        open: Vec<String>,
    },
    /// Export options are inconsistent.
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),
}

impl ExportError {
    /// Returns the kind of the error.
    pub fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::Structural
    }
}

/// Kind of an export problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Object contributes nothing to the document.
    SkippedObject,
    /// Reference that cannot be resolved, replaced by a default.
    UnresolvedReference,
    /// Optional data that is absent, replaced by a default.
    MissingData,
    /// Malformed document or failing output. Always fatal.
    Structural,
}

impl DiagnosticKind {
    /// Returns whether the export stops on this kind of problem.
    pub fn is_fatal(self) -> bool {
        self == DiagnosticKind::Structural
    }
}

/// Non-fatal problem found during an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Kind.
    pub kind: DiagnosticKind,
    /// Name of the object concerned.
    pub object: String,
    /// Message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new `Diagnostic`.
    pub(crate) fn new(kind: DiagnosticKind, object: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            object: object.to_owned(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}): {}", self.kind, self.object, self.message)
    }
}
