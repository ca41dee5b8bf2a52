//! Error types for locator queries.

use std::fmt;

/// Result type alias for extkit-locator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating structure in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Line index outside the document.
    OutOfRange { line: usize, line_count: usize },

    /// Named block absent at root indentation.
    BlockNotFound { name: String },

    /// Line not contained in the resolved block range.
    LineOutsideBlock { name: String, line: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { line, line_count } => {
                write!(f, "line {} out of range (document has {} lines)", line, line_count)
            }
            Error::BlockNotFound { name } => {
                write!(f, "block '{}' not found at root indentation", name)
            }
            Error::LineOutsideBlock { name, line } => {
                write!(f, "line {} is outside block '{}'", line, name)
            }
        }
    }
}

impl std::error::Error for Error {}
