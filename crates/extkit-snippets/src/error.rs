//! Error types for snippet synthesis.

use thiserror::Error;

/// Result type alias for extkit-snippets operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synthesizing a fragment.
#[derive(Debug, Error)]
pub enum Error {
    /// The anchor line has no alphabetic character to measure
    /// indentation from (e.g. an empty document).
    #[error("anchor line {line} has no parseable indentation")]
    UnparseableAnchor { line: usize },

    /// A metric attribute is so long that no amount of prefix
    /// truncation brings the key under the length limit. This signals
    /// bad scrape data, not a synthesis bug.
    #[error("attribute '{attribute}' cannot fit within the {limit}-character key limit")]
    TruncationInfeasible { attribute: String, limit: usize },

    /// A locator query failed while establishing context.
    #[error(transparent)]
    Locator(#[from] extkit_locator::Error),
}
