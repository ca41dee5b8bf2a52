//! Shared data model for extension-manifest tooling.
//!
//! This crate holds the types every other `extkit-*` crate speaks:
//! document positions and ranges, diagnostic severities, and the typed
//! scrape-data model that external metric introspection (JMX, WMI,
//! SNMP, ...) delivers to the snippet synthesizer.
//!
//! All positions use 0-based line and character indices.

pub mod scrape;
pub mod types;

pub use scrape::{ScrapeCache, ScrapeData, ScrapeElement, ScrapeMetric};
pub use types::{Position, Range, Severity};

/// Maximum length the platform accepts for a metric or dimension key.
pub const MAX_KEY_LEN: usize = 250;

/// Result type alias for extkit-model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced at the data-model boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Scrape data did not match the expected shape.
    #[error("malformed scrape data: {0}")]
    MalformedScrapeData(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedScrapeData(err.to_string())
    }
}
