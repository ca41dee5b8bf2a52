//! The diagnostic type emitted by lint rules.

use crate::catalog::get_rule_info;
use extkit_model::{Range, Severity};
use serde::{Deserialize, Serialize};

/// A lint finding: a stable code anchored to a document range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The range at which the diagnostic applies.
    pub range: Range,
    /// The diagnostic's severity, fixed per code.
    pub severity: Severity,
    /// Stable diagnostic code from the rule catalog.
    pub code: String,
    /// The diagnostic's message.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic for a cataloged code.
    ///
    /// # Panics
    ///
    /// Panics when the code is not in the catalog; rules only emit
    /// codes the catalog defines.
    pub fn for_code(code: &str, range: Range) -> Self {
        let info = get_rule_info(code)
            .unwrap_or_else(|| panic!("diagnostic code '{code}' missing from catalog"));
        Self {
            range,
            severity: info.severity,
            code: code.to_string(),
            message: info.message.clone(),
        }
    }

    /// Replace the catalog message with a more specific one.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
