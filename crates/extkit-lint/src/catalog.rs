//! Rule catalog and lookup.
//!
//! Maps stable diagnostic codes (like `manifest-name-missing`) to
//! their fixed severity and message text. The catalog is embedded at
//! compile time with `include_str!`, so there is no runtime file I/O.

use extkit_model::Severity;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for a diagnostic code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleInfo {
    /// Fixed severity of the rule.
    pub severity: Severity,

    /// Fixed message text shown for every violation.
    pub message: String,
}

/// Global rule catalog, loaded lazily from JSON at compile time.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid, which can only happen when
/// the catalog file is edited incorrectly.
pub static RULE_CATALOG: Lazy<HashMap<String, RuleInfo>> = Lazy::new(|| {
    let json_data = include_str!("../catalog.json");
    serde_json::from_str(json_data).expect("invalid rule catalog JSON - this is a bug in extkit")
});

/// Look up rule information for a diagnostic code.
///
/// Returns `None` if the code is not in the catalog.
pub fn get_rule_info(code: &str) -> Option<&RuleInfo> {
    RULE_CATALOG.get(code)
}
