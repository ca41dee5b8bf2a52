//! Manifest linting with stable diagnostic codes.
//!
//! The linter runs a syntax pass (plain YAML parse) followed by
//! structural rules anchored on `extkit-locator` ranges. Every
//! diagnostic carries a stable string code looked up in an embedded
//! catalog, so editor integrations can attach quick-fix actions and
//! documentation links by code rather than by message text.
//!
//! Linting never fails: a document that cannot even be scanned as
//! YAML yields the single `yaml-syntax-error` diagnostic.

pub mod catalog;
pub mod diagnostic;
pub mod rules;

pub use catalog::{get_rule_info, RuleInfo, RULE_CATALOG};
pub use diagnostic::Diagnostic;
pub use rules::lint;
