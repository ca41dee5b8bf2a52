//! Known manifest block names.

/// Top-level block names an extension manifest may contain.
///
/// SQL datasources are versioned (`sqlOracle`, `sqlServer`, ...) and
/// are matched by prefix via [`is_datasource_block`] rather than
/// listed here exhaustively.
pub const KNOWN_TOP_LEVEL_BLOCKS: &[&str] = &[
    "metrics",
    "snmp",
    "wmi",
    "jmx",
    "prometheus",
    "screens",
    "alerts",
    "topology",
    "vars",
];

/// Whether a block name denotes a datasource section.
///
/// Datasource blocks are where metric/query snippets may be inserted;
/// structural blocks like `screens` or `topology` are not.
pub fn is_datasource_block(name: &str) -> bool {
    matches!(name, "snmp" | "wmi" | "jmx" | "prometheus") || name.starts_with("sql")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasource_classification() {
        assert!(is_datasource_block("jmx"));
        assert!(is_datasource_block("snmp"));
        assert!(is_datasource_block("sqlOracle"));
        assert!(is_datasource_block("sqlServer"));
        assert!(!is_datasource_block("screens"));
        assert!(!is_datasource_block("topology"));
        assert!(!is_datasource_block("metrics"));
    }
}
