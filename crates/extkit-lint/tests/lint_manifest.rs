use extkit_lint::{get_rule_info, lint};
use extkit_locator::{block_range, Document};
use extkit_model::Severity;

const MANIFEST: &str = "\
name: custom:snmp.switch
version: 0.3.0
snmp:
  - group: interfaces
    subgroups:
      - subgroup: traffic
        metrics:
          - key: custom.snmp.if.in_octets
            value: oid:1.3.6.1.2.1.2.2.1.10
          - key: custom.snmp.if.in_octets
            value: oid:not.an.oid
screens:
  - entityType: sample:switch
  - displayName: no entity type here
";

#[test]
fn every_emitted_code_exists_in_the_catalog() {
    for diag in lint(MANIFEST) {
        let info = get_rule_info(&diag.code)
            .unwrap_or_else(|| panic!("emitted code '{}' not in catalog", diag.code));
        assert_eq!(diag.severity, info.severity);
    }
}

#[test]
fn findings_are_anchored_inside_their_blocks() {
    let doc = Document::new(MANIFEST);
    let snmp = block_range("snmp", &doc).unwrap();
    let screens = block_range("screens", &doc).unwrap();

    for diag in lint(MANIFEST) {
        let line = diag.range.start.line as usize;
        match diag.code.as_str() {
            "duplicate-metric-key" | "oid-syntax-invalid" => {
                assert!(snmp.contains(line), "{} outside snmp block", diag.code)
            }
            "entity-type-required" => {
                assert!(screens.contains(line), "{} outside screens block", diag.code)
            }
            other => panic!("unexpected diagnostic {other}"),
        }
    }
}

#[test]
fn expected_findings_for_the_sample() {
    let diags = lint(MANIFEST);
    let mut codes: Vec<&str> = diags.iter().map(|d| d.code.as_str()).collect();
    codes.sort_unstable();
    assert_eq!(
        codes,
        vec![
            "duplicate-metric-key",
            "entity-type-required",
            "oid-syntax-invalid",
        ]
    );
}

#[test]
fn errors_and_warnings_are_distinguished() {
    let diags = lint(MANIFEST);
    assert!(diags.iter().any(|d| d.severity == Severity::Error));
    assert!(diags.iter().any(|d| d.severity == Severity::Warning));
}

#[test]
fn empty_document_reports_missing_required_fields() {
    let diags = lint("");
    let codes: Vec<&str> = diags.iter().map(|d| d.code.as_str()).collect();
    assert!(codes.contains(&"manifest-name-missing"));
    assert!(codes.contains(&"manifest-version-missing"));
}
