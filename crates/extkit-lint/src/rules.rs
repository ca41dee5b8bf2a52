//! The lint rule pass.
//!
//! Rules are cheap line scans anchored on locator ranges; only the
//! syntax rule parses the document as YAML. The pass never fails —
//! an unscannable document yields the single syntax diagnostic.

use crate::Diagnostic;
use extkit_locator::{block_range, Document};
use extkit_model::{Position, Range, MAX_KEY_LEN};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use yaml_rust2::YamlLoader;

static OID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").unwrap());

/// Lint a manifest document.
pub fn lint(text: &str) -> Vec<Diagnostic> {
    if let Err(err) = YamlLoader::load_from_str(text) {
        let marker = err.marker();
        let pos = Position::new(
            marker.line().saturating_sub(1) as u32,
            marker.col() as u32,
        );
        return vec![Diagnostic::for_code("yaml-syntax-error", Range::point(pos))
            .with_message(format!("Manifest is not valid YAML: {err}"))];
    }

    let doc = Document::new(text);
    let mut diagnostics = Vec::new();
    check_required_scalars(&doc, &mut diagnostics);
    check_screen_entries(&doc, &mut diagnostics);
    check_metric_keys(&doc, &mut diagnostics);
    diagnostics
}

/// Indentation and content with leading list markers stripped.
fn item_content(line: &str) -> (usize, &str) {
    let mut content = line.trim_start_matches(' ');
    let mut indent = line.len() - content.len();
    while let Some(rest) = content.strip_prefix("- ") {
        let rest = rest.trim_start_matches(' ');
        indent += content.len() - rest.len();
        content = rest;
    }
    (indent, content.trim_end())
}

/// The scalar value of a `name: value` line, if `name` matches.
fn scalar_value<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(name)?.strip_prefix(':')?;
    let value = rest.trim();
    (!value.is_empty()).then_some(value)
}

/// `name` and `version` must be declared at root with non-empty values.
fn check_required_scalars(doc: &Document, diagnostics: &mut Vec<Diagnostic>) {
    for (field, code) in [
        ("name", "manifest-name-missing"),
        ("version", "manifest-version-missing"),
    ] {
        let declared = doc.lines().any(|line| {
            !line.starts_with(' ') && scalar_value(line.trim_end(), field).is_some()
        });
        if !declared {
            diagnostics.push(Diagnostic::for_code(
                code,
                Range::point(Position::new(0, 0)),
            ));
        }
    }
}

/// Every `screens` list entry must declare an `entityType`.
fn check_screen_entries(doc: &Document, diagnostics: &mut Vec<Diagnostic>) {
    let Ok(range) = block_range("screens", doc) else {
        return;
    };

    let mut item_indent = None;
    let mut markers: Vec<usize> = Vec::new();
    for i in range.start_line + 1..range.end_line {
        let Some(raw) = doc.line(i) else { break };
        let rest = raw.trim_start_matches(' ');
        if !rest.starts_with("- ") {
            continue;
        }
        let indent = raw.len() - rest.len();
        let expected = *item_indent.get_or_insert(indent);
        if indent == expected {
            markers.push(i);
        }
    }

    for (n, &marker) in markers.iter().enumerate() {
        let item_end = markers.get(n + 1).copied().unwrap_or(range.end_line);
        let has_entity_type = (marker..item_end).any(|i| {
            let (_, content) = item_content(doc.line(i).unwrap_or_default());
            scalar_value(content, "entityType").is_some()
        });
        if !has_entity_type {
            diagnostics.push(Diagnostic::for_code(
                "entity-type-required",
                Range::lines(marker as u32, marker as u32 + 1),
            ));
        }
    }
}

/// Key-length, OID-syntax, and duplicate-key checks over `key:` and
/// `value: oid:` entries anywhere in the document.
fn check_metric_keys(doc: &Document, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for i in 0..doc.line_count() {
        if doc.is_blank_or_comment(i) {
            continue;
        }
        let (_, content) = item_content(doc.line(i).unwrap_or_default());
        let line_range = Range::lines(i as u32, i as u32 + 1);

        if let Some(key) = scalar_value(content, "key") {
            if key.len() > MAX_KEY_LEN {
                diagnostics.push(
                    Diagnostic::for_code("metric-key-too-long", line_range).with_message(
                        format!("Metric key exceeds the {MAX_KEY_LEN} character limit"),
                    ),
                );
            }
            if let Some(first) = seen.get(key) {
                diagnostics.push(
                    Diagnostic::for_code("duplicate-metric-key", line_range).with_message(
                        format!("Metric key '{key}' is already defined on line {}", first + 1),
                    ),
                );
            } else {
                seen.insert(key.to_string(), i);
            }
        }

        if let Some(value) = scalar_value(content, "value") {
            if let Some(oid) = value.strip_prefix("oid:") {
                if !OID_RE.is_match(oid.trim()) {
                    diagnostics.push(Diagnostic::for_code("oid-syntax-invalid", line_range));
                }
            }
        }
    }
}
