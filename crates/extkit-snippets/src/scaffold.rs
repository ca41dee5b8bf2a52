//! Screen and topology scaffolding fragments.
//!
//! Beyond metrics, the authoring flow offers two structural inserts: a
//! unified-analysis screen entry for an entity type, and a topology
//! type with one instance rule. Both follow the same contract as
//! metric synthesis: context-derived indentation, `Ok(None)` when the
//! entity is already declared.

use crate::fragment::{FragmentContext, YamlFragment};
use crate::Result;
use std::collections::BTreeSet;

/// Build a `screens` list entry for an entity type.
///
/// Anchoring on the `screens:` header emits list items beneath it;
/// anchoring inside the block aligns with the anchor line; anchoring
/// anywhere else emits a complete `screens:` block. Returns `Ok(None)`
/// when a screen for the entity type is already declared.
pub fn build_screen_entry(
    ctx: &FragmentContext,
    entity_type: &str,
    existing_keys: &BTreeSet<String>,
) -> Result<Option<YamlFragment>> {
    if entity_type.is_empty() || existing_keys.contains(entity_type) {
        return Ok(None);
    }

    let on_header = ctx.anchor_block.as_deref() == Some("screens");
    let inside = ctx.parent_blocks.iter().any(|b| b == "screens");

    let base_indent = if inside {
        ctx.sibling_item_indent()
    } else {
        ctx.anchor_indent + 2
    };
    let mut builder = YamlFragment::builder(ctx.anchor_line + 1, base_indent);

    if !on_header && !inside {
        // `screens:` goes at the anchor's own column, entries below it
        builder.line_at(ctx.anchor_indent, "screens:");
    }

    builder.line(0, &format!("- entityType: {entity_type}"));
    builder.line(2, "listSettings:");
    builder.line(4, "staticContent:");
    builder.line(6, "showGlobalFilterBar: true");
    builder.line(2, "detailsSettings:");
    builder.line(4, "staticContent:");
    builder.line(6, "showProblems: true");
    builder.introduce(entity_type);

    Ok(Some(builder.finish()))
}

/// Build a `topology` type entry with a single instance rule.
///
/// The rule derives entity identity from `source_attr`, a dimension
/// the datasource emits. Synthesis requires `topology` (or its `types`
/// list) in context; elsewhere the result is `Ok(None)`, matching the
/// fail-absent policy of the metric generator. Also `Ok(None)` when
/// the type is already declared.
pub fn build_topology_rule(
    ctx: &FragmentContext,
    entity_type: &str,
    source_attr: &str,
    existing_keys: &BTreeSet<String>,
) -> Result<Option<YamlFragment>> {
    if entity_type.is_empty() || existing_keys.contains(entity_type) {
        return Ok(None);
    }
    if !ctx.in_block("topology") {
        return Ok(None);
    }

    let on_topology_header = ctx.anchor_block.as_deref() == Some("topology");
    let on_types_header = ctx.anchor_block.as_deref() == Some("types");

    let base_indent = if on_topology_header || on_types_header {
        ctx.anchor_indent + 2
    } else {
        ctx.sibling_item_indent()
    };
    let mut builder = YamlFragment::builder(ctx.anchor_line + 1, base_indent);

    let item_offset = if on_topology_header {
        builder.line(0, "types:");
        2
    } else {
        0
    };

    builder.line(item_offset, &format!("- name: {entity_type}"));
    builder.line(item_offset + 2, &format!("displayName: {entity_type}"));
    builder.line(item_offset + 2, "enabled: true");
    builder.line(item_offset + 2, "rules:");
    builder.line(
        item_offset + 4,
        &format!("- idPattern: {entity_type}_{{{source_attr}}}"),
    );
    builder.line(
        item_offset + 6,
        &format!("instanceNamePattern: {{{source_attr}}}"),
    );
    builder.line(item_offset + 6, "sources:");
    builder.line(item_offset + 8, "- sourceType: Metrics");
    builder.line(item_offset + 10, "condition: $prefix(custom)");
    builder.introduce(entity_type);

    Ok(Some(builder.finish()))
}
