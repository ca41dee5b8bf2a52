//! Metric-group fragment generation.
//!
//! Turns a scrape snapshot into `groups`/`subgroups` YAML for a
//! datasource block. The platform caps a group at 10 subgroups, so
//! output rolls over into `group_0`, `group_1`, ... as elements are
//! emitted.

use crate::fragment::{FragmentContext, YamlFragment};
use crate::sanitize::{metric_key, sanitize_key, wildcard_query};
use crate::Result;
use extkit_model::{ScrapeData, ScrapeElement};
use std::collections::BTreeSet;

/// Subgroups per group before rolling over to a new group.
const SUBGROUPS_PER_GROUP: usize = 10;

/// Placeholder metric emitted when an element exposes no numeric
/// attribute, so every subgroup stays non-empty.
const CONST_METRIC_KEY: &str = "jmx.const.value";
const CONST_METRIC_VALUE: &str = "const:1";

/// Build a metric-group fragment for every scraped element not yet in
/// the document.
///
/// Synthesis triggers only when the context sits in a datasource block
/// (`jmx`, `snmp`, `wmi`, `prometheus`, `sql*`); anywhere else the
/// result is `Ok(None)` and no action is offered. Elements are
/// processed in source-collection order, one subgroup each. An element
/// whose metric keys are all present already contributes nothing;
/// malformed elements are skipped with a warning rather than aborting
/// the batch.
///
/// Returns `Ok(None)` when the scrape produced no data or every
/// candidate key already exists.
pub fn build_metric_groups(
    ctx: &FragmentContext,
    data: &ScrapeData,
    existing_keys: &BTreeSet<String>,
) -> Result<Option<YamlFragment>> {
    if data.is_empty() || ctx.datasource().is_none() {
        return Ok(None);
    }

    // Anchoring on the datasource header itself means the `groups:`
    // key must be part of the fragment; anchoring on `groups:` or on a
    // line inside it means only list items are emitted.
    let on_datasource_header = ctx
        .anchor_block
        .as_deref()
        .is_some_and(extkit_locator::is_datasource_block);
    let on_groups_header = ctx.anchor_block.as_deref() == Some("groups");

    // Inside the list, new items align with the existing markers, not
    // with the anchor's content column.
    let base_indent = if on_datasource_header || on_groups_header {
        ctx.anchor_indent + 2
    } else {
        ctx.sibling_item_indent()
    };

    let mut builder = YamlFragment::builder(ctx.anchor_line + 1, base_indent);
    let item_offset = if on_datasource_header {
        builder.line(0, "groups:");
        2
    } else {
        0
    };

    // Keys planned earlier in this batch count as present too, so a
    // scrape reporting the same element twice emits it only once.
    let mut known = existing_keys.clone();
    let mut emitted = 0usize;
    for element in data.elements() {
        match plan_subgroup(element, &known) {
            Some(plan) => {
                if emitted % SUBGROUPS_PER_GROUP == 0 {
                    let group = emitted / SUBGROUPS_PER_GROUP;
                    builder.line(item_offset, &format!("- group: group_{group}"));
                    builder.line(item_offset + 2, "subgroups:");
                }
                emit_subgroup(&mut builder, item_offset + 4, &plan);
                for key in plan.introduced {
                    known.insert(key.clone());
                    builder.introduce(key);
                }
                emitted += 1;
            }
            None => continue,
        }
    }

    if emitted == 0 {
        return Ok(None);
    }
    Ok(Some(builder.finish()))
}

/// One subgroup's worth of generated content.
struct SubgroupPlan {
    name: String,
    query: String,
    dimensions: Vec<(String, String)>,
    metrics: Vec<(String, String)>,
    introduced: Vec<String>,
}

/// Decide what a scraped element contributes, or `None` to skip it.
fn plan_subgroup(element: &ScrapeElement, existing_keys: &BTreeSet<String>) -> Option<SubgroupPlan> {
    if element.full_path.is_empty() {
        tracing::warn!("skipping scraped element with empty path");
        return None;
    }

    let mut introduced = Vec::new();
    let mut metrics = Vec::new();

    let has_numeric = element.numeric_metrics().next().is_some();
    if has_numeric {
        for attr in element.numeric_metrics() {
            if attr.name.is_empty() {
                tracing::warn!(path = %element.full_path, "skipping unnamed attribute");
                continue;
            }
            let key = match metric_key(&element.full_path, &attr.name) {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!(path = %element.full_path, %err, "skipping attribute");
                    continue;
                }
            };
            if existing_keys.contains(&key) {
                continue;
            }
            introduced.push(key.clone());
            metrics.push((key, format!("attribute:{}", attr.name)));
        }
        if metrics.is_empty() {
            // every attribute already present (or unusable)
            return None;
        }
    } else {
        if existing_keys.contains(CONST_METRIC_KEY) {
            return None;
        }
        introduced.push(CONST_METRIC_KEY.to_string());
        metrics.push((CONST_METRIC_KEY.to_string(), CONST_METRIC_VALUE.to_string()));
    }

    let mut dimensions = Vec::new();
    for (prop, _) in &element.properties {
        dimensions.push((sanitize_key(prop), format!("property:{prop}")));
    }
    for attr in element.non_numeric_metrics() {
        if attr.name.is_empty() {
            continue;
        }
        dimensions.push((sanitize_key(&attr.name), format!("attribute:{}", attr.name)));
    }
    for (key, _) in &dimensions {
        introduced.push(key.clone());
    }

    Some(SubgroupPlan {
        name: subgroup_name(&element.full_path),
        query: wildcard_query(&element.full_path),
        dimensions,
        metrics,
        introduced,
    })
}

fn emit_subgroup(builder: &mut crate::fragment::FragmentBuilder, offset: usize, plan: &SubgroupPlan) {
    builder.line(offset, &format!("- subgroup: {}", plan.name));
    builder.line(offset + 2, &format!("query: {}", plan.query));

    if !plan.dimensions.is_empty() {
        builder.line(offset + 2, "dimensions:");
        for (key, value) in &plan.dimensions {
            builder.line(offset + 4, &format!("- key: {key}"));
            builder.line(offset + 6, &format!("value: {value}"));
        }
    }

    builder.line(offset + 2, "metrics:");
    for (key, value) in &plan.metrics {
        builder.line(offset + 4, &format!("- key: {key}"));
        builder.line(offset + 6, "type: gauge");
        builder.line(offset + 6, &format!("value: {value}"));
    }
}

/// Display name for a subgroup, derived from the path's final segment.
fn subgroup_name(full_path: &str) -> String {
    let segment = full_path.rsplit(':').next().unwrap_or(full_path);
    let name = sanitize_key(segment);
    if name.is_empty() {
        sanitize_key(full_path)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extkit_locator::Document;
    use extkit_model::ScrapeMetric;
    use std::collections::BTreeMap;

    fn element(path: &str, metrics: &[(&str, bool)]) -> ScrapeElement {
        ScrapeElement {
            full_path: path.to_string(),
            properties: BTreeMap::new(),
            metrics: metrics
                .iter()
                .map(|(name, numeric)| ScrapeMetric {
                    name: name.to_string(),
                    numeric: *numeric,
                })
                .collect(),
        }
    }

    fn data_of(elements: Vec<ScrapeElement>) -> ScrapeData {
        let mut mbeans = BTreeMap::new();
        mbeans.insert("beans".to_string(), elements);
        let mut domains = BTreeMap::new();
        domains.insert("test".to_string(), mbeans);
        ScrapeData { domains }
    }

    fn jmx_context() -> (Document<'static>, FragmentContext) {
        let doc = Document::new("name: x\njmx:\n");
        let ctx = FragmentContext::at(&doc, 1).unwrap();
        (doc, ctx)
    }

    #[test]
    fn fragment_includes_groups_header_on_datasource_anchor() {
        let (_doc, ctx) = jmx_context();
        let data = data_of(vec![element(
            "java.lang:type=Memory",
            &[("HeapMemoryUsage", true)],
        )]);

        let fragment = build_metric_groups(&ctx, &data, &BTreeSet::new())
            .unwrap()
            .unwrap();

        assert!(fragment.text.starts_with("  groups:\n"));
        assert!(fragment.text.contains("    - group: group_0\n"));
        assert!(fragment
            .text
            .contains("- key: java.lang.type_memory.heapmemoryusage\n"));
        assert!(fragment.text.contains("type: gauge"));
        assert!(fragment.text.contains("value: attribute:HeapMemoryUsage"));
        assert_eq!(fragment.insert_line, 2);
    }

    #[test]
    fn no_datasource_in_context_is_a_noop() {
        let doc = Document::new("screens:\n  - screenId: a\n");
        let ctx = FragmentContext::at(&doc, 1).unwrap();
        let data = data_of(vec![element("d:type=X", &[("A", true)])]);

        assert!(build_metric_groups(&ctx, &data, &BTreeSet::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn empty_scrape_is_a_noop() {
        let (_doc, ctx) = jmx_context();
        assert!(
            build_metric_groups(&ctx, &ScrapeData::default(), &BTreeSet::new())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn const_fallback_for_element_without_numeric_attributes() {
        let (_doc, ctx) = jmx_context();
        let data = data_of(vec![element("d:type=Flags", &[("Verbose", false)])]);

        let fragment = build_metric_groups(&ctx, &data, &BTreeSet::new())
            .unwrap()
            .unwrap();

        assert!(fragment.text.contains("- key: jmx.const.value\n"));
        assert!(fragment.text.contains("value: const:1"));
        // the non-numeric attribute became a dimension
        assert!(fragment.text.contains("- key: verbose\n"));
        assert!(fragment.text.contains("value: attribute:Verbose"));
    }

    #[test]
    fn malformed_element_is_skipped_not_fatal() {
        let (_doc, ctx) = jmx_context();
        let data = data_of(vec![
            element("", &[("A", true)]),
            element("d:type=Ok", &[("B", true)]),
        ]);

        let fragment = build_metric_groups(&ctx, &data, &BTreeSet::new())
            .unwrap()
            .unwrap();

        assert!(fragment.text.contains("d.type_ok.b"));
        // exactly one subgroup came out
        assert_eq!(fragment.text.matches("- subgroup:").count(), 1);
    }

    #[test]
    fn existing_keys_suppress_elements() {
        let (_doc, ctx) = jmx_context();
        let data = data_of(vec![element("d:type=X", &[("A", true)])]);

        let mut existing = BTreeSet::new();
        existing.insert("d.type_x.a".to_string());

        assert!(build_metric_groups(&ctx, &data, &existing)
            .unwrap()
            .is_none());
    }
}
