use extkit_locator::{document_keys, Document};
use extkit_model::{ScrapeData, ScrapeElement, ScrapeMetric};
use extkit_snippets::{build_metric_groups, FragmentContext};
use std::collections::{BTreeMap, BTreeSet};

fn element(path: &str, attrs: &[(&str, bool)]) -> ScrapeElement {
    ScrapeElement {
        full_path: path.to_string(),
        properties: BTreeMap::new(),
        metrics: attrs
            .iter()
            .map(|(name, numeric)| ScrapeMetric {
                name: name.to_string(),
                numeric: *numeric,
            })
            .collect(),
    }
}

fn scrape_of(elements: Vec<ScrapeElement>) -> ScrapeData {
    let mut mbeans = BTreeMap::new();
    mbeans.insert("beans".to_string(), elements);
    let mut domains = BTreeMap::new();
    domains.insert("sample".to_string(), mbeans);
    ScrapeData { domains }
}

/// Splice a fragment into document text the way the host editor would.
fn apply_fragment(text: &str, fragment: &extkit_snippets::YamlFragment) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    let mut out = String::new();
    let insert_at = fragment.insert_line.min(lines.len());
    for line in lines.drain(..insert_at) {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&fragment.text);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[test]
fn twenty_three_elements_roll_over_into_three_groups() {
    let elements: Vec<ScrapeElement> = (0..23)
        .map(|i| element(&format!("sample:type=Bean{i:02}"), &[("Count", true)]))
        .collect();
    let data = scrape_of(elements);

    let doc = Document::new("jmx:\n");
    let ctx = FragmentContext::at(&doc, 0).unwrap();
    let fragment = build_metric_groups(&ctx, &data, &BTreeSet::new())
        .unwrap()
        .unwrap();

    for group in ["group_0", "group_1", "group_2"] {
        assert!(
            fragment.text.contains(&format!("- group: {group}\n")),
            "missing {group}"
        );
    }
    assert!(!fragment.text.contains("group_3"));

    // subgroup counts per group: 10, 10, 3
    let counts: Vec<usize> = fragment
        .text
        .split("- group: ")
        .skip(1)
        .map(|section| section.matches("- subgroup:").count())
        .collect();
    assert_eq!(counts, vec![10, 10, 3]);
}

#[test]
fn synthesis_is_deterministic() {
    let data = scrape_of(vec![
        element("sample:type=A", &[("X", true), ("Label", false)]),
        element("sample:type=B", &[("Y", true)]),
    ]);

    let doc = Document::new("jmx:\n");
    let ctx = FragmentContext::at(&doc, 0).unwrap();

    let first = build_metric_groups(&ctx, &data, &BTreeSet::new())
        .unwrap()
        .unwrap();
    let second = build_metric_groups(&ctx, &data, &BTreeSet::new())
        .unwrap()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn inserting_then_rerunning_yields_nothing() {
    let data = scrape_of(vec![
        element("sample:type=Memory", &[("Used", true), ("Max", true)]),
        element("sample:type=Flags", &[("Verbose", false)]),
    ]);

    let original = "name: custom:sample\njmx:\n";
    let doc = Document::new(original);
    let ctx = FragmentContext::at(&doc, 1).unwrap();

    let fragment = build_metric_groups(&ctx, &data, &document_keys(&doc))
        .unwrap()
        .unwrap();
    let updated = apply_fragment(original, &fragment);

    // every key the fragment claimed to introduce is now visible
    let updated_doc = Document::new(&updated);
    let keys = document_keys(&updated_doc);
    for key in &fragment.introduced_keys {
        assert!(keys.contains(key), "introduced key {key} not found");
    }

    // the same scrape against the updated document is a no-op
    let ctx = FragmentContext::at(&updated_doc, 1).unwrap();
    let rerun = build_metric_groups(&ctx, &data, &keys).unwrap();
    assert!(rerun.is_none(), "expected no-op, got:\n{:?}", rerun);
}

#[test]
fn partially_inserted_document_gets_only_the_new_elements() {
    let known = element("sample:type=Memory", &[("Used", true)]);
    let fresh = element("sample:type=Threads", &[("Live", true)]);
    let data = scrape_of(vec![known.clone(), fresh]);

    let original = "jmx:\n";
    let doc = Document::new(original);
    let ctx = FragmentContext::at(&doc, 0).unwrap();

    // first pass inserts only the known element
    let first = build_metric_groups(&ctx, &scrape_of(vec![known]), &document_keys(&doc))
        .unwrap()
        .unwrap();
    let updated = apply_fragment(original, &first);

    let updated_doc = Document::new(&updated);
    let ctx = FragmentContext::at(&updated_doc, 0).unwrap();
    let second = build_metric_groups(&ctx, &data, &document_keys(&updated_doc))
        .unwrap()
        .unwrap();

    assert!(second.text.contains("sample.type_threads.live"));
    assert!(!second.text.contains("sample.type_memory.used"));
    assert_eq!(second.text.matches("- subgroup:").count(), 1);
}

#[test]
fn anchoring_inside_the_list_joins_it_as_a_sibling() {
    let data = scrape_of(vec![element("sample:type=Threads", &[("Live", true)])]);

    let original = "\
name: custom:sample
version: 1.0.0
jmx:
  groups:
    - group: existing
      subgroups: []
";
    // anchor on the last line of the existing item
    let doc = Document::new(original);
    let ctx = FragmentContext::at(&doc, 5).unwrap();

    let fragment = build_metric_groups(&ctx, &data, &document_keys(&doc))
        .unwrap()
        .unwrap();

    // the new item's marker lines up with the existing one
    assert!(fragment.text.starts_with("    - group: group_0\n"));

    let updated = apply_fragment(original, &fragment);
    let parsed = yaml_rust2::YamlLoader::load_from_str(&updated)
        .expect("spliced document must still parse");
    let groups = parsed[0]["jmx"]["groups"]
        .as_vec()
        .expect("groups must still be a list");
    assert_eq!(groups.len(), 2);
}

#[test]
fn fragment_lines_are_all_indented_below_the_anchor() {
    let data = scrape_of(vec![element("sample:type=A", &[("X", true)])]);
    let doc = Document::new("jmx:\n");
    let ctx = FragmentContext::at(&doc, 0).unwrap();
    let fragment = build_metric_groups(&ctx, &data, &BTreeSet::new())
        .unwrap()
        .unwrap();

    for line in fragment.text.lines() {
        let indent = line.len() - line.trim_start().len();
        assert!(indent >= fragment.indent, "line under-indented: {line:?}");
    }
    assert!(fragment.text.ends_with('\n'));
}
