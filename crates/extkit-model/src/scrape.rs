//! Typed scrape-data model.
//!
//! Metric introspection (querying a JMX/WMI/SNMP endpoint for the
//! attributes it exposes) is performed by an external collaborator and
//! handed to this workspace as JSON. That JSON is deserialized here,
//! at the system boundary, into fully typed structures — a document
//! that does not match the expected shape fails fast with
//! [`Error::MalformedScrapeData`](crate::Error) instead of producing
//! half-populated records deep inside the synthesizer.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single instrumentable attribute reported by a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeMetric {
    /// Attribute name as reported by the endpoint (original case).
    pub name: String,
    /// Whether the attribute carries a numeric value.
    ///
    /// Numeric attributes become metrics; everything else becomes a
    /// dimension on the enclosing subgroup.
    pub numeric: bool,
}

/// One scraped element: an object path plus its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScrapeElement {
    /// Full hierarchical path of the element, e.g.
    /// `java.lang:type=MemoryPool,name=`.
    pub full_path: String,
    /// Key/value properties of the element (original case preserved).
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Attributes exposed by the element.
    #[serde(default)]
    pub metrics: Vec<ScrapeMetric>,
}

impl ScrapeElement {
    /// The attributes that carry numeric values.
    pub fn numeric_metrics(&self) -> impl Iterator<Item = &ScrapeMetric> {
        self.metrics.iter().filter(|m| m.numeric)
    }

    /// The attributes that do not carry numeric values.
    pub fn non_numeric_metrics(&self) -> impl Iterator<Item = &ScrapeMetric> {
        self.metrics.iter().filter(|m| !m.numeric)
    }
}

/// The full result of one scrape: domain → mbean → elements.
///
/// `BTreeMap` keeps domain and mbean iteration deterministic; element
/// order within an mbean is the endpoint's reporting order and is
/// never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeData {
    pub domains: BTreeMap<String, BTreeMap<String, Vec<ScrapeElement>>>,
}

impl ScrapeData {
    /// Deserialize scrape data from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedScrapeData`](crate::Error) when the
    /// JSON does not have the expected shape (missing `fullPath`,
    /// non-string property values, unknown element fields).
    pub fn from_json(json: &str) -> Result<Self> {
        let data: ScrapeData = serde_json::from_str(json)?;
        Ok(data)
    }

    /// Iterate over every element across all domains and mbeans, in
    /// deterministic (domain, mbean, source) order.
    pub fn elements(&self) -> impl Iterator<Item = &ScrapeElement> {
        self.domains
            .values()
            .flat_map(|mbeans| mbeans.values())
            .flatten()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.elements().count()
    }

    /// Check whether the scrape produced no elements at all.
    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none()
    }
}

/// Session cache for scrape results, keyed by scrape target.
///
/// The cache is an explicit value owned by the integration layer and
/// passed by reference into both the scraping collaborator and the
/// snippet synthesizer. Changing the scrape target must go through
/// [`ScrapeCache::set`], which drops data for every other target, so
/// stale results from a previous endpoint can never leak into a
/// fragment.
#[derive(Debug, Default)]
pub struct ScrapeCache {
    target: Option<String>,
    data: Option<ScrapeData>,
}

impl ScrapeCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store scrape data for a target, replacing anything held before.
    pub fn set(&mut self, target: impl Into<String>, data: ScrapeData) {
        self.target = Some(target.into());
        self.data = Some(data);
    }

    /// Get the cached data for a target, if it is the one cached.
    pub fn get(&self, target: &str) -> Option<&ScrapeData> {
        match &self.target {
            Some(t) if t == target => self.data.as_ref(),
            _ => None,
        }
    }

    /// The target the cache currently holds data for.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Drop all cached data.
    pub fn clear(&mut self) {
        self.target = None;
        self.data = None;
    }
}
