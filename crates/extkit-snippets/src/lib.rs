//! Snippet synthesis for extension manifests.
//!
//! Given structural context from `extkit-locator` and a snapshot of
//! scraped metric data, this crate produces indentation-correct YAML
//! fragments (metric groups, screen entries, topology rules) ready to
//! be inserted verbatim by the host editor. Nothing here touches the
//! document: a fragment is a patch instruction, and the caller applies
//! it transactionally.
//!
//! Every generator is idempotent against the set of identifiers the
//! document already defines: when there is nothing new to add it
//! returns `Ok(None)` and the integration layer simply offers no
//! action.

pub mod error;
pub mod fragment;
pub mod metrics;
pub mod sanitize;
pub mod scaffold;

pub use error::{Error, Result};
pub use fragment::{FragmentContext, YamlFragment};
pub use metrics::build_metric_groups;
pub use sanitize::{metric_key, sanitize_key, wildcard_query, MAX_KEY_LEN};
pub use scaffold::{build_screen_entry, build_topology_rule};
