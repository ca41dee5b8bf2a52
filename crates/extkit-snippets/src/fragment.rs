//! Fragment context and the synthesized-fragment type.

use crate::{Error, Result};
use extkit_locator::{parent_blocks_of, Document};
use std::collections::BTreeSet;

/// Structural context for an insertion, derived from the anchor line.
#[derive(Debug, Clone)]
pub struct FragmentContext {
    /// Blocks enclosing the anchor line, outermost first.
    pub parent_blocks: Vec<String>,
    /// The bare mapping key on the anchor line itself, if it has one.
    pub anchor_block: Option<String>,
    /// The anchor line (fragments insert at `anchor_line + 1`).
    pub anchor_line: usize,
    /// Indentation of the anchor, measured to its first alphabetic
    /// character.
    pub anchor_indent: usize,
    /// Marker column of the list item the anchor sits on or inside,
    /// when there is one.
    pub marker_indent: Option<usize>,
}

impl FragmentContext {
    /// Build the context for an anchor line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnparseableAnchor`] when the anchor line has no
    /// alphabetic character to measure indentation from, and propagates
    /// locator errors for out-of-range lines.
    pub fn at(doc: &Document, line: usize) -> Result<Self> {
        let parent_blocks = parent_blocks_of(line, doc)?;

        let raw = doc.line(line).unwrap_or_default();
        let anchor_indent = raw
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| i)
            .ok_or(Error::UnparseableAnchor { line })?;

        let anchor_block = bare_key_of(raw);
        let marker_indent = marker_indent_of(doc, line, anchor_indent);

        Ok(Self {
            parent_blocks,
            anchor_block,
            anchor_line: line,
            anchor_indent,
            marker_indent,
        })
    }

    /// Whether a block name appears in the enclosing stack or on the
    /// anchor line itself.
    pub fn in_block(&self, name: &str) -> bool {
        self.anchor_block.as_deref() == Some(name)
            || self.parent_blocks.iter().any(|b| b == name)
    }

    /// Column at which a new sibling list item must place its marker.
    ///
    /// Anchoring on a list item (or one of its continuation lines)
    /// aligns with that item's marker; anywhere else the anchor's own
    /// indentation is the item column.
    pub fn sibling_item_indent(&self) -> usize {
        self.marker_indent.unwrap_or(self.anchor_indent)
    }

    /// The innermost datasource block enclosing the anchor, if any.
    ///
    /// This is the single insertion trigger for metric synthesis: no
    /// datasource in context means no fragment is offered.
    pub fn datasource(&self) -> Option<&str> {
        self.anchor_block
            .as_deref()
            .into_iter()
            .chain(self.parent_blocks.iter().rev().map(String::as_str))
            .find(|name| extkit_locator::is_datasource_block(name))
    }
}

/// Marker column of the list item whose content sits at
/// `anchor_indent`, scanning upward from the anchor line. `None` when
/// the anchor's column is not a list-item content column.
fn marker_indent_of(doc: &Document, line: usize, anchor_indent: usize) -> Option<usize> {
    for i in (0..=line).rev() {
        let raw = doc.line(i)?;
        let trimmed = raw.trim_start_matches(' ');
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = raw.len() - trimmed.len();
        let is_marker = trimmed.starts_with("- ");
        let content_col = if is_marker { indent + 2 } else { indent };
        if content_col > anchor_indent {
            // deeper content belonging to the same item
            continue;
        }
        if content_col == anchor_indent {
            if is_marker {
                return Some(indent);
            }
            // a sibling continuation line; the marker is further up
            continue;
        }
        return None;
    }
    None
}

/// The bare mapping key of a line, list markers stripped.
fn bare_key_of(line: &str) -> Option<String> {
    let mut content = line.trim();
    while let Some(rest) = content.strip_prefix("- ") {
        content = rest.trim_start();
    }
    let name = content.strip_suffix(':')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    valid.then(|| name.to_string())
}

/// A synthesized YAML text block plus its insertion point.
///
/// The text is newline-terminated and already indented; the caller
/// inserts it verbatim at `(insert_line, column 0)` in one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlFragment {
    /// The fragment text, every line indented, newline-terminated.
    pub text: String,
    /// Target line for the insertion (anchor line + 1).
    pub insert_line: usize,
    /// Indentation applied to the fragment's outermost lines.
    pub indent: usize,
    /// Identifiers the fragment introduces, for idempotence checks.
    pub introduced_keys: BTreeSet<String>,
}

impl YamlFragment {
    /// A builder collecting indented lines.
    pub(crate) fn builder(insert_line: usize, indent: usize) -> FragmentBuilder {
        FragmentBuilder {
            text: String::new(),
            insert_line,
            indent,
            introduced_keys: BTreeSet::new(),
        }
    }
}

/// Accumulates fragment lines at a fixed base indentation.
pub(crate) struct FragmentBuilder {
    text: String,
    insert_line: usize,
    indent: usize,
    introduced_keys: BTreeSet<String>,
}

impl FragmentBuilder {
    /// Append one line at `base indent + extra` columns.
    pub(crate) fn line(&mut self, extra: usize, content: &str) {
        self.line_at(self.indent + extra, content);
    }

    /// Append one line at an absolute column, ignoring the base indent.
    pub(crate) fn line_at(&mut self, columns: usize, content: &str) {
        for _ in 0..columns {
            self.text.push(' ');
        }
        self.text.push_str(content);
        self.text.push('\n');
    }

    pub(crate) fn introduce(&mut self, key: impl Into<String>) {
        self.introduced_keys.insert(key.into());
    }

    pub(crate) fn finish(self) -> YamlFragment {
        YamlFragment {
            text: self.text,
            insert_line: self.insert_line,
            indent: self.indent,
            introduced_keys: self.introduced_keys,
        }
    }
}
