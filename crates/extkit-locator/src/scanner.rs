//! Indentation-driven structural queries.
//!
//! The scanner walks raw lines and reasons about indentation only. It
//! recognizes two syntactic shapes: bare mapping keys (`name:` with
//! nothing after the colon) and list-item markers (`- `). List markers
//! are transparent for depth purposes: a key introduced behind a
//! marker sits at the column of the key itself, so list items inherit
//! their mapping key's block name.

use crate::{Document, Error, Result};
use extkit_model::Range;
use std::collections::BTreeSet;

/// The line extent of a named block: `[start_line, end_line)`.
///
/// `start_line` is the header line (`name:` itself); `end_line` is the
/// first following line at the header's indentation or the end of the
/// document. Blank and comment lines never close a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl BlockRange {
    /// Whether a line falls inside the range (header included).
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line < self.end_line
    }

    /// Convert to a character-level [`Range`] covering whole lines.
    pub fn to_range(&self) -> Range {
        Range::lines(self.start_line as u32, self.end_line as u32)
    }
}

/// Indentation and content of a line with any list markers stripped.
///
/// `"  - subgroup:"` yields `(4, "subgroup:")`: the marker consumes
/// two columns and the key's own column is what matters for depth.
fn effective_content(line: &str) -> (usize, &str) {
    let mut content = line.trim_start_matches(' ');
    let mut indent = line.len() - content.len();
    while let Some(rest) = content.strip_prefix("- ") {
        let rest = rest.trim_start_matches(' ');
        indent += content.len() - rest.len();
        content = rest;
    }
    (indent, content.trim_end())
}

/// Extract a bare mapping key (`name:`, no inline scalar) from
/// marker-stripped content.
fn bare_key(content: &str) -> Option<&str> {
    let name = content.strip_suffix(':')?;
    if name.is_empty() {
        return None;
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    valid.then_some(name)
}

/// Compute the ordered stack of block names enclosing a line,
/// outermost first.
///
/// Scans upward from the target line, accepting as an ancestor any
/// bare mapping key at an indentation strictly smaller than every
/// indentation seen so far. A line at column 0 has an empty stack; a
/// blank target line inherits the context of the lines above it.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when `line` is not in
/// `[0, line_count)`.
pub fn parent_blocks_of(line: usize, doc: &Document) -> Result<Vec<String>> {
    if line >= doc.line_count() {
        return Err(Error::OutOfRange {
            line,
            line_count: doc.line_count(),
        });
    }

    let mut min_indent = match doc.line(line) {
        Some(raw) if !raw.trim().is_empty() => effective_content(raw).0,
        _ => usize::MAX,
    };

    let mut stack: Vec<String> = Vec::new();
    for i in (0..line).rev() {
        if min_indent == 0 {
            break;
        }
        if doc.is_blank_or_comment(i) {
            continue;
        }
        let raw = doc.line(i).unwrap_or_default();
        let (indent, content) = effective_content(raw);
        if indent >= min_indent {
            continue;
        }
        if let Some(name) = bare_key(content) {
            stack.push(name.to_string());
        }
        // Shallower non-key lines still tighten the bound
        min_indent = indent;
    }

    stack.reverse();
    Ok(stack)
}

/// Find the line range of the first root-level occurrence of a block.
///
/// The header must be exactly `name:` at column 0 (case-sensitive, no
/// inline value). Nested blocks with the same name are never matched;
/// callers needing one narrow the document first with
/// [`Document::slice`] and query again.
///
/// # Errors
///
/// Returns [`Error::BlockNotFound`] when the key never appears at root
/// indentation.
pub fn block_range(name: &str, doc: &Document) -> Result<BlockRange> {
    let header = format!("{name}:");
    let start_line = doc
        .lines()
        .position(|line| line.trim_end() == header)
        .ok_or_else(|| Error::BlockNotFound {
            name: name.to_string(),
        })?;

    let mut end_line = doc.line_count();
    for i in start_line + 1..doc.line_count() {
        if doc.is_blank_or_comment(i) {
            continue;
        }
        if doc.indent_of(i) == Some(0) {
            end_line = i;
            break;
        }
    }

    Ok(BlockRange {
        start_line,
        end_line,
    })
}

/// The 0-based ordinal of the list item containing a line within a
/// named root-level block.
///
/// Items are counted by their `- ` markers at the block's child
/// indentation, taken from the first marker found in the block. A line
/// inside the block but before its first item, like the header itself,
/// is not on any item and reports [`Error::LineOutsideBlock`].
///
/// # Errors
///
/// Returns [`Error::BlockNotFound`] when the block is absent and
/// [`Error::LineOutsideBlock`] when `line` falls outside the resolved
/// range or precedes the first item.
pub fn list_item_index_at_line(name: &str, line: usize, doc: &Document) -> Result<usize> {
    let range = block_range(name, doc)?;
    if line <= range.start_line || line >= range.end_line {
        return Err(Error::LineOutsideBlock {
            name: name.to_string(),
            line,
        });
    }

    let mut item_indent: Option<usize> = None;
    let mut count = 0usize;
    for i in range.start_line + 1..=line {
        let Some(raw) = doc.line(i) else { break };
        let rest = raw.trim_start_matches(' ');
        if !rest.starts_with("- ") && rest.trim_end() != "-" {
            continue;
        }
        let indent = raw.len() - rest.len();
        let expected = *item_indent.get_or_insert(indent);
        if indent == expected {
            count += 1;
        }
    }

    if count == 0 {
        return Err(Error::LineOutsideBlock {
            name: name.to_string(),
            line,
        });
    }
    Ok(count - 1)
}

/// Mapping keys whose scalar values identify manifest entities.
///
/// `key` carries metric and dimension identifiers, `entityType` and
/// `ofType` carry screen/relation targets, `name` carries the manifest
/// and topology-type names.
const IDENTIFIER_KEYS: &[&str] = &["key", "entityType", "ofType", "name"];

/// Collect the identifiers a document already defines.
///
/// Two families feed the synthesizer's idempotence check: every bare
/// or valued mapping key name, and every scalar value of an
/// identifier-bearing entry (see [`IDENTIFIER_KEYS`]), e.g.
/// `- key: custom.jmx.heap.used` contributes both `key` and
/// `custom.jmx.heap.used`.
pub fn document_keys(doc: &Document) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for (i, line) in doc.lines().enumerate() {
        if doc.is_blank_or_comment(i) {
            continue;
        }
        let (_, content) = effective_content(line);
        let Some(colon) = content.find(':') else {
            continue;
        };
        let name = &content[..colon];
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if !valid {
            continue;
        }
        keys.insert(name.to_string());
        if IDENTIFIER_KEYS.contains(&name) {
            let value = content[colon + 1..].trim();
            if !value.is_empty() {
                keys.insert(value.to_string());
            }
        }
    }
    keys
}
