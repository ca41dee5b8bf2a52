//! Key sanitization and query rewriting rules.
//!
//! The target platform restricts metric and dimension keys to
//! `[a-z0-9_.]` with a hard length limit. Scraped object paths carry
//! `:`/`,`/`=`/space separators, so keys derived from them are
//! normalized here before they ever reach a fragment.

use crate::{Error, Result};

pub use extkit_model::MAX_KEY_LEN;

/// Sanitize a raw path or attribute name into a valid key.
///
/// Normalization: `:` and `,` become `.`, `=` and space become `_`,
/// any other character outside `[a-zA-Z0-9_.]` is dropped, and the
/// result is lower-cased and capped at [`MAX_KEY_LEN`].
pub fn sanitize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            ':' | ',' => key.push('.'),
            '=' | ' ' => key.push('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                key.push(c.to_ascii_lowercase())
            }
            _ => {}
        }
    }
    key.truncate(MAX_KEY_LEN);
    key
}

/// Build a metric key from a scraped path and an attribute name.
///
/// The key is `<sanitized path>.<lower-cased attribute>`. When the
/// combined key exceeds [`MAX_KEY_LEN`], the path prefix is truncated
/// (never the attribute suffix) so that keys derived from the same
/// attribute stay distinguishable by their ending.
///
/// # Errors
///
/// Returns [`Error::TruncationInfeasible`] when the attribute alone,
/// plus its separating `.`, leaves no room for any prefix at all.
pub fn metric_key(path: &str, attribute: &str) -> Result<String> {
    let attribute = sanitize_key(attribute);
    if attribute.len() + 1 >= MAX_KEY_LEN {
        return Err(Error::TruncationInfeasible {
            attribute,
            limit: MAX_KEY_LEN,
        });
    }

    let mut prefix = sanitize_key(path);
    if prefix.is_empty() {
        return Ok(attribute);
    }

    let budget = MAX_KEY_LEN - attribute.len() - 1;
    prefix.truncate(budget);
    // truncation (or the raw path) can leave the prefix ending in a
    // separator, which would double up against the joining dot
    while prefix.ends_with('.') {
        prefix.pop();
    }
    if prefix.is_empty() {
        return Ok(attribute);
    }
    Ok(format!("{prefix}.{attribute}"))
}

/// Rewrite a raw hierarchical path into a valid query selector.
///
/// Bare trailing `key=` segments become `key=*` and interior `=,`
/// become `=*,`, so a path copied out of an object browser queries
/// every instance instead of none.
pub fn wildcard_query(raw: &str) -> String {
    let mut query = raw.replace("=,", "=*,");
    if query.ends_with('=') {
        query.push('*');
    }
    query
}
