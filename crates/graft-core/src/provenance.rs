//! Provenance-id resolution from note metadata.
//!
//! Note metadata is a loosely-typed JSON mapping in which the archive
//! document id(s) may live under a current flat key or a legacy nested key,
//! singular or plural. The store's other consumers treat the mapping as
//! opaque; this module is the one place that knows the key paths.

use serde_json::Value;

/// Singular provenance key paths, current layout first.
const SINGULAR_PATHS: &[&[&str]] = &[&["archive_id"], &["import", "archive_id"]];

/// Plural provenance key paths, current layout first.
const PLURAL_PATHS: &[&[&str]] = &[&["archive_ids"], &["import", "archive_ids"]];

/// The single provenance id used for link-index construction.
///
/// Only the singular key paths are consulted; the current key wins over the
/// legacy nested key. Unparseable values count as absent.
pub fn primary_id(metadata: &Value) -> Option<i64> {
    SINGULAR_PATHS
        .iter()
        .find_map(|path| lookup(metadata, path).and_then(as_id))
}

/// Every provenance id carried by a note, in key-path order: singular values
/// first (current before legacy), then plural arrays (current before
/// legacy). Array entries may be numbers or numeric strings; anything else
/// is skipped.
pub fn provenance_ids(metadata: &Value) -> Vec<i64> {
    let mut ids = Vec::new();
    for path in SINGULAR_PATHS {
        if let Some(id) = lookup(metadata, path).and_then(as_id) {
            ids.push(id);
        }
    }
    for path in PLURAL_PATHS {
        if let Some(Value::Array(entries)) = lookup(metadata, path) {
            ids.extend(entries.iter().filter_map(as_id));
        }
    }
    ids
}

fn lookup<'v>(metadata: &'v Value, path: &[&str]) -> Option<&'v Value> {
    let mut current = metadata;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
