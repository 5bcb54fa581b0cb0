//! Domain classification from archive tags.

use std::collections::{HashMap, HashSet};

/// Tag name prefix marking a domain classification candidate.
pub const DOMAIN_TAG_PREFIX: &str = "domain:";

/// Map a document's tag set to at most one domain label.
///
/// Tag ids are consulted in their given order; the first tag whose name
/// starts with [`DOMAIN_TAG_PREFIX`] and whose suffix is in the valid
/// vocabulary wins. Prefixed tags with an unknown suffix are treated as
/// absent, not as errors. Pure function: identical inputs always yield the
/// identical result.
pub fn infer_domain<'a>(
    tag_ids: &[i64],
    tag_map: &'a HashMap<i64, String>,
    valid_domains: &HashSet<String>,
) -> Option<&'a str> {
    for tid in tag_ids {
        let Some(name) = tag_map.get(tid) else {
            continue;
        };
        if let Some(candidate) = name.strip_prefix(DOMAIN_TAG_PREFIX) {
            if valid_domains.contains(candidate) {
                return Some(candidate);
            }
        }
    }
    None
}
