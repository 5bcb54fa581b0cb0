//! Enrichment content merging.
//!
//! A note body may carry at most one enrichment section, delimited by the
//! reserved marker heading. Everything below the heading is fully
//! external-sourced text, so re-enrichment replaces the section wholesale
//! instead of appending to it.

/// Reserved heading that opens the enrichment section of a note body.
pub const ENRICHMENT_MARKER: &str = "## Full Document Content (from Archive)";

/// Prefix used to detect an existing enrichment section. Matching on the
/// prefix keeps older spellings of the heading suffix replaceable.
pub const ENRICHMENT_HEADING_PREFIX: &str = "## Full Document Content";

/// Separator between per-document sections and before the marker.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// One fetched document, ready to be rendered into the enrichment block.
#[derive(Debug, Clone)]
pub struct DocumentSection {
    pub document_id: i64,
    pub title: String,
    pub content: String,
}

/// Render fetched documents into the merged enrichment block: each section
/// is prefixed with its id and title, sections joined by the separator in
/// listed order.
pub fn render_sections(sections: &[DocumentSection]) -> String {
    sections
        .iter()
        .map(|s| {
            format!(
                "[Archive doc {}: {}]\n\n{}",
                s.document_id, s.title, s.content
            )
        })
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Merge a freshly rendered enrichment block into an existing note body.
///
/// - A body that already carries an enrichment heading is truncated to the
///   hand-authored content above it (including the separator the previous
///   enrichment added), then gets a fresh separator, marker, and block.
///   Repeated merges of the same block reach a fixed point.
/// - A non-empty body without the heading gets separator + marker + block
///   appended.
/// - An empty body becomes marker + block directly, with no leading
///   separator.
pub fn merge_enrichment(existing_body: &str, merged_block: &str) -> String {
    let existing = existing_body.trim();
    let preserved = match existing.find(ENRICHMENT_HEADING_PREFIX) {
        Some(pos) => {
            let before = existing[..pos].trim_end();
            before
                .strip_suffix("---")
                .map(str::trim_end)
                .unwrap_or(before)
        }
        None => existing,
    };
    if preserved.is_empty() {
        format!("{}\n\n{}", ENRICHMENT_MARKER, merged_block)
    } else {
        format!(
            "{}{}{}\n\n{}",
            preserved, SECTION_SEPARATOR, ENRICHMENT_MARKER, merged_block
        )
    }
}
