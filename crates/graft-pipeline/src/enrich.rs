//! Content enrichment: back-fill full document text into notes that
//! reference archive documents but lack it.

use graft_core::{
    merge_enrichment, render_sections, DocumentSection, Result, ENRICHMENT_MARKER,
};
use graft_corpus::CorpusClient;
use graft_store::{EnrichmentCandidate, NoteStore};
use tracing::warn;

/// Enrich every note carrying provenance ids whose body does not yet hold
/// the enrichment marker (all of them with `force`). Returns the number of
/// notes enriched.
pub async fn run_enrich(
    corpus: &CorpusClient,
    store: &NoteStore,
    dry_run: bool,
    force: bool,
) -> Result<usize> {
    let mut candidates = store.enrichment_candidates().await?;
    if !force {
        candidates.retain(|c| !c.notes.contains(ENRICHMENT_MARKER));
    }

    if candidates.is_empty() {
        println!("All notes with archive ids already have full document content.");
        return Ok(0);
    }

    println!(
        "\nEnriching {} note(s) with document content...\n",
        candidates.len()
    );
    let mut count = 0;
    for candidate in &candidates {
        println!("Node {}: {}", candidate.id, candidate.title);
        if enrich_node(corpus, store, candidate, dry_run).await? {
            count += 1;
        }
    }
    Ok(count)
}

/// Fetch and merge content for one note. A failed or empty fetch for a
/// single document is excluded from the merged text, not fatal; a note
/// where no document yielded text is skipped entirely.
async fn enrich_node(
    corpus: &CorpusClient,
    store: &NoteStore,
    candidate: &EnrichmentCandidate,
    dry_run: bool,
) -> Result<bool> {
    let mut sections = Vec::new();
    for &document_id in &candidate.archive_ids {
        match corpus.fetch_document_content(document_id).await {
            Ok((content, title)) if !content.is_empty() => {
                println!("    Fetched doc {}: {} chars", document_id, content.len());
                sections.push(DocumentSection {
                    document_id,
                    title,
                    content,
                });
            }
            Ok(_) => println!("    doc {document_id}: no content"),
            Err(e) => {
                warn!(document_id, error = %e, "content fetch failed, excluding document");
                println!("    doc {document_id}: fetch failed");
            }
        }
    }

    if sections.is_empty() {
        return Ok(false);
    }

    let new_body = merge_enrichment(&candidate.notes, &render_sections(&sections));
    if dry_run {
        println!(
            "  [dry-run] would enrich node {} ({} chars total)",
            candidate.id,
            new_body.len()
        );
    } else {
        store.write_enrichment(candidate.id, &new_body).await?;
        println!("  Enriched node {} ({} chars)", candidate.id, new_body.len());
    }
    Ok(true)
}
