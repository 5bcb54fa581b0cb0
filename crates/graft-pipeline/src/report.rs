//! Read-only orphan report.

use std::collections::HashSet;

use graft_core::infer_domain;

use crate::snapshot::CorpusSnapshot;

/// Print archive documents with no linked note, sorted by creation date.
/// The sort is display-only; ingestion order is never affected by it.
pub fn print_orphan_report(snapshot: &CorpusSnapshot, valid_domains: &HashSet<String>) {
    let mut orphans = snapshot.orphans();
    if orphans.is_empty() {
        println!("No orphan documents - all archive documents are linked to notes.");
        return;
    }

    orphans.sort_by_key(|d| d.created.clone());

    println!(
        "\nOrphan documents ({} of {} total):\n",
        orphans.len(),
        snapshot.documents.len()
    );
    println!(
        "{:>4}  {:<12}  {:<20}  {:<15}  Title",
        "ID", "Date", "Correspondent", "Domain"
    );
    println!("{}", "-".repeat(90));
    for doc in orphans {
        let correspondent = doc
            .correspondent
            .and_then(|id| snapshot.correspondents.get(&id))
            .map(String::as_str)
            .unwrap_or("");
        let domain = infer_domain(&doc.tags, &snapshot.tags, valid_domains).unwrap_or("");
        println!(
            "{:>4}  {:<12}  {:<20}  {:<15}  {}",
            doc.id,
            doc.created_date(),
            correspondent,
            domain,
            doc.title
        );
    }
}
