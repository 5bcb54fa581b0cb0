//! Node ingestion: one note (plus an optional correspondent edge) per
//! orphan document.

use graft_core::{
    infer_domain, merge_enrichment, render_sections, Config, CreateEdgeRequest, CreateNodeRequest,
    DocumentSection, Result, DOMAIN_TAG_PREFIX,
};
use graft_corpus::CorpusClient;
use graft_store::{NoteStore, StoreApiClient};
use tracing::info;

use crate::snapshot::CorpusSnapshot;

/// Create notes for all unlinked documents, in listing order.
///
/// Returns the number of notes created (or, in dry-run, that would have
/// been created). Any write failure aborts the run; the caller owns
/// resource cleanup.
pub async fn run_ingest(
    snapshot: &CorpusSnapshot,
    corpus: &CorpusClient,
    api: &StoreApiClient,
    store: &NoteStore,
    config: &Config,
    dry_run: bool,
) -> Result<usize> {
    let orphans = snapshot.orphans();
    if orphans.is_empty() {
        println!("All archive documents are already linked to notes.");
        return Ok(0);
    }

    println!("\nIngesting {} unlinked document(s)...\n", orphans.len());
    let mut created = 0;

    for doc in orphans {
        let correspondent = doc
            .correspondent
            .and_then(|id| snapshot.correspondents.get(&id));
        let domain = infer_domain(&doc.tags, &snapshot.tags, &config.valid_domains);
        let tag_names: Vec<String> = doc
            .tags
            .iter()
            .filter_map(|t| snapshot.tags.get(t))
            .filter(|name| !name.starts_with(DOMAIN_TAG_PREFIX))
            .cloned()
            .collect();

        println!("\nDoc {}: {:?}", doc.id, doc.title);
        println!(
            "  Date: {}  Correspondent: {:?}  Domain: {:?}",
            doc.created_date(),
            correspondent.map(String::as_str).unwrap_or(""),
            domain.unwrap_or("")
        );

        // Fetch full text upfront so the note is created pre-enriched and
        // the enrich pass has nothing left to do for it.
        let (content, _) = corpus.fetch_document_content(doc.id).await?;
        let notes = if content.is_empty() {
            String::new()
        } else {
            let section = DocumentSection {
                document_id: doc.id,
                title: doc.title.clone(),
                content,
            };
            merge_enrichment("", &render_sections(&[section]))
        };

        let mut metadata = serde_json::Map::new();
        metadata.insert("archive_id".to_string(), doc.id.into());
        metadata.insert("archive_created".to_string(), doc.created_date().into());
        if let Some(name) = correspondent {
            metadata.insert("correspondent".to_string(), name.as_str().into());
        }
        if !tag_names.is_empty() {
            metadata.insert("tags".to_string(), tag_names.clone().into());
        }

        let mut dimensions = vec!["clipping".to_string()];
        if let Some(domain) = domain {
            dimensions.push(domain.to_string());
        }
        dimensions.push("pending".to_string());

        if dry_run {
            println!(
                "  [dry-run] would create node: {:?} dims={:?}",
                doc.title, dimensions
            );
            created += 1;
            continue;
        }

        let request = CreateNodeRequest {
            title: doc.title.clone(),
            dimensions,
            notes,
            metadata: metadata.into(),
        };
        let node_id = api.create_node(&request).await?;
        println!("  Created node ID {}: {:?}", node_id, doc.title);

        if let Some(name) = correspondent {
            match store.find_person_node(name).await? {
                Some(person_id) => {
                    let relationship = format!("from correspondent {name}");
                    api.create_edge(&CreateEdgeRequest {
                        from_node_id: node_id,
                        to_node_id: person_id,
                        relationship: relationship.clone(),
                    })
                    .await?;
                    println!("  Edge {} -> {} ({:?})", node_id, person_id, relationship);
                }
                None => {
                    info!(correspondent = %name, "no person/org note matched");
                    println!(
                        "  No person/org note found for correspondent {:?} - skipping edge",
                        name
                    );
                }
            }
        }
        created += 1;
    }

    Ok(created)
}
