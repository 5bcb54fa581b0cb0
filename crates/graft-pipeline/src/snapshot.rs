//! Run snapshot: archive metadata plus the store's link index.

use std::collections::HashMap;

use graft_core::{Document, Result};
use graft_corpus::CorpusClient;
use graft_store::NoteStore;

/// Everything both passes need, fetched once at the start of a run.
pub struct CorpusSnapshot {
    /// Documents in the archive's native listing order.
    pub documents: Vec<Document>,
    /// `{tag id → tag name}`.
    pub tags: HashMap<i64, String>,
    /// `{correspondent id → name}`.
    pub correspondents: HashMap<i64, String>,
    /// `{archive document id → note id}` from the store.
    pub linked: HashMap<i64, i64>,
}

impl CorpusSnapshot {
    /// Fetch archive metadata and build the link index, sequentially.
    pub async fn load(corpus: &CorpusClient, store: &NoteStore) -> Result<Self> {
        let tags = corpus.fetch_tags().await?;
        let correspondents = corpus.fetch_correspondents().await?;
        let documents = corpus.fetch_documents().await?;
        let linked = store.link_index().await?;
        Ok(Self {
            documents,
            tags,
            correspondents,
            linked,
        })
    }

    /// Documents with no linked note, in native listing order. Sorting is
    /// for reporting only; ingestion consumes this order as-is.
    pub fn orphans(&self) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| !self.linked.contains_key(&d.id))
            .collect()
    }
}
