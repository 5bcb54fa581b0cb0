//! Direct SQLite access to the note store.

use std::collections::HashMap;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, warn};

use graft_core::{provenance, Error, Result};

/// A note carrying provenance ids, as selected for the enrichment pass.
#[derive(Debug, Clone)]
pub struct EnrichmentCandidate {
    pub id: i64,
    pub title: String,
    /// Current body text, empty if the column is null.
    pub notes: String,
    /// All provenance ids, in key-path order.
    pub archive_ids: Vec<i64>,
}

/// Handle to the note store database.
///
/// One shared connection for the run's lifetime; the run is strictly
/// sequential, so the pool holds a single connection.
#[derive(Debug)]
pub struct NoteStore {
    pool: SqlitePool,
}

impl NoteStore {
    /// Open the store at the given path. The database is owned and created
    /// by the note-store application; a missing file is a configuration
    /// error, never something to create here.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "note store database not found at {}",
                path.display()
            )));
        }
        let options = SqliteConnectOptions::new().filename(path);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (test fixtures).
    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the underlying connection. Safe to call exactly once at the
    /// end of a run; dropping the store without closing leaks nothing but
    /// skips the orderly shutdown.
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Build the link index: `{archive document id → note id}` for every
    /// note whose metadata carries a provenance id under the current or
    /// legacy singular key. Rebuilt fresh each run, never persisted.
    pub async fn link_index(&self) -> Result<HashMap<i64, i64>> {
        let rows = sqlx::query("SELECT id, metadata FROM nodes WHERE metadata IS NOT NULL")
            .fetch_all(&self.pool)
            .await?;

        let mut index = HashMap::new();
        for row in rows {
            let node_id: i64 = row.get("id");
            let raw: String = row.get("metadata");
            let Ok(metadata) = serde_json::from_str(&raw) else {
                warn!(node_id, "skipping node with unparseable metadata");
                continue;
            };
            if let Some(document_id) = provenance::primary_id(&metadata) {
                index.insert(document_id, node_id);
            }
        }
        debug!(linked = index.len(), "built link index");
        Ok(index)
    }

    /// Find a person or organization note for a correspondent name.
    ///
    /// Best-effort heuristic, not identity resolution: scans person/org
    /// notes newest-first and returns the first whose case-folded title
    /// contains the case-folded name (titles starting with the name are the
    /// common case). Wrong-entity and missed matches are accepted behavior.
    pub async fn find_person_node(&self, name: &str) -> Result<Option<i64>> {
        let folded = name.to_lowercase();
        let rows = sqlx::query(
            "SELECT DISTINCT n.id, n.title
             FROM nodes n
             JOIN node_dimensions nd ON nd.node_id = n.id
             WHERE nd.dimension IN ('person', 'org')
             ORDER BY n.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let title: String = row.get("title");
            if title.to_lowercase().contains(&folded) {
                return Ok(Some(row.get("id")));
            }
        }
        Ok(None)
    }

    /// Select every note carrying at least one parseable provenance id.
    /// Notes without one are silently excluded.
    pub async fn enrichment_candidates(&self) -> Result<Vec<EnrichmentCandidate>> {
        let rows = sqlx::query(
            "SELECT id, title, notes, metadata FROM nodes WHERE metadata IS NOT NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut candidates = Vec::new();
        for row in rows {
            let raw: String = row.get("metadata");
            let Ok(metadata) = serde_json::from_str(&raw) else {
                continue;
            };
            let archive_ids = provenance::provenance_ids(&metadata);
            if archive_ids.is_empty() {
                continue;
            }
            candidates.push(EnrichmentCandidate {
                id: row.get("id"),
                title: row.get("title"),
                notes: row.get::<Option<String>, _>("notes").unwrap_or_default(),
                archive_ids,
            });
        }
        Ok(candidates)
    }

    /// Persist an enriched body: one statement updating the body and
    /// resetting the chunk status so the store re-chunks the grown text.
    pub async fn write_enrichment(&self, node_id: i64, body: &str) -> Result<()> {
        sqlx::query("UPDATE nodes SET notes = ?1, chunk_status = 'not_chunked' WHERE id = ?2")
            .bind(body)
            .bind(node_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
