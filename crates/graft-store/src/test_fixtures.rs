//! In-memory store fixtures for integration tests.
//!
//! The store schema is owned by the note-store application; this fixture
//! recreates just the tables the pipeline touches.

use sqlx::sqlite::SqlitePoolOptions;

use crate::notes::NoteStore;

const FIXTURE_SCHEMA: &str = "
CREATE TABLE nodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    notes TEXT,
    metadata TEXT,
    chunk_status TEXT DEFAULT 'not_chunked',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);
CREATE TABLE node_dimensions (
    node_id INTEGER NOT NULL,
    dimension TEXT NOT NULL,
    UNIQUE (node_id, dimension)
);
CREATE TABLE edges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_node_id INTEGER NOT NULL,
    to_node_id INTEGER NOT NULL,
    context TEXT,
    source TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);
";

/// Open an in-memory store with the fixture schema applied.
pub async fn memory_store() -> NoteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory store");
    sqlx::raw_sql(FIXTURE_SCHEMA)
        .execute(&pool)
        .await
        .expect("failed to apply fixture schema");
    NoteStore::from_pool(pool)
}

/// Insert a node row; `metadata` is raw JSON text (or None).
pub async fn insert_node(
    store: &NoteStore,
    title: &str,
    notes: Option<&str>,
    metadata: Option<&str>,
) -> i64 {
    let result = sqlx::query("INSERT INTO nodes (title, notes, metadata) VALUES (?1, ?2, ?3)")
        .bind(title)
        .bind(notes)
        .bind(metadata)
        .execute(store.pool())
        .await
        .expect("failed to insert fixture node");
    result.last_insert_rowid()
}

/// Attach a dimension label to a node.
pub async fn add_dimension(store: &NoteStore, node_id: i64, dimension: &str) {
    sqlx::query("INSERT OR IGNORE INTO node_dimensions (node_id, dimension) VALUES (?1, ?2)")
        .bind(node_id)
        .bind(dimension)
        .execute(store.pool())
        .await
        .expect("failed to insert fixture dimension");
}

/// Overwrite a node's chunk status.
pub async fn set_chunk_status(store: &NoteStore, node_id: i64, status: &str) {
    sqlx::query("UPDATE nodes SET chunk_status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(node_id)
        .execute(store.pool())
        .await
        .expect("failed to update fixture chunk status");
}

/// Read back a node's body and chunk status.
pub async fn node_body(store: &NoteStore, node_id: i64) -> (String, String) {
    use sqlx::Row;
    let row = sqlx::query("SELECT notes, chunk_status FROM nodes WHERE id = ?1")
        .bind(node_id)
        .fetch_one(store.pool())
        .await
        .expect("fixture node not found");
    (
        row.get::<Option<String>, _>("notes").unwrap_or_default(),
        row.get::<Option<String>, _>("chunk_status")
            .unwrap_or_default(),
    )
}
