//! Shared data model for the archive and the note-store write API.

use serde::{Deserialize, Serialize};

/// A document record from the archive listing.
///
/// Full extracted text is not part of the listing; it is fetched lazily per
/// document. Fields the listing omits degrade to empty values rather than
/// failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Stable archive-assigned id.
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// ISO 8601 creation timestamp as the archive reports it.
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub correspondent: Option<i64>,
    /// Tag ids in the archive's listing order.
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl Document {
    /// The date part (`YYYY-MM-DD`) of the creation timestamp, or the whole
    /// string if it is shorter than a date.
    pub fn created_date(&self) -> &str {
        self.created.get(..10).unwrap_or(&self.created)
    }
}

/// An archive tag. Names prefixed `domain:` are domain candidates.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// An archive correspondent.
#[derive(Debug, Clone, Deserialize)]
pub struct Correspondent {
    pub id: i64,
    pub name: String,
}

/// Request body for the note-store create-node endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNodeRequest {
    pub title: String,
    pub dimensions: Vec<String>,
    pub notes: String,
    pub metadata: serde_json::Value,
}

/// Request body for the note-store create-edge endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEdgeRequest {
    pub from_node_id: i64,
    pub to_node_id: i64,
    pub relationship: String,
}
