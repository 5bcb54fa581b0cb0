//! Archive HTTP client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use graft_core::{Config, Correspondent, Document, Error, Result, Tag};

/// Page size used for the tag and correspondent lookups. Both vocabularies
/// are small, so one large page covers them without following the cursor.
const LOOKUP_PAGE_SIZE: u32 = 200;

/// One page of a paginated archive listing.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Page<T> {
    #[serde(default)]
    results: Vec<T>,
    /// Cursor to the next page; null on the last page.
    #[serde(default)]
    next: Option<String>,
}

/// Single-document fetch response.
#[derive(Debug, Deserialize)]
struct DocumentDetail {
    #[serde(default)]
    content: String,
    #[serde(default)]
    title: String,
}

/// Read-only client for the archive API.
///
/// Every call authenticates with the configured token and is bounded by the
/// configured timeout. Any transport error, timeout, or non-success status
/// surfaces as [`Error::Corpus`]; the client never retries or degrades.
pub struct CorpusClient {
    client: Client,
    base_url: String,
    token: String,
    page_size: u32,
}

impl CorpusClient {
    /// Create a client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.archive_url.trim_end_matches('/').to_string(),
            token: config.archive_token.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch all documents, following the pagination cursor until exhausted.
    ///
    /// The returned order is the archive's native listing order; ingestion
    /// depends on it staying unsorted.
    pub async fn fetch_documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page = 1u32;
        loop {
            let data: Page<Document> = self
                .get_json(
                    "/api/documents/",
                    &[
                        ("page", page.to_string()),
                        ("page_size", self.page_size.to_string()),
                    ],
                )
                .await?;
            let has_more = data.next.is_some();
            documents.extend(data.results);
            if !has_more {
                break;
            }
            page += 1;
        }
        debug!(document_count = documents.len(), "fetched document listing");
        Ok(documents)
    }

    /// Fetch all tags as `{tag_id: tag_name}`.
    pub async fn fetch_tags(&self) -> Result<HashMap<i64, String>> {
        let data: Page<Tag> = self
            .get_json("/api/tags/", &[("page_size", LOOKUP_PAGE_SIZE.to_string())])
            .await?;
        Ok(data.results.into_iter().map(|t| (t.id, t.name)).collect())
    }

    /// Fetch all correspondents as `{correspondent_id: name}`.
    pub async fn fetch_correspondents(&self) -> Result<HashMap<i64, String>> {
        let data: Page<Correspondent> = self
            .get_json(
                "/api/correspondents/",
                &[("page_size", LOOKUP_PAGE_SIZE.to_string())],
            )
            .await?;
        Ok(data.results.into_iter().map(|c| (c.id, c.name)).collect())
    }

    /// Fetch a single document's full extracted text.
    ///
    /// Returns `(content, title)`; content is trimmed of surrounding
    /// whitespace.
    pub async fn fetch_document_content(&self, document_id: i64) -> Result<(String, String)> {
        let detail: DocumentDetail = self
            .get_json(&format!("/api/documents/{document_id}/"), &[])
            .await?;
        Ok((detail.content.trim().to_string(), detail.title))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Token {}", self.token))
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Corpus(format!("request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Corpus(format!(
                "archive returned {status} for {path}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Corpus(format!("failed to parse {path} response: {e}")))
    }
}
