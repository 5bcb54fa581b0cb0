//! Note-store write API client.
//!
//! Note and edge creation go through the store's HTTP API so its business
//! logic (dimension bookkeeping, validation) stays in one place; only the
//! enrichment body write bypasses it.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use graft_core::{Config, CreateEdgeRequest, CreateNodeRequest, Error, Result};

/// Timeout for the availability probe. Short on purpose: the probe runs
/// before any work starts and an unreachable API aborts the run anyway.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the note-store write API.
pub struct StoreApiClient {
    client: Client,
    base_url: String,
}

impl StoreApiClient {
    /// Create a client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.store_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Probe whether the write API is reachable. Any response below 500
    /// counts: the probe checks reachability, not endpoint shape.
    pub async fn is_available(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/api/dimensions", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match result {
            Ok(response) => response.status().as_u16() < 500,
            Err(_) => false,
        }
    }

    /// Create a note; returns the assigned note id.
    pub async fn create_node(&self, request: &CreateNodeRequest) -> Result<i64> {
        let body: Value = self
            .post_json("/api/nodes", request)
            .await?
            .json()
            .await
            .map_err(|e| Error::StoreApi(format!("failed to parse create-node response: {e}")))?;

        // The API wraps the record in a `data` envelope; older versions
        // returned it flat.
        let record = match body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => &body,
        };
        let node_id = record
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::StoreApi("create-node response missing id".to_string()))?;
        debug!(node_id, "created node");
        Ok(node_id)
    }

    /// Create a directed edge. No meaningful return beyond success.
    pub async fn create_edge(&self, request: &CreateEdgeRequest) -> Result<()> {
        self.post_json("/api/edges", request).await?;
        Ok(())
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::StoreApi(format!("request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::StoreApi(format!(
                "store API returned {status} for {path}: {text}"
            )));
        }
        Ok(response)
    }
}
