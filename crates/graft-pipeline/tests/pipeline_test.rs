//! End-to-end pipeline tests: mock archive + mock write API + in-memory
//! note store.

use std::path::PathBuf;

use graft_core::{
    config::default_domains, Config, ENRICHMENT_MARKER, SECTION_SEPARATOR,
};
use graft_corpus::CorpusClient;
use graft_pipeline::{run_enrich, run_ingest, CorpusSnapshot};
use graft_store::test_fixtures::{add_dimension, insert_node, memory_store, node_body};
use graft_store::StoreApiClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(corpus_url: &str, api_url: &str) -> Config {
    Config {
        archive_url: corpus_url.to_string(),
        archive_token: "test-token".to_string(),
        http_timeout_secs: 5,
        page_size: 100,
        store_db_path: PathBuf::from("/tmp/unused.sqlite"),
        store_api_url: api_url.to_string(),
        tunnel_enabled: false,
        tunnel_host: "archive-host".to_string(),
        tunnel_local_port: 18000,
        tunnel_remote_port: 8000,
        valid_domains: default_domains(),
    }
}

/// Mount the three listing endpoints every snapshot load hits.
async fn mount_listings(
    server: &MockServer,
    documents: serde_json::Value,
    tags: serde_json::Value,
    correspondents: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "results": documents, "next": null })),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "results": tags, "next": null })),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/correspondents/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "results": correspondents, "next": null })),
        )
        .mount(server)
        .await;
}

async fn mount_content(server: &MockServer, id: i64, title: &str, content: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/documents/{id}/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id, "title": title, "content": content,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ingest_creates_notes_for_orphans_only() {
    let corpus_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let store = memory_store().await;

    // Store already links document 10; 11 and 12 are orphans.
    insert_node(&store, "existing", None, Some(r#"{"archive_id": 10}"#)).await;
    let org = insert_node(&store, "ACME Corporation", None, None).await;
    add_dimension(&store, org, "org").await;

    mount_listings(
        &corpus_server,
        serde_json::json!([
            { "id": 10, "title": "already linked" },
            { "id": 11, "title": "Quarterly invoice", "created": "2026-03-01T08:00:00Z",
              "correspondent": 4, "tags": [1, 2] },
            { "id": 12, "title": "Loose receipt", "created": "2026-03-02T08:00:00Z", "tags": [] },
        ]),
        serde_json::json!([
            { "id": 1, "name": "domain:finance" },
            { "id": 2, "name": "inbox" },
        ]),
        serde_json::json!([ { "id": 4, "name": "ACME Corp" } ]),
    )
    .await;
    mount_content(&corpus_server, 11, "Quarterly invoice", "invoice text").await;
    mount_content(&corpus_server, 12, "Loose receipt", "receipt text").await;

    Mock::given(method("POST"))
        .and(path("/api/nodes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "id": 101 } })),
        )
        .expect(2)
        .mount(&api_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/edges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&api_server)
        .await;

    let config = test_config(&corpus_server.uri(), &api_server.uri());
    let corpus = CorpusClient::new(&config).unwrap();
    let api = StoreApiClient::new(&config).unwrap();

    let snapshot = CorpusSnapshot::load(&corpus, &store).await.unwrap();
    assert_eq!(snapshot.orphans().len(), snapshot.documents.len() - 1);

    let created = run_ingest(&snapshot, &corpus, &api, &store, &config, false)
        .await
        .unwrap();
    assert_eq!(created, 2);

    let requests = api_server.received_requests().await.unwrap();
    let node_bodies: Vec<serde_json::Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/nodes")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(node_bodies.len(), 2);

    // Orphans are processed in listing order: 11 first.
    let invoice = &node_bodies[0];
    assert_eq!(invoice["title"], "Quarterly invoice");
    assert_eq!(
        invoice["dimensions"],
        serde_json::json!(["clipping", "finance", "pending"])
    );
    assert_eq!(invoice["metadata"]["archive_id"], 11);
    assert_eq!(invoice["metadata"]["archive_created"], "2026-03-01");
    assert_eq!(invoice["metadata"]["correspondent"], "ACME Corp");
    assert_eq!(invoice["metadata"]["tags"], serde_json::json!(["inbox"]));
    let notes = invoice["notes"].as_str().unwrap();
    assert!(notes.starts_with(ENRICHMENT_MARKER));
    assert!(notes.contains("[Archive doc 11: Quarterly invoice]\n\ninvoice text"));

    let receipt = &node_bodies[1];
    assert_eq!(
        receipt["dimensions"],
        serde_json::json!(["clipping", "pending"])
    );
    assert!(receipt["metadata"].get("correspondent").is_none());
    assert!(receipt["metadata"].get("tags").is_none());

    let edge_bodies: Vec<serde_json::Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/edges")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(edge_bodies.len(), 1);
    assert_eq!(edge_bodies[0]["from_node_id"], 101);
    assert_eq!(edge_bodies[0]["to_node_id"], org);
    assert_eq!(
        edge_bodies[0]["relationship"],
        "from correspondent ACME Corp"
    );
}

#[tokio::test]
async fn test_second_ingest_run_creates_nothing() {
    let corpus_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let store = memory_store().await;

    insert_node(&store, "a", None, Some(r#"{"archive_id": 10}"#)).await;
    insert_node(&store, "b", None, Some(r#"{"archive_id": 11}"#)).await;

    mount_listings(
        &corpus_server,
        serde_json::json!([ { "id": 10, "title": "a" }, { "id": 11, "title": "b" } ]),
        serde_json::json!([]),
        serde_json::json!([]),
    )
    .await;

    let config = test_config(&corpus_server.uri(), &api_server.uri());
    let corpus = CorpusClient::new(&config).unwrap();
    let api = StoreApiClient::new(&config).unwrap();

    let snapshot = CorpusSnapshot::load(&corpus, &store).await.unwrap();
    assert!(snapshot.orphans().is_empty());

    // No write-API mock is mounted: any create call would fail the run.
    let created = run_ingest(&snapshot, &corpus, &api, &store, &config, false)
        .await
        .unwrap();
    assert_eq!(created, 0);
    assert!(api_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_ingest_counts_without_writing() {
    let corpus_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let store = memory_store().await;

    mount_listings(
        &corpus_server,
        serde_json::json!([ { "id": 21, "title": "x" }, { "id": 22, "title": "y" } ]),
        serde_json::json!([]),
        serde_json::json!([]),
    )
    .await;
    mount_content(&corpus_server, 21, "x", "x text").await;
    mount_content(&corpus_server, 22, "y", "").await;

    let config = test_config(&corpus_server.uri(), &api_server.uri());
    let corpus = CorpusClient::new(&config).unwrap();
    let api = StoreApiClient::new(&config).unwrap();

    let snapshot = CorpusSnapshot::load(&corpus, &store).await.unwrap();
    let created = run_ingest(&snapshot, &corpus, &api, &store, &config, true)
        .await
        .unwrap();

    assert_eq!(created, 2);
    assert!(api_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_enrich_empty_body_has_no_leading_separator() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(&store, "multi", None, Some(r#"{"archive_ids": [20, 21]}"#)).await;
    mount_content(&corpus_server, 20, "Doc A", "alpha body").await;
    mount_content(&corpus_server, 21, "Doc B", "beta body").await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    let enriched = run_enrich(&corpus, &store, false, false).await.unwrap();
    assert_eq!(enriched, 1);

    let (body, chunk_status) = node_body(&store, node).await;
    let expected = format!(
        "{}\n\n[Archive doc 20: Doc A]\n\nalpha body{}[Archive doc 21: Doc B]\n\nbeta body",
        ENRICHMENT_MARKER, SECTION_SEPARATOR
    );
    assert_eq!(body, expected);
    assert_eq!(chunk_status, "not_chunked");
}

#[tokio::test]
async fn test_enrich_is_idempotent_without_force() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(&store, "note", None, Some(r#"{"archive_id": 20}"#)).await;
    mount_content(&corpus_server, 20, "Doc A", "alpha body").await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    assert_eq!(run_enrich(&corpus, &store, false, false).await.unwrap(), 1);
    let (first_body, _) = node_body(&store, node).await;
    assert!(first_body.contains(ENRICHMENT_MARKER));

    // Second pass skips the already-enriched note entirely.
    assert_eq!(run_enrich(&corpus, &store, false, false).await.unwrap(), 0);
    let (second_body, _) = node_body(&store, node).await;
    assert_eq!(first_body, second_body);
}

#[tokio::test]
async fn test_forced_reenrich_replaces_instead_of_duplicating() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(
        &store,
        "note",
        Some("Hand-written intro."),
        Some(r#"{"archive_id": 20}"#),
    )
    .await;
    mount_content(&corpus_server, 20, "Doc A", "alpha body").await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    assert_eq!(run_enrich(&corpus, &store, false, false).await.unwrap(), 1);
    assert_eq!(run_enrich(&corpus, &store, false, true).await.unwrap(), 1);
    let (after_first_force, _) = node_body(&store, node).await;
    assert_eq!(run_enrich(&corpus, &store, false, true).await.unwrap(), 1);
    let (after_second_force, _) = node_body(&store, node).await;

    // Section length is independent of the number of force re-runs.
    assert_eq!(after_first_force, after_second_force);
    assert!(after_first_force.starts_with("Hand-written intro."));
    assert_eq!(after_first_force.matches(ENRICHMENT_MARKER).count(), 1);
}

#[tokio::test]
async fn test_enrich_excludes_failed_fetches_without_aborting() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(&store, "note", None, Some(r#"{"archive_ids": [20, 99]}"#)).await;
    mount_content(&corpus_server, 20, "Doc A", "alpha body").await;
    Mock::given(method("GET"))
        .and(path("/api/documents/99/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&corpus_server)
        .await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    assert_eq!(run_enrich(&corpus, &store, false, false).await.unwrap(), 1);
    let (body, _) = node_body(&store, node).await;
    assert!(body.contains("[Archive doc 20: Doc A]"));
    assert!(!body.contains("doc 99"));
}

#[tokio::test]
async fn test_enrich_skips_note_when_no_content_returned() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(&store, "note", None, Some(r#"{"archive_id": 30}"#)).await;
    mount_content(&corpus_server, 30, "Doc C", "").await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    assert_eq!(run_enrich(&corpus, &store, false, false).await.unwrap(), 0);
    let (body, _) = node_body(&store, node).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_dry_run_enrich_does_not_persist() {
    let corpus_server = MockServer::start().await;
    let store = memory_store().await;

    let node = insert_node(&store, "note", None, Some(r#"{"archive_id": 20}"#)).await;
    mount_content(&corpus_server, 20, "Doc A", "alpha body").await;

    let config = test_config(&corpus_server.uri(), "http://localhost:3000");
    let corpus = CorpusClient::new(&config).unwrap();

    assert_eq!(run_enrich(&corpus, &store, true, false).await.unwrap(), 1);
    let (body, _) = node_body(&store, node).await;
    assert!(body.is_empty());
}
