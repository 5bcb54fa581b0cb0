//! # graft-store
//!
//! Access to the personal note store.
//!
//! Reads (link index, person matching, enrichment candidates) and the
//! enrichment body write go directly to the store's SQLite database; note
//! and edge creation go through the store's write API, which owns that
//! business logic.

pub mod api;
pub mod notes;

// Test fixtures for integration tests.
// Always compiled so integration tests (in tests/ and downstream crates)
// can build an in-memory store with the fixture schema.
pub mod test_fixtures;

pub use api::StoreApiClient;
pub use notes::{EnrichmentCandidate, NoteStore};
