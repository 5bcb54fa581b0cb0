//! # graft-pipeline
//!
//! The reconciliation and enrichment passes over the archive and the note
//! store: orphan computation, node ingestion, and content enrichment. The
//! `graft` binary in this crate drives them.

pub mod enrich;
pub mod ingest;
pub mod report;
pub mod snapshot;

pub use enrich::run_enrich;
pub use ingest::run_ingest;
pub use report::print_orphan_report;
pub use snapshot::CorpusSnapshot;
