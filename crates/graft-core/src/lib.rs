//! # graft-core
//!
//! Core types, configuration, and pure algorithms for graft.
//!
//! This crate holds everything the pipeline crates share but that performs
//! no I/O: the error type, the run configuration, the archive data model,
//! domain classification, provenance-id resolution, and the enrichment
//! content merger.

pub mod config;
pub mod domain;
pub mod error;
pub mod merge;
pub mod models;
pub mod provenance;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{infer_domain, DOMAIN_TAG_PREFIX};
pub use error::{Error, Result};
pub use merge::{
    merge_enrichment, render_sections, DocumentSection, ENRICHMENT_HEADING_PREFIX,
    ENRICHMENT_MARKER, SECTION_SEPARATOR,
};
pub use models::{Correspondent, CreateEdgeRequest, CreateNodeRequest, Document, Tag};
pub use provenance::{primary_id, provenance_ids};
