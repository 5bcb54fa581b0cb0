//! # graft-corpus
//!
//! Read access to the remote document archive: the paginated HTTP client
//! and the SSH tunnel guard the archive is reached through.

pub mod client;
pub mod tunnel;

pub use client::CorpusClient;
pub use tunnel::Tunnel;
