//! Run configuration.
//!
//! One immutable [`Config`] value is constructed at startup and passed to
//! every component; nothing reads ambient global state after that. All
//! settings have defaults and can be overridden through `GRAFT_*`
//! environment variables.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default archive base URL (the local end of the tunnel).
pub const DEFAULT_ARCHIVE_URL: &str = "http://localhost:18000";

/// Default note-store write API base URL.
pub const DEFAULT_STORE_API_URL: &str = "http://localhost:3000";

/// Default HTTP timeout in seconds, applied to every archive and store call.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default page size for the paginated document listing.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default SSH host carrying the tunnel to the archive.
pub const DEFAULT_TUNNEL_HOST: &str = "archive-host";

/// Default local port of the tunnel (must match the archive URL).
pub const DEFAULT_TUNNEL_LOCAL_PORT: u16 = 18000;

/// Default remote port the archive listens on behind the tunnel.
pub const DEFAULT_TUNNEL_REMOTE_PORT: u16 = 8000;

/// Domain labels recognized behind the `domain:` tag prefix when no
/// `GRAFT_DOMAINS` override is given.
pub const DEFAULT_DOMAINS: &[&str] = &[
    "admin",
    "finance",
    "health",
    "family",
    "hobby",
    "work",
    "research",
    "travel",
    "legal",
];

/// Immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the archive API.
    pub archive_url: String,
    /// Bearer-style token sent on every archive request.
    pub archive_token: String,
    /// Timeout applied to every HTTP call.
    pub http_timeout_secs: u64,
    /// Page size for the paginated document listing.
    pub page_size: u32,
    /// Path to the note store SQLite database.
    pub store_db_path: PathBuf,
    /// Base URL of the note-store write API.
    pub store_api_url: String,
    /// Whether to open the SSH tunnel before talking to the archive.
    pub tunnel_enabled: bool,
    /// SSH destination host for the tunnel.
    pub tunnel_host: String,
    /// Local port the tunnel binds.
    pub tunnel_local_port: u16,
    /// Remote port the tunnel forwards to.
    pub tunnel_remote_port: u16,
    /// Valid domain vocabulary for `domain:`-prefixed tags.
    pub valid_domains: HashSet<String>,
}

impl Config {
    /// Build the configuration from environment overrides and defaults.
    ///
    /// The archive token is resolved from the token file if it exists,
    /// otherwise from `GRAFT_ARCHIVE_TOKEN`; having neither is a fatal
    /// configuration error.
    pub fn load() -> Result<Self> {
        let home = PathBuf::from(
            std::env::var("HOME").map_err(|_| Error::Config("HOME is not set".to_string()))?,
        );

        let token_file = std::env::var("GRAFT_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config/graft/archive_token"));
        let archive_token = resolve_token(
            &token_file,
            std::env::var("GRAFT_ARCHIVE_TOKEN").ok().as_deref(),
        )?;

        let store_db_path = std::env::var("GRAFT_STORE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share/graft/store.sqlite"));

        Ok(Self {
            archive_url: env_or("GRAFT_ARCHIVE_URL", DEFAULT_ARCHIVE_URL),
            archive_token,
            http_timeout_secs: env_parsed("GRAFT_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            page_size: env_parsed("GRAFT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            store_db_path,
            store_api_url: env_or("GRAFT_STORE_API", DEFAULT_STORE_API_URL),
            tunnel_enabled: std::env::var("GRAFT_TUNNEL").map(|v| v != "0").unwrap_or(true),
            tunnel_host: env_or("GRAFT_TUNNEL_HOST", DEFAULT_TUNNEL_HOST),
            tunnel_local_port: env_parsed("GRAFT_TUNNEL_LOCAL_PORT", DEFAULT_TUNNEL_LOCAL_PORT)?,
            tunnel_remote_port: env_parsed("GRAFT_TUNNEL_REMOTE_PORT", DEFAULT_TUNNEL_REMOTE_PORT)?,
            valid_domains: std::env::var("GRAFT_DOMAINS")
                .map(|v| split_domains(&v))
                .unwrap_or_else(|_| default_domains()),
        })
    }
}

/// The built-in domain vocabulary as an owned set.
pub fn default_domains() -> HashSet<String> {
    DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect()
}

/// Parse a comma-separated `GRAFT_DOMAINS` value, ignoring empty entries.
pub fn split_domains(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the archive token: token file wins, inline env value is the
/// fallback.
fn resolve_token(token_file: &std::path::Path, inline: Option<&str>) -> Result<String> {
    if token_file.exists() {
        let token = std::fs::read_to_string(token_file)?;
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    match inline {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(Error::Config(format!(
            "no archive token: create {} or set GRAFT_ARCHIVE_TOKEN",
            token_file.display()
        ))),
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{name} is not a valid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
