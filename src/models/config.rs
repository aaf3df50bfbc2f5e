//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_items_per_page() -> usize {
    10
}

fn default_error_toast_cooldown_secs() -> u64 {
    35
}

fn default_store_ttl_secs() -> i64 {
    3600
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs the identity, session and flash cookies. At least 64 bytes.
    pub secret: String,
    /// Base URL of the ASL Market REST API, e.g. `https://api.asll.ir/api/v1`.
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Window during which repeated network/server errors are flashed once.
    #[serde(default = "default_error_toast_cooldown_secs")]
    pub error_toast_cooldown_secs: u64,
    /// Lifetime of cached list snapshots; `0` keeps them until invalidated.
    #[serde(default = "default_store_ttl_secs")]
    pub store_ttl_secs: i64,
}
