//! Service configuration types.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// CinemaWorld upstream API.
    #[serde(default)]
    pub cinema_world: ProviderApiConfig,

    /// FilmWorld upstream API.
    #[serde(default)]
    pub film_world: ProviderApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a computed result (including a cached not-found) stays
    /// valid, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Connection settings for one upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderApiConfig {
    /// Base URL, e.g. `https://webjetapitest.azurewebsites.net`.
    #[serde(default)]
    pub base_url: String,

    /// Value sent in the `x-access-token` header.
    #[serde(default)]
    pub access_token: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry policy for transient failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ProviderApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_token: String::new(),
            timeout_ms: default_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_ttl_secs() -> u64 {
    30
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    80
}
