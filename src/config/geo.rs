//! Geolocation lookup configuration.

use std::env;

/// Configuration for the geolocation lookup service
#[derive(Clone)]
pub struct GeoConfig {
    pub enabled: bool,
    /// Lookup endpoint base; the address is appended as a path segment
    pub lookup_url: String,
    /// Hard bound on a single lookup, in milliseconds
    pub lookup_timeout_ms: u64,
    /// Cache lifetime per address, in seconds
    pub cache_ttl_seconds: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookup_url: "http://ip-api.com/json".to_string(),
            lookup_timeout_ms: 1500,
            cache_ttl_seconds: 86_400, // geolocation is stable on the order of days
        }
    }
}

impl GeoConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let enabled = env::var("GEO_LOOKUP_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        let lookup_url =
            env::var("GEO_LOOKUP_URL").unwrap_or_else(|_| "http://ip-api.com/json".to_string());

        let lookup_timeout_ms = env::var("GEO_LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1500);

        let cache_ttl_seconds = env::var("GEO_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        Self {
            enabled,
            lookup_url,
            lookup_timeout_ms,
            cache_ttl_seconds,
        }
    }
}
