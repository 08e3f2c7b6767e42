//! Best-effort geolocation of client addresses.

use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GeoConfig;

/// Errors surfaced by a geolocation lookup
///
/// Callers degrade to absent country/city on any of these; a lookup failure
/// must never fail the enclosing request.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("geo lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geo client construction failed: {0}")]
    Client(String),
}

#[derive(Deserialize)]
struct GeoApiResponse {
    status: Option<String>,
    country: Option<String>,
    city: Option<String>,
}

struct CachedGeo {
    country: Option<String>,
    city: Option<String>,
    fetched_at: Instant,
}

/// Maps an address to (country, city) through an external lookup service
///
/// Lookups are bounded by the configured timeout and cached per address with
/// a TTL. Private, loopback, and unparseable addresses short-circuit to
/// absent values without a network call.
pub struct GeoLocator {
    config: GeoConfig,
    client: reqwest::Client,
    cache: Mutex<HashMap<String, CachedGeo>>,
}

impl GeoLocator {
    /// Create a new locator with a timeout-bounded HTTP client
    pub fn new(config: GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.lookup_timeout_ms))
            .build()
            .map_err(|e| GeoError::Client(e.to_string()))?;

        Ok(Self {
            config,
            client,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve (country, city) for an address, best effort
    ///
    /// Returns `Ok((None, None))` for addresses that cannot be located at
    /// all (private ranges, the sentinel address, lookup disabled). A
    /// transport-level failure is returned as an error so the caller can
    /// account for it, but the caller must still admit the request.
    pub async fn locate(&self, address: &str) -> Result<(Option<String>, Option<String>), GeoError> {
        if !self.config.enabled || !is_routable(address) {
            return Ok((None, None));
        }

        if let Some(hit) = self.cached(address) {
            return Ok(hit);
        }

        let url = format!("{}/{}", self.config.lookup_url.trim_end_matches('/'), address);
        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .json::<GeoApiResponse>()
            .await?;

        let (country, city) = match response.status.as_deref() {
            Some("fail") => {
                debug!(target: "geo", address = %address, "lookup service could not locate address");
                (None, None)
            }
            _ => (response.country, response.city),
        };

        self.store(address, country.clone(), city.clone());
        Ok((country, city))
    }

    fn cached(&self, address: &str) -> Option<(Option<String>, Option<String>)> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(address)?;
        if entry.fetched_at.elapsed() < Duration::from_secs(self.config.cache_ttl_seconds) {
            Some((entry.country.clone(), entry.city.clone()))
        } else {
            None
        }
    }

    fn store(&self, address: &str, country: Option<String>, city: Option<String>) {
        if let Ok(mut cache) = self.cache.lock() {
            // Expired entries are replaced lazily on the next lookup
            cache.retain(|_, e| {
                e.fetched_at.elapsed() < Duration::from_secs(self.config.cache_ttl_seconds)
            });
            cache.insert(
                address.to_string(),
                CachedGeo {
                    country,
                    city,
                    fetched_at: Instant::now(),
                },
            );
        }
    }
}

/// Whether an address is worth sending to the lookup service
fn is_routable(address: &str) -> bool {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            !v4.is_private()
                && !v4.is_loopback()
                && !v4.is_link_local()
                && !v4.is_unspecified()
        }
        Ok(IpAddr::V6(v6)) => !v6.is_loopback() && !v6.is_unspecified(),
        Err(_) => false,
    }
}
