//! Client address resolution configuration.

use std::env;

/// Configuration for resolving the originating client address
///
/// Only a single forwarding header is trusted, and only its first (left-most)
/// hop. The header is expected to be stripped or overwritten by the edge
/// proxy; deployments without a trusted proxy should set
/// `TRUSTED_FORWARDING_HEADER=none` so only the transport peer address is
/// used.
#[derive(Clone)]
pub struct ResolverConfig {
    pub trusted_forwarding_header: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            trusted_forwarding_header: Some("X-Forwarded-For".to_string()),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let trusted_forwarding_header = match env::var("TRUSTED_FORWARDING_HEADER") {
            Ok(v) if v.eq_ignore_ascii_case("none") => None,
            Ok(v) if !v.trim().is_empty() => Some(v),
            _ => Some("X-Forwarded-For".to_string()),
        };

        Self {
            trusted_forwarding_header,
        }
    }
}
