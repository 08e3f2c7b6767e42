//! Client address resolution service.

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;

use crate::config::ResolverConfig;

/// Sentinel returned when no candidate yields a parseable address
pub const UNKNOWN_ADDRESS: &str = "0.0.0.0";

/// Resolves the originating client address for a request
///
/// Prefers the first hop of the configured trusted forwarding header over the
/// transport peer address. Resolution never fails: malformed input degrades
/// to the peer address, and if that is also unusable the sentinel
/// [`UNKNOWN_ADDRESS`] is returned.
#[derive(Clone)]
pub struct AddressResolver {
    config: ResolverConfig,
}

impl AddressResolver {
    /// Create a new resolver with the given configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve the canonical client address from headers and peer address
    ///
    /// `peer_addr` is the transport-level remote address as reported by the
    /// connection, if known.
    pub fn resolve(&self, headers: &HeaderMap, peer_addr: Option<&str>) -> String {
        if let Some(header_name) = &self.config.trusted_forwarding_header {
            if let Some(ip) = headers
                .get(header_name.as_str())
                .and_then(|h| h.to_str().ok())
                .and_then(first_hop)
            {
                return ip;
            }
        }

        peer_addr
            .and_then(parse_peer_addr)
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
    }
}

/// First entry of a comma-separated forwarding chain, if it parses as an IP
fn first_hop(chain: &str) -> Option<String> {
    let candidate = chain.split(',').next()?.trim();
    candidate.parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// Parse a peer address, stripping the port when present
fn parse_peer_addr(addr: &str) -> Option<String> {
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return Some(sock.ip().to_string());
    }
    addr.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}
