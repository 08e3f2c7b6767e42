//! Core traffic-observation records.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// One admitted request, as persisted in the request ledger.
///
/// Created exactly once per admitted request by the interception middleware
/// and immutable afterwards. Geolocation fields are best-effort and absent
/// when the lookup failed or was skipped.
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RequestRecord {
    pub address: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl RequestRecord {
    /// Create a record with no geolocation attached
    pub fn new(address: String, path: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            address,
            path,
            timestamp,
            country: None,
            city: None,
        }
    }

    /// Attach geolocation information
    pub fn with_geo(mut self, country: Option<String>, city: Option<String>) -> Self {
        self.country = country;
        self.city = city;
        self
    }
}

/// An address flagged by the anomaly detector.
///
/// Multiple records per address are allowed; each one documents a single
/// heuristic trip with its reason and time.
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct SuspiciousAddress {
    pub address: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl SuspiciousAddress {
    pub fn new(address: String, reason: String) -> Self {
        Self {
            address,
            reason,
            timestamp: Utc::now(),
        }
    }
}
