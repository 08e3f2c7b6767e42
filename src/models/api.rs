//! API response models for standard and dashboard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

use crate::models::{RequestRecord, SuspiciousAddress};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// One entry of the top-addresses listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct AddressCount {
    pub address: String,
    pub count: usize,
}

/// Traffic summary for the dashboard
///
/// `normal` is derived as `max(0, total - suspicious - blocked)`, clamped at
/// zero even when the inputs would make it negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct TrafficSummary {
    pub total: usize,
    pub blocked: usize,
    pub suspicious: usize,
    pub normal: usize,
}

/// Query parameters for listing endpoints that accept a result limit
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Response model for the recent-requests listing
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RecentRequestsResponse {
    pub requests: Vec<RequestRecord>,
}

/// Response model for the suspicious-address listing
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct SuspiciousListResponse {
    pub entries: Vec<SuspiciousAddress>,
}

/// Response model for the denylist listing
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DenylistResponse {
    pub addresses: Vec<String>,
}

/// Request body for denylist administration
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DenylistEntry {
    pub address: String,
}
