//! Read-only aggregation over the traffic stores for the dashboard.

use std::sync::Arc;

use tracing::warn;

use crate::{
    models::{AddressCount, RequestRecord, SuspiciousAddress, TrafficSummary},
    services::{
        denylist::Denylist, request_log::RequestLedger, suspicious::SuspicionLedger,
    },
};

/// Computes summary statistics over the three traffic stores
///
/// Constructed explicitly with references to its data sources and passed to
/// the web layer; there is no ambient global. All views are read-only and
/// eventually consistent with respect to concurrent writers — a store error
/// degrades to an empty or zeroed view rather than failing the dashboard.
#[derive(Clone)]
pub struct AnalyticsAggregator {
    request_log: Arc<dyn RequestLedger>,
    denylist: Arc<dyn Denylist>,
    suspicious: Arc<dyn SuspicionLedger>,
}

impl AnalyticsAggregator {
    pub fn new(
        request_log: Arc<dyn RequestLedger>,
        denylist: Arc<dyn Denylist>,
        suspicious: Arc<dyn SuspicionLedger>,
    ) -> Self {
        Self {
            request_log,
            denylist,
            suspicious,
        }
    }

    /// Top `n` addresses by total request count
    ///
    /// Ordered by count descending; ties broken by address ascending so
    /// repeated calls with no intervening writes return identical results.
    pub fn top_addresses(&self, n: usize) -> Vec<AddressCount> {
        let counts = match self.request_log.count_by_address() {
            Ok(counts) => counts,
            Err(e) => {
                warn!(target: "analytics", error = %e, "Top-addresses view unavailable");
                return Vec::new();
            }
        };

        let mut entries: Vec<AddressCount> = counts
            .into_iter()
            .map(|(address, count)| AddressCount { address, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.address.cmp(&b.address)));
        entries.truncate(n);
        entries
    }

    /// Counts of total, blocked, suspicious, and inferred-normal traffic
    pub fn summary(&self) -> TrafficSummary {
        let total = self.request_log.total().unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Request total unavailable");
            0
        });
        let blocked = self.denylist.len().unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Denylist size unavailable");
            0
        });
        let suspicious = self.suspicious.len().unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Suspicion ledger size unavailable");
            0
        });

        TrafficSummary {
            total,
            blocked,
            suspicious,
            normal: total.saturating_sub(suspicious).saturating_sub(blocked),
        }
    }

    /// The `n` most recent request records, newest first
    pub fn recent(&self, n: usize) -> Vec<RequestRecord> {
        self.request_log.recent(n).unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Recent-requests view unavailable");
            Vec::new()
        })
    }

    /// All suspicion flags, newest first
    pub fn suspicious_entries(&self) -> Vec<SuspiciousAddress> {
        self.suspicious.entries().unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Suspicion listing unavailable");
            Vec::new()
        })
    }

    /// All blocked addresses, sorted
    pub fn blocked_entries(&self) -> Vec<String> {
        self.denylist.entries().unwrap_or_else(|e| {
            warn!(target: "analytics", error = %e, "Denylist listing unavailable");
            Vec::new()
        })
    }
}
