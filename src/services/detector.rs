//! Anomaly detection over recent request history.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    config::DetectionConfig,
    models::SuspiciousAddress,
    services::{request_log::RequestLedger, suspicious::SuspicionLedger},
};

/// Reason string for the request-rate heuristic
pub const REASON_RATE_EXCEEDED: &str = "rate-exceeded";

/// Decides whether an address should be flagged as suspicious
///
/// Runs inline after the request record has been appended; both heuristics
/// are cheap in-memory checks. A flag never alters the already-admitted
/// response, it only appends to the suspicion ledger.
///
/// Heuristics:
/// - request rate: more than `rate_threshold` requests from the address
///   within the trailing `rate_window_seconds` window;
/// - sensitive path: any access to a configured sensitive path.
///
/// A (address, reason) pair is not re-flagged within `flag_cooldown_seconds`
/// to keep the ledger from flooding under sustained abuse.
pub struct AnomalyDetector {
    config: DetectionConfig,
    request_log: Arc<dyn RequestLedger>,
    ledger: Arc<dyn SuspicionLedger>,
    last_flagged: Mutex<HashMap<(String, String), Instant>>,
}

impl AnomalyDetector {
    pub fn new(
        config: DetectionConfig,
        request_log: Arc<dyn RequestLedger>,
        ledger: Arc<dyn SuspicionLedger>,
    ) -> Self {
        Self {
            config,
            request_log,
            ledger,
            last_flagged: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate one admitted request and record any flags it trips
    ///
    /// Returns the reasons newly recorded for this request. Ledger write
    /// failures are logged and swallowed; detection is best effort.
    pub fn evaluate(&self, address: &str, path: &str, now: DateTime<Utc>) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.rate_exceeded(address, now) {
            reasons.push(REASON_RATE_EXCEEDED.to_string());
        }

        if self.config.sensitive_paths.contains(path) {
            reasons.push(format!("sensitive-path-access:{path}"));
        }

        let mut recorded = Vec::new();
        for reason in reasons {
            if !self.claim_cooldown(address, &reason) {
                continue;
            }

            info!(
                target: "detection",
                address = %address,
                reason = %reason,
                "Address flagged as suspicious"
            );

            match self
                .ledger
                .record(SuspiciousAddress::new(address.to_string(), reason.clone()))
            {
                Ok(()) => recorded.push(reason),
                Err(e) => {
                    warn!(target: "detection", error = %e, "Failed to record suspicion flag");
                }
            }
        }
        recorded
    }

    fn rate_exceeded(&self, address: &str, now: DateTime<Utc>) -> bool {
        let cutoff = now - chrono::Duration::seconds(self.config.rate_window_seconds as i64);
        match self.request_log.count_since(address, cutoff) {
            // Strictly greater: exactly the threshold within the window is
            // still acceptable traffic.
            Ok(count) => count > self.config.rate_threshold,
            Err(e) => {
                warn!(target: "detection", error = %e, "Rate check skipped, ledger unavailable");
                false
            }
        }
    }

    /// Returns true if the (address, reason) pair is outside its cooldown
    /// window, and marks it as flagged now
    fn claim_cooldown(&self, address: &str, reason: &str) -> bool {
        let cooldown = Duration::from_secs(self.config.flag_cooldown_seconds);
        let now = Instant::now();

        let Ok(mut flagged) = self.last_flagged.lock() else {
            return false;
        };
        flagged.retain(|_, at| now.duration_since(*at) < cooldown);

        let key = (address.to_string(), reason.to_string());
        if let Some(at) = flagged.get(&key) {
            if now.duration_since(*at) < cooldown {
                return false;
            }
        }
        flagged.insert(key, now);
        true
    }
}
