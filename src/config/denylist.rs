//! Denylist enforcement configuration.

use std::env;

/// Behavior when the denylist backing store cannot be reached
///
/// Fail-open admits requests (with a warning); fail-closed rejects every
/// request until the store recovers. The choice must be explicit, not silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenylistFailurePolicy {
    FailOpen,
    FailClosed,
}

/// Configuration for denylist enforcement
#[derive(Clone)]
pub struct DenylistConfig {
    pub failure_policy: DenylistFailurePolicy,
}

impl Default for DenylistConfig {
    fn default() -> Self {
        Self {
            failure_policy: DenylistFailurePolicy::FailOpen,
        }
    }
}

impl DenylistConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let failure_policy = match env::var("DENYLIST_FAILURE_POLICY") {
            Ok(v) if v.eq_ignore_ascii_case("fail-closed") => DenylistFailurePolicy::FailClosed,
            _ => DenylistFailurePolicy::FailOpen,
        };

        Self { failure_policy }
    }
}
