//! Anomaly detection configuration.

use std::{collections::HashSet, env};

/// Configuration for the anomaly detection heuristics
#[derive(Clone)]
pub struct DetectionConfig {
    /// Sliding window for the request-rate check, in seconds
    pub rate_window_seconds: u64,
    /// Requests within the window above which an address is flagged
    pub rate_threshold: usize,
    /// Paths whose access flags the requesting address
    pub sensitive_paths: HashSet<String>,
    /// Minimum time between identical flags for the same address, in seconds
    pub flag_cooldown_seconds: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            rate_window_seconds: 60,
            rate_threshold: 100,
            sensitive_paths: ["/admin", "/login"].iter().map(|s| s.to_string()).collect(),
            flag_cooldown_seconds: 300,
        }
    }
}

impl DetectionConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let rate_window_seconds = env::var("RATE_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let rate_threshold = env::var("RATE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let sensitive_paths = env::var("SENSITIVE_PATHS")
            .map(|v| {
                v.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                ["/admin", "/login"].iter().map(|s| s.to_string()).collect()
            });

        let flag_cooldown_seconds = env::var("FLAG_COOLDOWN_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        Self {
            rate_window_seconds,
            rate_threshold,
            sensitive_paths,
            flag_cooldown_seconds,
        }
    }
}
