//! Gatewatch API - inbound traffic observation and denylist enforcement
//!
//! Every inbound request is intercepted before it reaches a handler:
//! - the originating client address is resolved, honoring a trusted
//!   forwarding header with fallback to the transport peer address;
//! - addresses on the denylist are rejected with a 403 before anything is
//!   logged;
//! - admitted requests are appended to a request ledger with best-effort
//!   geolocation;
//! - an anomaly detector flags addresses for excessive request rates or
//!   sensitive-path access, with a per-reason cooldown.
//!
//! Aggregated views (summary, top addresses, recent requests, suspicion
//! ledger) are exposed for an external dashboard, alongside denylist
//! administration endpoints and Prometheus metrics.
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Traffic records and request/response models
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `middleware/` - The interception pipeline and cross-cutting concerns
//! - `services/` - Core services: resolution, stores, detection, analytics
//! - `utils/` - Utility functions and helpers
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use gatewatch_api::create_base_app;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let app = create_base_app();
//!     // Configure and run the server
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{
    DenylistConfig, DenylistFailurePolicy, DetectionConfig, GeoConfig, MetricsConfig,
    ResolverConfig,
};
pub use handlers::{
    AppState, block_address, create_app, create_base_app, create_openapi_spec, get_metrics,
    health, list_blocked, recent_requests, summary, suspicious_addresses, top_addresses,
    unblock_address, version,
};
pub use middleware::{
    Interception, InterceptionPipeline, MetricsMiddleware, RequestContext, RequestIdMiddleware,
};
pub use models::{
    AddressCount, DenylistEntry, DenylistResponse, HealthResponse, LimitQuery,
    RecentRequestsResponse, RequestRecord, SuspiciousAddress, SuspiciousListResponse,
    TrafficSummary, VersionResponse,
};
pub use services::{
    AddressResolver, AnalyticsAggregator, AnomalyDetector, AppMetrics, Denylist, DenylistError,
    GeoError, GeoLocator, LogError, MemoryDenylist, MemoryRequestLog, MemorySuspicionLedger,
    REASON_RATE_EXCEEDED, RequestLedger, SuspicionLedger, UNKNOWN_ADDRESS,
};
pub use utils::{extract_route_pattern, extract_user_agent};
