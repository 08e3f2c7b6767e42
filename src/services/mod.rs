//! Business logic and service layer modules.
//!
//! This module contains the core traffic-observation services: address
//! resolution, denylist storage, geolocation, the request and suspicion
//! ledgers, anomaly detection, analytics, and metrics collection.

pub mod analytics;
pub mod denylist;
pub mod detector;
pub mod geo;
pub mod metrics;
pub mod request_log;
pub mod resolver;
pub mod suspicious;

pub use analytics::*;
pub use denylist::*;
pub use detector::*;
pub use geo::*;
pub use metrics::*;
pub use request_log::*;
pub use resolver::*;
pub use suspicious::*;
