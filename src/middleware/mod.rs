//! Custom middleware implementations for the API.
//!
//! This module contains the request interception pipeline plus middleware
//! for request IDs and metrics collection.

pub mod interception;
pub mod metrics;
pub mod request_id;

pub use interception::*;
pub use metrics::*;
pub use request_id::*;
