//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod denylist;
pub mod detection;
pub mod geo;
pub mod metrics;
pub mod resolver;

pub use denylist::*;
pub use detection::*;
pub use geo::*;
pub use metrics::*;
pub use resolver::*;
