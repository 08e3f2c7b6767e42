//! Data models and schemas for the Gatewatch API.
//!
//! This module contains the data structures used throughout the application,
//! including the traffic-observation records and API response models.

pub mod api;
pub mod record;

pub use api::*;
pub use record::*;
