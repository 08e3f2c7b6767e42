//! Append-only ledger of admitted requests.

use std::{
    collections::HashMap,
    sync::Mutex,
};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::RequestRecord;

/// Errors surfaced by a ledger backing store
#[derive(Debug, Error)]
pub enum LogError {
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// Durable, append-only store of one record per admitted request
///
/// `append` is atomic per record; appends from concurrent requests may
/// interleave in any order. A failed append must never fail the enclosing
/// request; the caller degrades and surfaces the failure operationally.
pub trait RequestLedger: Send + Sync {
    /// Persist one record
    fn append(&self, record: RequestRecord) -> Result<(), LogError>;

    /// The `n` most recent records, newest first
    fn recent(&self, n: usize) -> Result<Vec<RequestRecord>, LogError>;

    /// Occurrence count per address over the whole ledger
    fn count_by_address(&self) -> Result<HashMap<String, usize>, LogError>;

    /// Number of records for `address` with timestamp at or after `cutoff`
    fn count_since(&self, address: &str, cutoff: DateTime<Utc>) -> Result<usize, LogError>;

    /// Total number of records
    fn total(&self) -> Result<usize, LogError>;
}

/// In-memory request ledger
#[derive(Default)]
pub struct MemoryRequestLog {
    records: Mutex<Vec<RequestRecord>>,
}

impl MemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestLedger for MemoryRequestLog {
    fn append(&self, record: RequestRecord) -> Result<(), LogError> {
        let mut records = self.records.lock().map_err(|_| LogError::Poisoned)?;
        records.push(record);
        Ok(())
    }

    fn recent(&self, n: usize) -> Result<Vec<RequestRecord>, LogError> {
        let records = self.records.lock().map_err(|_| LogError::Poisoned)?;
        Ok(records.iter().rev().take(n).cloned().collect())
    }

    fn count_by_address(&self) -> Result<HashMap<String, usize>, LogError> {
        let records = self.records.lock().map_err(|_| LogError::Poisoned)?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records.iter() {
            *counts.entry(record.address.clone()).or_default() += 1;
        }
        Ok(counts)
    }

    fn count_since(&self, address: &str, cutoff: DateTime<Utc>) -> Result<usize, LogError> {
        let records = self.records.lock().map_err(|_| LogError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.address == address && r.timestamp >= cutoff)
            .count())
    }

    fn total(&self) -> Result<usize, LogError> {
        let records = self.records.lock().map_err(|_| LogError::Poisoned)?;
        Ok(records.len())
    }
}
