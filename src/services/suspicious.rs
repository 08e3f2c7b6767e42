//! Append-only ledger of anomaly-detection flags.

use std::sync::Mutex;

use crate::models::SuspiciousAddress;
use crate::services::request_log::LogError;

/// Durable record of every heuristic trip
///
/// Multiple records per address are allowed; each entry is a point-in-time
/// flag with its reason. Records are never updated or deleted by the core.
pub trait SuspicionLedger: Send + Sync {
    /// Persist one flag record
    fn record(&self, entry: SuspiciousAddress) -> Result<(), LogError>;

    /// Snapshot of all flag records, newest first
    fn entries(&self) -> Result<Vec<SuspiciousAddress>, LogError>;

    /// Number of flag records
    fn len(&self) -> Result<usize, LogError>;
}

/// In-memory suspicion ledger
#[derive(Default)]
pub struct MemorySuspicionLedger {
    entries: Mutex<Vec<SuspiciousAddress>>,
}

impl MemorySuspicionLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SuspicionLedger for MemorySuspicionLedger {
    fn record(&self, entry: SuspiciousAddress) -> Result<(), LogError> {
        let mut entries = self.entries.lock().map_err(|_| LogError::Poisoned)?;
        entries.push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<SuspiciousAddress>, LogError> {
        let entries = self.entries.lock().map_err(|_| LogError::Poisoned)?;
        Ok(entries.iter().rev().cloned().collect())
    }

    fn len(&self) -> Result<usize, LogError> {
        let entries = self.entries.lock().map_err(|_| LogError::Poisoned)?;
        Ok(entries.len())
    }
}
