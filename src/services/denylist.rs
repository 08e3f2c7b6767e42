//! Denylist storage for blocked network addresses.

use std::{
    collections::HashSet,
    sync::RwLock,
};

use thiserror::Error;

/// Errors surfaced by a denylist backing store
#[derive(Debug, Error)]
pub enum DenylistError {
    #[error("denylist store unavailable: {0}")]
    Unavailable(String),
    #[error("denylist lock poisoned")]
    Poisoned,
}

/// Set of addresses that are rejected before any other processing
///
/// Membership is boolean: adding an address twice leaves the set unchanged.
/// `contains` runs on the hot request path and must stay cheap; a
/// remote-backed implementation may serve it from a local cache with a
/// bounded staleness window of a few seconds, trading strict consistency for
/// latency. Within a single store, an `add` is visible to every subsequent
/// `contains`.
pub trait Denylist: Send + Sync {
    /// Whether the address is currently blocked
    fn contains(&self, address: &str) -> Result<bool, DenylistError>;

    /// Block an address; returns `false` if it was already present
    fn add(&self, address: String) -> Result<bool, DenylistError>;

    /// Unblock an address; returns `false` if it was not present
    fn remove(&self, address: &str) -> Result<bool, DenylistError>;

    /// Snapshot of all blocked addresses, sorted for stable output
    fn entries(&self) -> Result<Vec<String>, DenylistError>;

    /// Number of blocked addresses
    fn len(&self) -> Result<usize, DenylistError>;
}

/// In-memory denylist over a read-write lock
///
/// Reads dominate on the request path; writes come from infrequent
/// administrative actions.
#[derive(Default)]
pub struct MemoryDenylist {
    addresses: RwLock<HashSet<String>>,
}

impl MemoryDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the denylist with an initial set of addresses
    pub fn with_addresses<I: IntoIterator<Item = String>>(addresses: I) -> Self {
        Self {
            addresses: RwLock::new(addresses.into_iter().collect()),
        }
    }
}

impl Denylist for MemoryDenylist {
    fn contains(&self, address: &str) -> Result<bool, DenylistError> {
        let set = self.addresses.read().map_err(|_| DenylistError::Poisoned)?;
        Ok(set.contains(address))
    }

    fn add(&self, address: String) -> Result<bool, DenylistError> {
        let mut set = self.addresses.write().map_err(|_| DenylistError::Poisoned)?;
        Ok(set.insert(address))
    }

    fn remove(&self, address: &str) -> Result<bool, DenylistError> {
        let mut set = self.addresses.write().map_err(|_| DenylistError::Poisoned)?;
        Ok(set.remove(address))
    }

    fn entries(&self) -> Result<Vec<String>, DenylistError> {
        let set = self.addresses.read().map_err(|_| DenylistError::Poisoned)?;
        let mut entries: Vec<String> = set.iter().cloned().collect();
        entries.sort();
        Ok(entries)
    }

    fn len(&self) -> Result<usize, DenylistError> {
        let set = self.addresses.read().map_err(|_| DenylistError::Poisoned)?;
        Ok(set.len())
    }
}
