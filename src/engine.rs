//! Module `engine` is the record-engine collaborator contract (§6):
//! an opaque `recid -> bytes` mapping the tree's `NodeCodec` output can
//! be persisted to. `spec.md` treats this as an external collaborator
//! entirely out of the tree's own scope; SPEC_FULL §3.4 still ships
//! one minimal in-memory implementation so `NodeCodec` round trips are
//! exercisable end to end, grounded in the teacher's own `mem_store.rs`
//! in-memory stand-in store.

use std::sync::RwLock;

use crate::error::{Error, Result};

/// Reserved recid used to store a tree's `RootRef` pointer when the
/// tree is persisted as a catalog (§6).
pub const CATALOG_RECID: u64 = 0;

/// Contract the tree consumes to persist encoded node bytes (§6). Any
/// backend satisfying this is acceptable; the codec application
/// itself happens at the call site rather than inside the trait, so
/// the trait stays object-safe across arbitrary `K, V` domains.
pub trait RecordEngine: Send + Sync {
    fn get(&self, recid: u64) -> Result<Vec<u8>>;
    fn put(&self, value: Vec<u8>) -> Result<u64>;
    fn update(&self, recid: u64, value: Vec<u8>) -> Result<()>;
    fn commit(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
    fn is_read_only(&self) -> bool;
}

/// Thinnest possible conforming backend: a `Vec<Option<Vec<u8>>>`
/// behind a single `RwLock`, enough to exercise `NodeCodec` round
/// trips and stand in for "the record engine" in integration tests.
/// `CATALOG_RECID` (0) is pre-reserved and never handed out by `put`.
pub struct MemEngine {
    records: RwLock<Vec<Option<Vec<u8>>>>,
    read_only: bool,
}

impl Default for MemEngine {
    fn default() -> MemEngine {
        MemEngine::new()
    }
}

impl MemEngine {
    pub fn new() -> MemEngine {
        MemEngine {
            records: RwLock::new(vec![None]), // slot 0 reserved for CATALOG_RECID
            read_only: false,
        }
    }

    pub fn read_only() -> MemEngine {
        let mut engine = MemEngine::new();
        engine.read_only = true;
        engine
    }
}

impl RecordEngine for MemEngine {
    fn get(&self, recid: u64) -> Result<Vec<u8>> {
        let records = self.records.read().expect("engine lock poisoned");
        records
            .get(recid as usize)
            .and_then(|slot| slot.clone())
            .ok_or_else(|| Error::Engine(format!("no such recid: {}", recid)))
    }

    fn put(&self, value: Vec<u8>) -> Result<u64> {
        if self.read_only {
            return Err(Error::Engine("engine is read-only".to_string()));
        }
        let mut records = self.records.write().expect("engine lock poisoned");
        records.push(Some(value));
        Ok((records.len() - 1) as u64)
    }

    fn update(&self, recid: u64, value: Vec<u8>) -> Result<()> {
        if self.read_only {
            return Err(Error::Engine("engine is read-only".to_string()));
        }
        let mut records = self.records.write().expect("engine lock poisoned");
        match records.get_mut(recid as usize) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(Error::Engine(format!("no such recid: {}", recid))),
        }
    }

    fn commit(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod engine_test;
