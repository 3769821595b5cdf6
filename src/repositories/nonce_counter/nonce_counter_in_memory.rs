//! This module provides an in-memory implementation of the nonce counter.
//!
//! The `InMemoryNonceCounter` struct tracks per-account counters in a
//! `DashMap`. The entry lock makes `increment` atomic per key, which is the
//! property the allocator's concurrency safety rests on.
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::NonceCounterTrait;
use crate::models::RepositoryError;

#[derive(Debug, Default, Clone)]
pub struct InMemoryNonceCounter {
    store: Arc<DashMap<String, u64>>,
}

impl InMemoryNonceCounter {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl NonceCounterTrait for InMemoryNonceCounter {
    async fn increment(&self, address: &str) -> Result<u64, RepositoryError> {
        let mut entry = self.store.entry(address.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn get(&self, address: &str) -> Result<Option<u64>, RepositoryError> {
        Ok(self.store.get(address).map(|n| *n))
    }

    async fn set(&self, address: &str, value: u64) -> Result<(), RepositoryError> {
        self.store.insert(address.to_string(), value);
        Ok(())
    }
}
