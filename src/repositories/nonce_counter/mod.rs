//! Nonce Counter Repository Module
//!
//! Counters track the next sequence number to hand out for each sponsored
//! account, decoupled from the bundler's own internal sequencing.
//!
//! ## Repository Implementations
//!
//! - [`InMemoryNonceCounter`]: DashMap-backed storage for tests and
//!   single-process deployments
//! - [`RedisNonceCounter`]: Redis-backed storage shared by every process
//!   instance that may allocate for the same account
//!
//! Correctness of concurrent allocation rests entirely on the store's
//! `increment` being atomic; a non-atomic read-modify-write is not an
//! acceptable implementation of this trait.

pub mod nonce_counter_in_memory;
pub mod nonce_counter_redis;

use redis::aio::ConnectionManager;
use std::sync::Arc;

pub use nonce_counter_in_memory::InMemoryNonceCounter;
pub use nonce_counter_redis::RedisNonceCounter;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::RepositoryError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NonceCounterTrait {
    /// Atomically increments the counter for `address` and returns the
    /// post-increment value. A counter that does not exist yet is treated
    /// as zero, so the first increment returns 1.
    async fn increment(&self, address: &str) -> Result<u64, RepositoryError>;

    /// Non-mutating read of the counter.
    async fn get(&self, address: &str) -> Result<Option<u64>, RepositoryError>;

    /// Overwrites the counter.
    async fn set(&self, address: &str, value: u64) -> Result<(), RepositoryError>;
}

/// Enum wrapper for different nonce counter repository implementations
#[derive(Debug, Clone)]
pub enum NonceCounterStorage {
    InMemory(InMemoryNonceCounter),
    Redis(RedisNonceCounter),
}

impl NonceCounterStorage {
    pub fn new_in_memory() -> Self {
        Self::InMemory(InMemoryNonceCounter::new())
    }

    pub fn new_redis(
        connection_manager: Arc<ConnectionManager>,
        key_prefix: String,
    ) -> Result<Self, RepositoryError> {
        Ok(Self::Redis(RedisNonceCounter::new(
            connection_manager,
            key_prefix,
        )?))
    }
}

#[async_trait]
impl NonceCounterTrait for NonceCounterStorage {
    async fn increment(&self, address: &str) -> Result<u64, RepositoryError> {
        match self {
            NonceCounterStorage::InMemory(counter) => counter.increment(address).await,
            NonceCounterStorage::Redis(counter) => counter.increment(address).await,
        }
    }

    async fn get(&self, address: &str) -> Result<Option<u64>, RepositoryError> {
        match self {
            NonceCounterStorage::InMemory(counter) => counter.get(address).await,
            NonceCounterStorage::Redis(counter) => counter.get(address).await,
        }
    }

    async fn set(&self, address: &str, value: u64) -> Result<(), RepositoryError> {
        match self {
            NonceCounterStorage::InMemory(counter) => counter.set(address, value).await,
            NonceCounterStorage::Redis(counter) => counter.set(address, value).await,
        }
    }
}
