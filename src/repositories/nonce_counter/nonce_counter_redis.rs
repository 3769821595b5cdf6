//! Redis implementation of the nonce counter.
//!
//! Uses the `INCR` primitive so increments are atomic at the store, across
//! every process instance that may allocate for the same account. The store
//! is the single source of truth; values are never mirrored locally.

use async_trait::async_trait;
use log::debug;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::fmt;
use std::sync::Arc;

use super::NonceCounterTrait;
use crate::constants::NONCE_KEY_PREFIX;
use crate::models::RepositoryError;
use crate::repositories::RedisRepository;

#[derive(Clone)]
pub struct RedisNonceCounter {
    pub client: Arc<ConnectionManager>,
    pub key_prefix: String,
}

impl RedisRepository for RedisNonceCounter {}

impl fmt::Debug for RedisNonceCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisNonceCounter")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl RedisNonceCounter {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        key_prefix: String,
    ) -> Result<Self, RepositoryError> {
        if key_prefix.is_empty() {
            return Err(RepositoryError::InvalidData(
                "Redis key prefix cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client: connection_manager,
            key_prefix,
        })
    }

    /// Generate key for the counter: {prefix}:relayer_nonce:{address}
    fn counter_key(&self, address: &str) -> String {
        format!("{}:{}:{}", self.key_prefix, NONCE_KEY_PREFIX, address)
    }

    fn validate_address(address: &str) -> Result<(), RepositoryError> {
        if address.is_empty() {
            return Err(RepositoryError::InvalidData(
                "Address cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NonceCounterTrait for RedisNonceCounter {
    async fn increment(&self, address: &str) -> Result<u64, RepositoryError> {
        Self::validate_address(address)?;

        let key = self.counter_key(address);
        let mut conn = self.client.as_ref().clone();

        // INCR creates an absent key at 0 before incrementing, so the first
        // call returns 1.
        let value: u64 = conn
            .incr(&key, 1u64)
            .await
            .map_err(|e| self.map_redis_error(e, "increment_counter"))?;

        debug!("Counter for {} incremented to {}", address, value);
        Ok(value)
    }

    async fn get(&self, address: &str) -> Result<Option<u64>, RepositoryError> {
        Self::validate_address(address)?;

        let key = self.counter_key(address);
        let mut conn = self.client.as_ref().clone();

        let value: Option<u64> = conn
            .get(&key)
            .await
            .map_err(|e| self.map_redis_error(e, "get_counter"))?;

        debug!("Retrieved counter value for {}: {:?}", address, value);
        Ok(value)
    }

    async fn set(&self, address: &str, value: u64) -> Result<(), RepositoryError> {
        Self::validate_address(address)?;

        let key = self.counter_key(address);
        let mut conn = self.client.as_ref().clone();

        let _: () = conn
            .set(&key, value)
            .await
            .map_err(|e| self.map_redis_error(e, "set_counter"))?;

        debug!("Counter for {} set to {}", address, value);
        Ok(())
    }
}
