//! Nonce allocation service.
//!
//! Hands out per-account sequence numbers from the shared counter store,
//! for call sites that need an explicit reservation outside the bundling
//! flow. The store's atomic increment is the only mutual exclusion; the
//! allocator holds no lock and never mirrors the counter locally.
//!
//! The stored counter is kept one ahead of the last value handed out, so a
//! cold counter can be detected from the increment result alone: only the
//! very first increment of an absent key returns 1, and that first
//! allocation reconciles with the chain's reported pending sequence number
//! instead of trusting the fresh counter. Every later allocation is a
//! single store round-trip.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use log::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::config::RelayerConfig;
use crate::constants::REDIS_KEY_PREFIX;
use crate::models::NonceAllocatorError;
use crate::repositories::{NonceCounterStorage, NonceCounterTrait};
use crate::services::provider::EvmProvider;
use crate::services::QueryProviderTrait;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NonceAllocatorTrait: Send + Sync {
    /// Reserves and returns the next sequence number for the account.
    async fn allocate_next(&self, address: Address) -> Result<u64, NonceAllocatorError>;

    /// Non-mutating peek. Falls back to the chain's pending sequence number
    /// when the counter is uninitialized, without writing it.
    async fn get_current(&self, address: Address) -> Result<u64, NonceAllocatorError>;

    /// Forcibly resynchronizes the counter with the chain, for recovery
    /// after an operation was submitted outside this allocator.
    async fn reset(&self, address: Address) -> Result<(), NonceAllocatorError>;
}

#[derive(Clone)]
pub struct NonceAllocator<C, P>
where
    C: NonceCounterTrait + Send + Sync,
    P: QueryProviderTrait,
{
    store: Arc<C>,
    provider: Arc<P>,
}

impl<C, P> NonceAllocator<C, P>
where
    C: NonceCounterTrait + Send + Sync,
    P: QueryProviderTrait,
{
    pub fn new(store: Arc<C>, provider: Arc<P>) -> Self {
        Self { store, provider }
    }
}

impl NonceAllocator<NonceCounterStorage, EvmProvider> {
    /// Builds an allocator from configuration: Redis-backed when a Redis URL
    /// is configured, in-memory otherwise.
    pub async fn from_config(
        config: &RelayerConfig,
        provider: Arc<EvmProvider>,
    ) -> Result<Self, NonceAllocatorError> {
        let store = match &config.redis_url {
            Some(url) => {
                let client = redis::Client::open(url.as_str())
                    .map_err(|e| NonceAllocatorError::StoreUnavailable(e.to_string()))?;
                let manager = redis::aio::ConnectionManager::new(client)
                    .await
                    .map_err(|e| NonceAllocatorError::StoreUnavailable(e.to_string()))?;
                NonceCounterStorage::new_redis(Arc::new(manager), REDIS_KEY_PREFIX.to_string())?
            }
            None => NonceCounterStorage::new_in_memory(),
        };

        Ok(NonceAllocator::new(Arc::new(store), provider))
    }
}

#[async_trait]
impl<C, P> NonceAllocatorTrait for NonceAllocator<C, P>
where
    C: NonceCounterTrait + Send + Sync,
    P: QueryProviderTrait,
{
    async fn allocate_next(&self, address: Address) -> Result<u64, NonceAllocatorError> {
        let key = address.to_string();
        let value = self.store.increment(&key).await?;

        if value == 1 {
            // First allocation for this account: the counter did not exist
            // before the increment. Baseline it from the chain so the first
            // number handed out is never stale.
            let chain_nonce = self.provider.pending_nonce(address).await?;
            self.store.set(&key, chain_nonce + 1).await?;
            info!(
                "Initialized nonce counter for {} at chain value {}",
                address, chain_nonce
            );
            return Ok(chain_nonce);
        }

        let nonce = value - 1;
        debug!("Allocated nonce {} for {}", nonce, address);
        Ok(nonce)
    }

    async fn get_current(&self, address: Address) -> Result<u64, NonceAllocatorError> {
        let key = address.to_string();
        match self.store.get(&key).await? {
            Some(value) => Ok(value),
            None => Ok(self.provider.pending_nonce(address).await?),
        }
    }

    async fn reset(&self, address: Address) -> Result<(), NonceAllocatorError> {
        let key = address.to_string();
        let chain_nonce = self.provider.pending_nonce(address).await?;
        self.store.set(&key, chain_nonce).await?;
        info!("Reset nonce counter for {} to {}", address, chain_nonce);
        Ok(())
    }
}
