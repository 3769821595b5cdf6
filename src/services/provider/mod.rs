use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::ProviderError;

pub mod evm;
pub use evm::*;

/// Read-side seam the nonce allocator and sponsored account depend on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryProviderTrait: Send + Sync {
    /// Current pending sequence number for the account.
    async fn pending_nonce(&self, address: Address) -> Result<u64, ProviderError>;

    /// Deployed bytecode at the address, empty if undeployed.
    async fn code_at(&self, address: Address) -> Result<Bytes, ProviderError>;
}
