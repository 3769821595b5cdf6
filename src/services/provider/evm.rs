use std::time::Duration;

use alloy::{
    primitives::{Address, Bytes},
    providers::{Provider, RootProvider},
    rpc::client::RpcClient,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use url::Url;

use super::QueryProviderTrait;
use crate::models::ProviderError;

/// Query client for the target chain.
///
/// Wraps a single HTTP endpoint with its own request timeout and a reused
/// keepalive connection pool. Rebuilt only by process restart.
pub struct EvmProvider {
    provider: RootProvider<Http<Client>>,
}

impl EvmProvider {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ProviderError> {
        let rpc_url: Url = url
            .parse()
            .map_err(|_| ProviderError::InvalidEndpoint(url.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::RpcError(format!("Failed to build HTTP client: {}", e)))?;

        let transport = Http::with_client(client, rpc_url);
        let rpc_client = RpcClient::new(transport, false);

        Ok(Self {
            provider: RootProvider::new(rpc_client),
        })
    }

    pub async fn get_transaction_count_pending(
        &self,
        address: Address,
    ) -> Result<u64, ProviderError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| ProviderError::RpcError(format!("Failed to get transaction count: {}", e)))
    }

    pub async fn get_chain_id(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::RpcError(format!("Failed to get chain id: {}", e)))
    }

    pub async fn get_code(&self, address: Address) -> Result<Bytes, ProviderError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| ProviderError::RpcError(format!("Failed to get code: {}", e)))
    }

    pub async fn health_check(&self) -> Result<bool, ProviderError> {
        self.get_chain_id().await.map(|_| true)
    }
}

#[async_trait]
impl QueryProviderTrait for EvmProvider {
    async fn pending_nonce(&self, address: Address) -> Result<u64, ProviderError> {
        self.get_transaction_count_pending(address).await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ProviderError> {
        self.get_code(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_valid_url() {
        let provider = EvmProvider::new("http://localhost:8545", 3_000);
        assert!(provider.is_ok());
    }

    #[test]
    fn test_new_with_invalid_url() {
        let result = EvmProvider::new("not a url", 3_000);
        assert!(matches!(result, Err(ProviderError::InvalidEndpoint(_))));
    }
}
