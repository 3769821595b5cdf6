//! Bundler endpoint adapter.
//!
//! The bundler accepts operations, assigns them its own internal sequence
//! numbers in submission order, and settles them on-chain. Submission
//! returns a pending-operation identifier synchronously; the receipt
//! appears asynchronously and is fetched by polling.
//!
//! This adapter is also where free-form upstream failures become structured
//! [`BundlerError`] kinds.

use std::time::Duration;

use alloy::{
    primitives::{Address, B256},
    providers::{Provider, RootProvider},
    rpc::client::RpcClient,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use url::Url;

#[cfg(test)]
use mockall::automock;

use crate::constants::ENTRY_POINT_ADDRESS;
use crate::models::{BundlerError, ConfigError, UserOperationReceipt, UserOperationRequest};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BundlerClientTrait: Send + Sync {
    /// Submits the operation and returns its pending-operation identifier.
    async fn send_user_operation(
        &self,
        operation: UserOperationRequest,
    ) -> Result<B256, BundlerError>;

    /// Fetches the receipt for a previously submitted operation. Returns
    /// `None` while the operation is still pending.
    async fn get_user_operation_receipt(
        &self,
        op_hash: B256,
    ) -> Result<Option<UserOperationReceipt>, BundlerError>;
}

pub struct HttpBundlerClient {
    provider: RootProvider<Http<Client>>,
    entry_point: Address,
}

impl HttpBundlerClient {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ConfigError> {
        let rpc_url: Url = url.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "BUNDLER_URL".to_string(),
            reason: format!("not a valid URL: {}", url),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ConfigError::InvalidEnv {
                name: "BUNDLER_URL".to_string(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        let transport = Http::with_client(client, rpc_url);
        let rpc_client = RpcClient::new(transport, false);

        Ok(Self {
            provider: RootProvider::new(rpc_client),
            entry_point: ENTRY_POINT_ADDRESS,
        })
    }
}

#[async_trait]
impl BundlerClientTrait for HttpBundlerClient {
    async fn send_user_operation(
        &self,
        operation: UserOperationRequest,
    ) -> Result<B256, BundlerError> {
        self.provider
            .raw_request(
                "eth_sendUserOperation".into(),
                (operation, self.entry_point),
            )
            .await
            .map_err(|e| BundlerError::from_rpc_message(&e.to_string()))
    }

    async fn get_user_operation_receipt(
        &self,
        op_hash: B256,
    ) -> Result<Option<UserOperationReceipt>, BundlerError> {
        self.provider
            .raw_request("eth_getUserOperationReceipt".into(), (op_hash,))
            .await
            .map_err(|e| BundlerError::from_rpc_message(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_valid_url() {
        let client = HttpBundlerClient::new("http://localhost:4337", 3_000);
        assert!(client.is_ok());
    }

    #[test]
    fn test_new_with_invalid_url() {
        let result = HttpBundlerClient::new("::not-a-url::", 3_000);
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
