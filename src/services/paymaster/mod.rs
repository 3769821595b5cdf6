//! Fee-sponsorship endpoint adapter.
//!
//! The paymaster authorizes fee sponsorship for an operation before it is
//! handed to the bundler. Rejections are fatal for the operation: retrying
//! an operation the paymaster refused cannot change the outcome.

use std::time::Duration;

use alloy::{
    providers::{Provider, RootProvider},
    rpc::client::RpcClient,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use url::Url;

#[cfg(test)]
use mockall::automock;

use crate::constants::ENTRY_POINT_ADDRESS;
use crate::models::{BundlerError, ConfigError, SponsorshipData, UserOperationRequest};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymasterClientTrait: Send + Sync {
    /// Requests fee sponsorship for the operation.
    async fn sponsor_user_operation(
        &self,
        operation: &UserOperationRequest,
    ) -> Result<SponsorshipData, BundlerError>;
}

pub struct HttpPaymasterClient {
    provider: RootProvider<Http<Client>>,
}

impl HttpPaymasterClient {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ConfigError> {
        let rpc_url: Url = url.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "PAYMASTER_URL".to_string(),
            reason: format!("not a valid URL: {}", url),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ConfigError::InvalidEnv {
                name: "PAYMASTER_URL".to_string(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        let transport = Http::with_client(client, rpc_url);
        let rpc_client = RpcClient::new(transport, false);

        Ok(Self {
            provider: RootProvider::new(rpc_client),
        })
    }
}

#[async_trait]
impl PaymasterClientTrait for HttpPaymasterClient {
    async fn sponsor_user_operation(
        &self,
        operation: &UserOperationRequest,
    ) -> Result<SponsorshipData, BundlerError> {
        self.provider
            .raw_request(
                "pm_sponsorUserOperation".into(),
                (operation.clone(), ENTRY_POINT_ADDRESS),
            )
            .await
            .map_err(|e| BundlerError::from_rpc_message(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_valid_url() {
        let client = HttpPaymasterClient::new("http://localhost:4338", 2_000);
        assert!(client.is_ok());
    }

    #[test]
    fn test_new_with_invalid_url() {
        let result = HttpPaymasterClient::new("::not-a-url::", 2_000);
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
