use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
pub enum ProviderError {
    #[error("RPC client error: {0}")]
    RpcError(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
