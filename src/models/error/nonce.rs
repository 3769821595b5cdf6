use thiserror::Error;

use crate::models::{ProviderError, RepositoryError};

#[derive(Debug, Error)]
pub enum NonceAllocatorError {
    /// The shared counter store cannot be reached. Fatal for the call; the
    /// allocator never retries internally.
    #[error("Nonce store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Invalid counter state: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for NonceAllocatorError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::InvalidData(msg) => NonceAllocatorError::InvalidData(msg),
            other => NonceAllocatorError::StoreUnavailable(other.to_string()),
        }
    }
}
