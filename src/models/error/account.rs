use thiserror::Error;

use crate::models::{ConfigError, ProviderError};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid owner key: {0}")]
    InvalidOwnerKey(String),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
