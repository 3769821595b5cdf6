use alloy::primitives::B256;
use thiserror::Error;

use crate::models::{AccountError, BundlerError, ConfigError, ProviderError};

#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Submission failed in a way a resubmission cannot fix. Surfaced on
    /// first occurrence, never retried.
    #[error("Fatal execution error: {0}")]
    Fatal(BundlerError),

    /// Network or transport failure; eligible for retry.
    #[error("Transient submission error: {0}")]
    Transient(BundlerError),

    /// No receipt was observed within the polling window. The retry wrapper
    /// treats this as transient.
    #[error("No receipt for operation {op_hash} within {timeout_ms} ms")]
    SubmissionTimeout { op_hash: B256, timeout_ms: u64 },

    #[error("Operation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: Box<DispatcherError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl DispatcherError {
    /// Whether the retry wrapper must re-raise immediately instead of
    /// consuming retry budget.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DispatcherError::Fatal(_)
                | DispatcherError::Config(_)
                | DispatcherError::Account(_)
                | DispatcherError::RetriesExhausted { .. }
        )
    }
}

impl From<BundlerError> for DispatcherError {
    fn from(error: BundlerError) -> Self {
        if error.is_fatal() {
            DispatcherError::Fatal(error)
        } else {
            DispatcherError::Transient(error)
        }
    }
}
