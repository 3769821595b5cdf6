//! Structured failure kinds for the bundler and paymaster boundary.
//!
//! The upstream services report failures as free-form RPC error messages.
//! Classification into kinds happens once, at the point of translation, so
//! the retry loop can match on variants instead of message substrings.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
pub enum BundlerError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Execution reverted: {0}")]
    ExecutionReverted(String),
    #[error("Paymaster rejected operation: {0}")]
    PaymasterRejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid bundler response: {0}")]
    InvalidResponse(String),
}

impl BundlerError {
    /// Kinds that cannot succeed on a resubmission of the same operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BundlerError::InsufficientFunds(_)
                | BundlerError::ExecutionReverted(_)
                | BundlerError::PaymasterRejected(_)
        )
    }

    /// Maps a raw RPC error message to a failure kind.
    ///
    /// Anything outside the known fatal patterns is treated as a transport
    /// failure and left to the retry policy.
    pub fn from_rpc_message(message: &str) -> Self {
        let normalized = message.to_lowercase();
        if normalized.contains("insufficient funds") {
            BundlerError::InsufficientFunds(message.to_string())
        } else if normalized.contains("execution reverted") {
            BundlerError::ExecutionReverted(message.to_string())
        } else if normalized.contains("paymaster") {
            BundlerError::PaymasterRejected(message.to_string())
        } else {
            BundlerError::Transport(message.to_string())
        }
    }
}
