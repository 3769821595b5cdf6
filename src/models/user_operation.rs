use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::models::Call;

/// Wire form of an operation submitted to the bundler. One operation may
/// carry several calls; the chain executes them atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationRequest {
    pub sender: Address,
    pub calls: Vec<Call>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsorship: Option<SponsorshipData>,
}

impl UserOperationRequest {
    pub fn new(sender: Address, calls: Vec<Call>) -> Self {
        Self {
            sender,
            calls,
            sponsorship: None,
        }
    }

    pub fn with_sponsorship(mut self, sponsorship: SponsorshipData) -> Self {
        self.sponsorship = Some(sponsorship);
        self
    }
}

/// Fee sponsorship authorization returned by the paymaster, attached to the
/// operation before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
    pub paymaster: Address,
    pub paymaster_data: Bytes,
}

/// Result of a settled operation: the underlying settlement identifier plus
/// a status. Not retained by the dispatcher after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: B256,
    pub transaction_hash: B256,
    pub block_number: u64,
    pub success: bool,
}
