use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// A chain-agnostic call descriptor: target contract, operation selector and
/// ordered argument list. Constructed fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    pub selector: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl Call {
    pub fn new(
        to: Address,
        selector: impl Into<String>,
        args: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            to,
            selector: selector.into(),
            args,
        }
    }
}
