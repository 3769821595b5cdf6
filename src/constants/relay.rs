use alloy::primitives::{address, b256, Address, B256};

/// Key prefix for per-account nonce counters in the shared counter store.
pub const NONCE_KEY_PREFIX: &str = "relayer_nonce";

/// Namespace prepended to every key this crate writes to Redis.
pub const REDIS_KEY_PREFIX: &str = "relay_dispatcher";

/// Interval between receipt polls, in milliseconds.
pub const DEFAULT_RECEIPT_POLLING_INTERVAL_MS: u64 = 25;

/// Total budget for a receipt to appear before the submission times out.
pub const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 3_000;

pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 3_000;

pub const DEFAULT_PAYMASTER_TIMEOUT_MS: u64 = 2_000;

/// Fixed delay between retry attempts. Retries do not back off.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Extra attempts after the first failed submission (2 attempts total).
pub const DEFAULT_MAX_RETRIES: u32 = 1;

pub const DEFAULT_ACCOUNT_VERSION: &str = "1.1";

/// EntryPoint v0.7 singleton.
pub const ENTRY_POINT_ADDRESS: Address = address!("0000000071727de22e5e9d8baf0edac6f37da032");

/// Factory the sponsored account is counterfactually deployed through.
pub const ACCOUNT_FACTORY_ADDRESS: Address = address!("0ba5ed0c6aa8c49038f819e587e2633c4a9f428a");

/// Hash of the account proxy init code, fixed per account version family.
pub const ACCOUNT_INIT_CODE_HASH: B256 =
    b256!("3cb4851c6c5469b9d1925b1aae22c3f6a40fde9d93f04f9b86b2a0dcd3596cb2");
