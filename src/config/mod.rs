/// Configuration for the relay dispatcher: endpoints, the owner key and the
/// submission tunables.
use std::env;

use crate::constants::{
    DEFAULT_ACCOUNT_VERSION, DEFAULT_MAX_RETRIES, DEFAULT_PAYMASTER_TIMEOUT_MS,
    DEFAULT_RECEIPT_POLLING_INTERVAL_MS, DEFAULT_RECEIPT_TIMEOUT_MS, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_RPC_TIMEOUT_MS,
};
use crate::models::{ConfigError, SecretString};

#[derive(Debug, Clone)]
pub struct RelayerConfig {
    /// Chain query endpoint URL.
    pub rpc_url: String,
    /// Bundler submission endpoint URL.
    pub bundler_url: String,
    /// Fee-sponsorship endpoint URL.
    pub paymaster_url: String,
    /// The URL for the Redis instance backing the nonce counter, when the
    /// Redis-backed counter is selected.
    pub redis_url: Option<String>,
    /// Owner key of the sponsored account. Absence is not an error at load
    /// time; it surfaces when the sponsored account is constructed.
    pub relayer_private_key: Option<SecretString>,
    /// Version tag of the sponsored account implementation.
    pub account_version: String,
    pub receipt_polling_interval_ms: u64,
    pub receipt_timeout_ms: u64,
    pub rpc_timeout_ms: u64,
    pub paymaster_timeout_ms: u64,
    /// Fixed delay between retry attempts.
    pub retry_delay_ms: u64,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
}

impl RelayerConfig {
    /// Creates a new `RelayerConfig` instance from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnv` if `RPC_URL`, `BUNDLER_URL` or
    /// `PAYMASTER_URL` is not set.
    ///
    /// # Defaults
    ///
    /// - `RECEIPT_POLLING_INTERVAL_MS` defaults to `25`.
    /// - `RECEIPT_TIMEOUT_MS` defaults to `3000`.
    /// - `RPC_TIMEOUT_MS` defaults to `3000`.
    /// - `PAYMASTER_TIMEOUT_MS` defaults to `2000`.
    /// - `RETRY_DELAY_MS` defaults to `100`.
    /// - `MAX_RETRIES` defaults to `1`.
    /// - `ACCOUNT_VERSION` defaults to `"1.1"`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rpc_url: require_var("RPC_URL")?,
            bundler_url: require_var("BUNDLER_URL")?,
            paymaster_url: require_var("PAYMASTER_URL")?,
            redis_url: env::var("REDIS_URL").ok(),
            relayer_private_key: env::var("RELAYER_PRIVATE_KEY")
                .ok()
                .map(|key| SecretString::new(&key)),
            account_version: env::var("ACCOUNT_VERSION")
                .unwrap_or_else(|_| DEFAULT_ACCOUNT_VERSION.to_string()),
            receipt_polling_interval_ms: parse_var(
                "RECEIPT_POLLING_INTERVAL_MS",
                DEFAULT_RECEIPT_POLLING_INTERVAL_MS,
            ),
            receipt_timeout_ms: parse_var("RECEIPT_TIMEOUT_MS", DEFAULT_RECEIPT_TIMEOUT_MS),
            rpc_timeout_ms: parse_var("RPC_TIMEOUT_MS", DEFAULT_RPC_TIMEOUT_MS),
            paymaster_timeout_ms: parse_var("PAYMASTER_TIMEOUT_MS", DEFAULT_PAYMASTER_TIMEOUT_MS),
            retry_delay_ms: parse_var("RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            max_retries: parse_var("MAX_RETRIES", DEFAULT_MAX_RETRIES),
        })
    }
}
