//! Sponsored smart-account descriptor.
//!
//! A smart-contract account controlled by a single owning key, with fees
//! paid by the sponsorship service. Constructed once per process from the
//! configured owner key and the chain query client, immutable afterwards.
//! The descriptor carries no mutable state, so a duplicate constructed
//! under a first-access race refers to the same underlying account and is
//! harmless.

use alloy::primitives::{keccak256, Address};
use alloy::signers::local::PrivateKeySigner;
use log::debug;

use crate::config::RelayerConfig;
use crate::constants::{ACCOUNT_FACTORY_ADDRESS, ACCOUNT_INIT_CODE_HASH};
use crate::models::{AccountError, ConfigError};
use crate::services::QueryProviderTrait;

#[derive(Debug, Clone)]
pub struct SponsoredAccount {
    /// Address of the smart-contract account.
    pub address: Address,
    /// Address derived from the configured owner key.
    pub owner: Address,
    /// Account implementation version, part of the address derivation.
    pub version: String,
    /// Whether account code was present on-chain at construction time.
    pub deployed: bool,
}

impl SponsoredAccount {
    /// Resolves the account descriptor from the configured owner key.
    ///
    /// Performs one chain round-trip to record deployment status. Fails
    /// with a configuration error when the owner key is absent.
    pub async fn connect<P: QueryProviderTrait>(
        provider: &P,
        config: &RelayerConfig,
    ) -> Result<Self, AccountError> {
        let key = config
            .relayer_private_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnv("RELAYER_PRIVATE_KEY".to_string()))?;

        let signer = key
            .as_str(|s| s.trim().parse::<PrivateKeySigner>())
            .map_err(|e| AccountError::InvalidOwnerKey(e.to_string()))?;
        let owner = signer.address();

        let address = Self::counterfactual_address(owner, &config.account_version);
        let code = provider.code_at(address).await?;
        let deployed = !code.is_empty();

        debug!(
            "Resolved sponsored account {} (owner {}, deployed: {})",
            address, owner, deployed
        );

        Ok(Self {
            address,
            owner,
            version: config.account_version.clone(),
            deployed,
        })
    }

    /// CREATE2-style derivation of the account address from the owner and
    /// the implementation version.
    fn counterfactual_address(owner: Address, version: &str) -> Address {
        let mut salt_input = Vec::with_capacity(Address::len_bytes() + version.len());
        salt_input.extend_from_slice(owner.as_slice());
        salt_input.extend_from_slice(version.as_bytes());
        let salt = keccak256(&salt_input);

        let mut preimage = Vec::with_capacity(85);
        preimage.push(0xff);
        preimage.extend_from_slice(ACCOUNT_FACTORY_ADDRESS.as_slice());
        preimage.extend_from_slice(salt.as_slice());
        preimage.extend_from_slice(ACCOUNT_INIT_CODE_HASH.as_slice());

        Address::from_slice(&keccak256(&preimage)[12..])
    }
}
