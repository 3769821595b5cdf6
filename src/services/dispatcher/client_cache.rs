//! Process-wide client cache.
//!
//! Owns the lazily constructed handles every dispatch resolves: the chain
//! query client, the paymaster client, the bundler client and the sponsored
//! account. Each handle is built on first access behind a `OnceCell`, so
//! racing first accesses collapse into a single construction, and lives for
//! the process lifetime. There is no invalidation path; a restart rebuilds
//! everything.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use tokio::sync::OnceCell;

use crate::config::RelayerConfig;
use crate::models::DispatcherError;
use crate::services::account::SponsoredAccount;
use crate::services::bundler::HttpBundlerClient;
use crate::services::dispatcher::RelayDispatcher;
use crate::services::paymaster::HttpPaymasterClient;
use crate::services::provider::EvmProvider;

pub struct ClientCache {
    config: RelayerConfig,
    query: OnceCell<Arc<EvmProvider>>,
    paymaster: OnceCell<Arc<HttpPaymasterClient>>,
    bundler: OnceCell<Arc<HttpBundlerClient>>,
    account: OnceCell<Arc<SponsoredAccount>>,
}

impl ClientCache {
    pub fn new(config: RelayerConfig) -> Self {
        Self {
            config,
            query: OnceCell::new(),
            paymaster: OnceCell::new(),
            bundler: OnceCell::new(),
            account: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    pub async fn query_client(&self) -> Result<Arc<EvmProvider>, DispatcherError> {
        self.query
            .get_or_try_init(|| async {
                debug!("Constructing chain query client");
                Ok(Arc::new(EvmProvider::new(
                    &self.config.rpc_url,
                    self.config.rpc_timeout_ms,
                )?))
            })
            .await
            .cloned()
    }

    pub async fn paymaster_client(&self) -> Result<Arc<HttpPaymasterClient>, DispatcherError> {
        self.paymaster
            .get_or_try_init(|| async {
                debug!("Constructing paymaster client");
                Ok(Arc::new(HttpPaymasterClient::new(
                    &self.config.paymaster_url,
                    self.config.paymaster_timeout_ms,
                )?))
            })
            .await
            .cloned()
    }

    pub async fn bundler_client(&self) -> Result<Arc<HttpBundlerClient>, DispatcherError> {
        self.bundler
            .get_or_try_init(|| async {
                debug!("Constructing bundler client");
                Ok(Arc::new(HttpBundlerClient::new(
                    &self.config.bundler_url,
                    self.config.rpc_timeout_ms,
                )?))
            })
            .await
            .cloned()
    }

    pub async fn sponsored_account(&self) -> Result<Arc<SponsoredAccount>, DispatcherError> {
        self.account
            .get_or_try_init(|| async {
                let provider = self.query_client().await?;
                let account = SponsoredAccount::connect(provider.as_ref(), &self.config).await?;
                info!("Sponsored account ready: {}", account.address);
                Ok(Arc::new(account))
            })
            .await
            .cloned()
    }

    /// Eagerly materializes every cached handle, fanning out all four
    /// constructors and joining on completion. The first failure
    /// propagates. Skipping warmup only costs first-request latency.
    pub async fn warmup(&self) -> Result<(), DispatcherError> {
        let started = Instant::now();

        tokio::try_join!(
            self.query_client(),
            self.paymaster_client(),
            self.bundler_client(),
            self.sponsored_account(),
        )?;

        info!("Warmup complete in {} ms", started.elapsed().as_millis());
        Ok(())
    }

    /// Builds a dispatcher over the cached handles.
    pub async fn dispatcher(
        &self,
    ) -> Result<RelayDispatcher<HttpBundlerClient, HttpPaymasterClient>, DispatcherError> {
        Ok(RelayDispatcher::new(
            self.bundler_client().await?,
            self.paymaster_client().await?,
            self.sponsored_account().await?,
            &self.config,
        ))
    }
}
