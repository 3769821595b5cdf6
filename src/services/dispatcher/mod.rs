//! The submission pipeline and dispatch strategies.
//!
//! A dispatch builds an operation from one or more call descriptors,
//! requests fee sponsorship, submits the operation to the bundler and polls
//! for its receipt within a bounded time budget. Three shapes are layered
//! on that pipeline:
//!
//! - single submission with bounded retries,
//! - sequential-send / parallel-await for two independent operations,
//! - multi-call batching into one atomic operation.
//!
//! Retries are strictly sequential per call with a fixed short delay
//! between attempts; fatal failures short-circuit immediately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::B256;
use log::{debug, warn};

use crate::config::RelayerConfig;
use crate::models::{Call, DispatcherError, UserOperationReceipt, UserOperationRequest};
use crate::services::account::SponsoredAccount;
use crate::services::bundler::BundlerClientTrait;
use crate::services::paymaster::PaymasterClientTrait;

mod client_cache;
pub use client_cache::*;

pub struct RelayDispatcher<B, PM>
where
    B: BundlerClientTrait,
    PM: PaymasterClientTrait,
{
    bundler: Arc<B>,
    paymaster: Arc<PM>,
    account: Arc<SponsoredAccount>,
    polling_interval: Duration,
    receipt_timeout: Duration,
    retry_delay: Duration,
    max_retries: u32,
}

impl<B, PM> RelayDispatcher<B, PM>
where
    B: BundlerClientTrait,
    PM: PaymasterClientTrait,
{
    pub fn new(
        bundler: Arc<B>,
        paymaster: Arc<PM>,
        account: Arc<SponsoredAccount>,
        config: &RelayerConfig,
    ) -> Self {
        Self {
            bundler,
            paymaster,
            account,
            polling_interval: Duration::from_millis(config.receipt_polling_interval_ms),
            receipt_timeout: Duration::from_millis(config.receipt_timeout_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_retries: config.max_retries,
        }
    }

    /// Single-shot submission: sponsor, submit, poll for the receipt.
    pub async fn submit(&self, call: &Call) -> Result<UserOperationReceipt, DispatcherError> {
        self.submit_calls(std::slice::from_ref(call)).await
    }

    /// Single dispatch with the configured retry budget.
    pub async fn dispatch(&self, call: &Call) -> Result<UserOperationReceipt, DispatcherError> {
        self.submit_with_retry(call, self.max_retries).await
    }

    /// Attempts `submit`, retrying transient failures up to `max_retries`
    /// extra times with a fixed delay between attempts. Fatal failures are
    /// re-raised immediately regardless of remaining budget.
    pub async fn submit_with_retry(
        &self,
        call: &Call,
        max_retries: u32,
    ) -> Result<UserOperationReceipt, DispatcherError> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match self.submit_calls(std::slice::from_ref(call)).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Submission attempt {} failed: {}", attempts, e);
                    if attempts > max_retries {
                        return Err(DispatcherError::RetriesExhausted {
                            attempts,
                            last_error: Box::new(e),
                        });
                    }
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// Submits two independent operations sequentially, then awaits both
    /// receipts concurrently.
    ///
    /// Both operations originate from the same sponsored account and the
    /// bundler assigns sequence numbers in submission order, so the sends
    /// must not race each other. The returned pair preserves the (first,
    /// second) pairing regardless of which receipt settles first.
    pub async fn send_parallel(
        &self,
        first: &Call,
        second: &Call,
    ) -> Result<(UserOperationReceipt, UserOperationReceipt), DispatcherError> {
        let started = Instant::now();

        let first_hash = self.send_operation(std::slice::from_ref(first)).await?;
        let second_hash = self.send_operation(std::slice::from_ref(second)).await?;
        debug!(
            "Sequential sends completed in {} ms",
            started.elapsed().as_millis()
        );

        let (first_receipt, second_receipt) = tokio::try_join!(
            self.wait_for_receipt(first_hash),
            self.wait_for_receipt(second_hash)
        )?;

        debug!(
            "Parallel dispatch settled in {} ms",
            started.elapsed().as_millis()
        );
        Ok((first_receipt, second_receipt))
    }

    /// Submits an ordered list of calls as one operation. The chain executes
    /// the batch atomically: one sequence number, one receipt, and no
    /// partial success.
    pub async fn send_batched(
        &self,
        calls: &[Call],
    ) -> Result<UserOperationReceipt, DispatcherError> {
        debug!("Submitting batch of {} calls", calls.len());
        self.submit_calls(calls).await
    }

    async fn submit_calls(&self, calls: &[Call]) -> Result<UserOperationReceipt, DispatcherError> {
        let started = Instant::now();

        let op_hash = self.send_operation(calls).await?;
        let sent_at = started.elapsed();
        debug!("Operation {} sent in {} ms", op_hash, sent_at.as_millis());

        let receipt = self.wait_for_receipt(op_hash).await?;
        debug!(
            "Receipt for {} in {} ms (total {} ms)",
            op_hash,
            (started.elapsed() - sent_at).as_millis(),
            started.elapsed().as_millis()
        );

        Ok(receipt)
    }

    async fn send_operation(&self, calls: &[Call]) -> Result<B256, DispatcherError> {
        let operation = UserOperationRequest::new(self.account.address, calls.to_vec());
        let sponsorship = self.paymaster.sponsor_user_operation(&operation).await?;
        let operation = operation.with_sponsorship(sponsorship);
        Ok(self.bundler.send_user_operation(operation).await?)
    }

    async fn wait_for_receipt(
        &self,
        op_hash: B256,
    ) -> Result<UserOperationReceipt, DispatcherError> {
        let started = Instant::now();

        loop {
            if let Some(receipt) = self.bundler.get_user_operation_receipt(op_hash).await? {
                return Ok(receipt);
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(DispatcherError::SubmissionTimeout {
                    op_hash,
                    timeout_ms: self.receipt_timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(self.polling_interval).await;
        }
    }
}
