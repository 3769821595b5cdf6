//! End-to-end tests of the dispatch strategies over fake clients.
//!
//! The fakes record every submission so ordering and batching behavior can
//! be asserted through the public API, without a live bundler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde_json::json;

use relay_dispatcher::config::RelayerConfig;
use relay_dispatcher::models::{
    BundlerError, Call, DispatcherError, ProviderError, SponsorshipData, UserOperationReceipt,
    UserOperationRequest,
};
use relay_dispatcher::repositories::{InMemoryNonceCounter, NonceCounterTrait};
use relay_dispatcher::services::{
    BundlerClientTrait, NonceAllocator, NonceAllocatorTrait, PaymasterClientTrait,
    QueryProviderTrait, RelayDispatcher, SponsoredAccount,
};

fn test_config() -> RelayerConfig {
    RelayerConfig {
        rpc_url: "http://localhost:8545".to_string(),
        bundler_url: "http://localhost:4337".to_string(),
        paymaster_url: "http://localhost:4338".to_string(),
        redis_url: None,
        relayer_private_key: None,
        account_version: "1.1".to_string(),
        receipt_polling_interval_ms: 1,
        receipt_timeout_ms: 100,
        rpc_timeout_ms: 3_000,
        paymaster_timeout_ms: 2_000,
        retry_delay_ms: 1,
        max_retries: 1,
    }
}

fn test_account() -> Arc<SponsoredAccount> {
    Arc::new(SponsoredAccount {
        address: Address::repeat_byte(0x42),
        owner: Address::repeat_byte(0x11),
        version: "1.1".to_string(),
        deployed: true,
    })
}

fn call(selector: &str) -> Call {
    Call::new(
        Address::repeat_byte(0x99),
        selector,
        vec![json!("Test Team A"), json!(1)],
    )
}

/// Bundler fake: assigns operation hashes in submission order and releases
/// each receipt after a configurable number of polls.
#[derive(Default)]
struct FakeBundler {
    submissions: Mutex<Vec<UserOperationRequest>>,
    polls_until_ready: Mutex<Vec<u64>>,
    poll_counts: Mutex<Vec<u64>>,
    fail_sends_with: Mutex<Option<BundlerError>>,
}

impl FakeBundler {
    fn submitted(&self) -> Vec<UserOperationRequest> {
        self.submissions.lock().unwrap().clone()
    }

    fn fail_sends_with(&self, error: BundlerError) {
        *self.fail_sends_with.lock().unwrap() = Some(error);
    }

    fn delay_receipt(&self, op_index: usize, polls: u64) {
        let mut delays = self.polls_until_ready.lock().unwrap();
        while delays.len() <= op_index {
            delays.push(0);
        }
        delays[op_index] = polls;
    }

    fn op_hash(index: usize) -> B256 {
        B256::repeat_byte(index as u8 + 1)
    }
}

#[async_trait]
impl BundlerClientTrait for FakeBundler {
    async fn send_user_operation(
        &self,
        operation: UserOperationRequest,
    ) -> Result<B256, BundlerError> {
        if let Some(error) = self.fail_sends_with.lock().unwrap().clone() {
            return Err(error);
        }

        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(operation);
        let index = submissions.len() - 1;

        let mut delays = self.polls_until_ready.lock().unwrap();
        while delays.len() <= index {
            delays.push(0);
        }
        self.poll_counts.lock().unwrap().resize(delays.len(), 0);

        Ok(Self::op_hash(index))
    }

    async fn get_user_operation_receipt(
        &self,
        op_hash: B256,
    ) -> Result<Option<UserOperationReceipt>, BundlerError> {
        let index = (op_hash.as_slice()[0] - 1) as usize;

        let ready = {
            let delays = self.polls_until_ready.lock().unwrap();
            let mut counts = self.poll_counts.lock().unwrap();
            counts[index] += 1;
            counts[index] > delays[index]
        };

        if !ready {
            return Ok(None);
        }

        Ok(Some(UserOperationReceipt {
            user_op_hash: op_hash,
            transaction_hash: B256::repeat_byte(0xbb),
            block_number: 1,
            success: true,
        }))
    }
}

struct FakePaymaster;

#[async_trait]
impl PaymasterClientTrait for FakePaymaster {
    async fn sponsor_user_operation(
        &self,
        _operation: &UserOperationRequest,
    ) -> Result<SponsorshipData, BundlerError> {
        Ok(SponsorshipData {
            paymaster: Address::repeat_byte(0xaa),
            paymaster_data: Bytes::from(vec![0x01]),
        })
    }
}

fn dispatcher(bundler: Arc<FakeBundler>) -> RelayDispatcher<FakeBundler, FakePaymaster> {
    RelayDispatcher::new(bundler, Arc::new(FakePaymaster), test_account(), &test_config())
}

#[tokio::test]
async fn single_dispatch_round_trips_a_receipt() {
    let bundler = Arc::new(FakeBundler::default());
    let dispatcher = dispatcher(bundler.clone());

    let receipt = dispatcher.dispatch(&call("createTeamRelayer")).await.unwrap();

    assert!(receipt.success);
    let submitted = bundler.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].calls.len(), 1);
    assert_eq!(submitted[0].sender, test_account().address);
    assert!(submitted[0].sponsorship.is_some());
}

#[tokio::test]
async fn parallel_dispatch_submits_in_order_and_pairs_receipts() {
    let bundler = Arc::new(FakeBundler::default());
    // First operation's receipt settles well after the second's.
    bundler.delay_receipt(0, 5);
    let dispatcher = dispatcher(bundler.clone());

    let (first, second) = dispatcher
        .send_parallel(&call("commitScoreRelayer"), &call("calculateScoreRelayer"))
        .await
        .unwrap();

    let submitted = bundler.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].calls[0].selector, "commitScoreRelayer");
    assert_eq!(submitted[1].calls[0].selector, "calculateScoreRelayer");

    assert_eq!(first.user_op_hash, FakeBundler::op_hash(0));
    assert_eq!(second.user_op_hash, FakeBundler::op_hash(1));
}

#[tokio::test]
async fn batched_dispatch_consumes_one_operation() {
    let bundler = Arc::new(FakeBundler::default());
    let dispatcher = dispatcher(bundler.clone());

    let calls = vec![
        call("createTeamRelayer"),
        call("joinTeamRelayer"),
        call("recordQuestRelayer"),
    ];
    let receipt = dispatcher.send_batched(&calls).await.unwrap();

    let submitted = bundler.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].calls.len(), 3);
    assert_eq!(receipt.user_op_hash, FakeBundler::op_hash(0));
}

#[tokio::test]
async fn batched_dispatch_failure_yields_no_receipt() {
    let bundler = Arc::new(FakeBundler::default());
    bundler.fail_sends_with(BundlerError::ExecutionReverted(
        "execution reverted".to_string(),
    ));
    let dispatcher = dispatcher(bundler.clone());

    let calls = vec![call("createTeamRelayer"), call("joinTeamRelayer")];
    let result = dispatcher.send_batched(&calls).await;

    assert!(matches!(result, Err(DispatcherError::Fatal(_))));
    assert!(bundler.submitted().is_empty());
}

#[tokio::test]
async fn transient_failures_exhaust_the_retry_budget() {
    let bundler = Arc::new(FakeBundler::default());
    bundler.fail_sends_with(BundlerError::Transport("connection reset".to_string()));
    let dispatcher = dispatcher(bundler.clone());

    let result = dispatcher
        .submit_with_retry(&call("createTeamRelayer"), 2)
        .await;

    match result {
        Err(DispatcherError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("Expected RetriesExhausted, got {:?}", other.map(|_| ())),
    }
}

/// Counter store fake with a single shared atomic, to race the allocator
/// against a store whose increment is genuinely atomic.
#[derive(Default)]
struct AtomicCounterStore {
    value: AtomicU64,
    initialized: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl NonceCounterTrait for AtomicCounterStore {
    async fn increment(
        &self,
        _address: &str,
    ) -> Result<u64, relay_dispatcher::models::RepositoryError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn get(
        &self,
        _address: &str,
    ) -> Result<Option<u64>, relay_dispatcher::models::RepositoryError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(Some(self.value.load(Ordering::SeqCst)))
        } else {
            Ok(None)
        }
    }

    async fn set(
        &self,
        _address: &str,
        value: u64,
    ) -> Result<(), relay_dispatcher::models::RepositoryError> {
        self.initialized.store(true, Ordering::SeqCst);
        self.value.store(value, Ordering::SeqCst);
        Ok(())
    }
}

struct FixedNonceProvider(u64);

#[async_trait]
impl QueryProviderTrait for FixedNonceProvider {
    async fn pending_nonce(&self, _address: Address) -> Result<u64, ProviderError> {
        Ok(self.0)
    }

    async fn code_at(&self, _address: Address) -> Result<Bytes, ProviderError> {
        Ok(Bytes::new())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_allocations_yield_the_exact_range() {
    let allocator = Arc::new(NonceAllocator::new(
        Arc::new(AtomicCounterStore::default()),
        Arc::new(FixedNonceProvider(500)),
    ));
    let address = Address::repeat_byte(0x42);

    // First allocation reconciles with the chain.
    assert_eq!(allocator.allocate_next(address).await.unwrap(), 500);

    let mut handles = Vec::new();
    for _ in 0..64 {
        let allocator = allocator.clone();
        handles.push(tokio::spawn(async move {
            allocator.allocate_next(address).await.unwrap()
        }));
    }

    let mut nonces = Vec::new();
    for handle in handles {
        nonces.push(handle.await.unwrap());
    }
    nonces.sort_unstable();

    let expected: Vec<u64> = (501..=564).collect();
    assert_eq!(nonces, expected);
}

#[tokio::test]
async fn cold_allocation_matches_chain_then_counts_locally() {
    let allocator = NonceAllocator::new(
        Arc::new(InMemoryNonceCounter::new()),
        Arc::new(FixedNonceProvider(12)),
    );
    let address = Address::repeat_byte(0x42);

    assert_eq!(allocator.allocate_next(address).await.unwrap(), 12);
    assert_eq!(allocator.allocate_next(address).await.unwrap(), 13);
    assert_eq!(allocator.allocate_next(address).await.unwrap(), 14);
    assert_eq!(allocator.get_current(address).await.unwrap(), 15);
}
