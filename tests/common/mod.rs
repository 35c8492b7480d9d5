//! Shared mock wallet provider for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use tokio::sync::broadcast;

use sepolia_wallet::config::NetworkDescriptor;
use sepolia_wallet::provider::{ProviderError, ProviderEvent, ProviderResult, WalletProvider};

/// Hash every mock submission reports.
pub const MOCK_TX_HASH: B256 = B256::repeat_byte(0xab);

/// Programmable in-memory wallet provider.
///
/// Records every call so tests can assert ordering and absence of provider
/// traffic; failure modes are toggled through atomics.
pub struct MockProvider {
    pub accounts: Mutex<Vec<Address>>,
    pub active_chain: AtomicU64,
    pub known_chains: Mutex<HashSet<u64>>,
    pub balance: Mutex<U256>,
    pub reject_connect: AtomicBool,
    pub fail_switch: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_balance: AtomicBool,
    pub fail_send: AtomicBool,
    pub hold_confirmation: AtomicBool,
    pub confirmation_block: AtomicU64,
    calls: Mutex<Vec<&'static str>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl MockProvider {
    pub fn new(account: Address, chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(vec![account]),
            active_chain: AtomicU64::new(chain_id),
            known_chains: Mutex::new(HashSet::from([chain_id])),
            balance: Mutex::new(U256::from(10u64).pow(U256::from(18))),
            reject_connect: AtomicBool::new(false),
            fail_switch: AtomicBool::new(false),
            fail_add: AtomicBool::new(false),
            fail_balance: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            hold_confirmation: AtomicBool::new(false),
            confirmation_block: AtomicU64::new(42),
            calls: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.record("request_accounts");
        if self.reject_connect.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected);
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        self.record("chain_id");
        Ok(self.active_chain.load(Ordering::SeqCst))
    }

    async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()> {
        self.record("switch_chain");
        if self.fail_switch.load(Ordering::SeqCst) {
            return Err(ProviderError::Rpc("switch refused".to_string()));
        }
        if self.known_chains.lock().unwrap().contains(&chain_id) {
            self.active_chain.store(chain_id, Ordering::SeqCst);
            Ok(())
        } else {
            Err(ProviderError::UnknownChain(chain_id))
        }
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> ProviderResult<()> {
        self.record("add_chain");
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected);
        }
        self.known_chains.lock().unwrap().insert(descriptor.chain_id);
        self.active_chain.store(descriptor.chain_id, Ordering::SeqCst);
        Ok(())
    }

    async fn get_balance(&self, _address: Address) -> ProviderResult<U256> {
        self.record("get_balance");
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout(1));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn send_transfer(&self, _to: Address, value: U256) -> ProviderResult<TxHash> {
        self.record("send_transfer");
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected);
        }
        let mut balance = self.balance.lock().unwrap();
        *balance = balance.saturating_sub(value);
        Ok(MOCK_TX_HASH)
    }

    async fn wait_for_confirmation(&self, _hash: TxHash) -> ProviderResult<u64> {
        self.record("wait_for_confirmation");
        if self.hold_confirmation.load(Ordering::SeqCst) {
            // Confirmation that never arrives.
            std::future::pending::<()>().await;
        }
        Ok(self.confirmation_block.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
