//! Wallet provider capability boundary.
//!
//! # Data Flow
//! ```text
//! WalletProvider (trait: accounts, chain management, balance,
//!                 transfer submission, confirmation, change events)
//!     → rpc.rs (alloy JSON-RPC transport + local signing key)
//!     → tests drive the same trait with a mock
//! ```
//!
//! Everything above this boundary (session, submitter, UI) only ever sees
//! the trait, never the transport.

pub mod rpc;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::schema::NetworkDescriptor;

/// Passive notifications pushed by the wallet agent.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// The account list changed; empty means the wallet revoked access.
    AccountsChanged(Vec<Address>),
    /// The active chain changed mid-session.
    ChainChanged(u64),
}

/// Errors reported by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No wallet agent is present at all.
    #[error("no wallet provider is available")]
    Unavailable,

    /// The user declined the request (EIP-1193 code 4001).
    #[error("request rejected by user")]
    Rejected,

    /// The requested chain is not known to the provider (EIP-1193 code 4902).
    #[error("chain {0} is unknown to the provider")]
    UnknownChain(u64),

    /// The request did not complete in time.
    #[error("provider request timed out after {0} seconds")]
    Timeout(u64),

    /// Key material could not be loaded or used.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// RPC transport or execution failure.
    #[error("RPC error: {0}")]
    Rpc(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Capability interface over an external wallet agent.
///
/// Mirrors the injected-wallet API surface: account access, chain
/// management, balance queries, transfer submission, confirmation tracking,
/// and passive change notifications. All async methods are suspension
/// points; none block.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request access to the wallet's accounts.
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// The chain the provider is currently operating on.
    async fn chain_id(&self) -> ProviderResult<u64>;

    /// Ask the provider to switch its active chain.
    async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()>;

    /// Ask the provider to add (and switch to) a chain it does not know.
    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> ProviderResult<()>;

    /// Balance of `address` in the smallest currency unit.
    async fn get_balance(&self, address: Address) -> ProviderResult<U256>;

    /// Sign and broadcast a native-currency transfer. Resolves as soon as
    /// the provider returns a submitted-transaction hash.
    async fn send_transfer(&self, to: Address, value: U256) -> ProviderResult<TxHash>;

    /// Wait until the network confirms `hash`, returning the inclusion
    /// block number. May never resolve; no timeout is imposed here.
    async fn wait_for_confirmation(&self, hash: TxHash) -> ProviderResult<u64>;

    /// Subscribe to passive change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
