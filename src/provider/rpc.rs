//! Alloy-backed wallet provider.
//!
//! # Responsibilities
//! - Stand in for an injected browser wallet: local key, JSON-RPC transport
//! - Query chain state (chain id, balances, receipts) with timeouts
//! - Broadcast signed native-currency transfers
//! - Poll for confirmation without imposing a deadline
//!
//! # Security
//! - The signing key is loaded ONLY from an environment variable
//! - Keys are never logged or serialized

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, timeout};

use crate::config::schema::NetworkDescriptor;
use crate::provider::{ProviderError, ProviderEvent, ProviderResult, WalletProvider};

/// Environment variable name for the signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "WALLET_PRIVATE_KEY";

const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// One RPC endpoint bound to the chain it was built for.
struct Endpoint {
    provider: Arc<dyn Provider + Send + Sync>,
    chain_id: u64,
}

/// Wallet provider backed by an alloy HTTP provider and a local signer.
///
/// `add_chain` swaps the active endpoint for one built from the new
/// descriptor; readers pick up the swap on their next call.
pub struct RpcWalletProvider {
    endpoint: ArcSwap<Endpoint>,
    signer: Option<PrivateKeySigner>,
    events: broadcast::Sender<ProviderEvent>,
    timeout_duration: Duration,
}

impl RpcWalletProvider {
    /// Build a provider for the configured network.
    ///
    /// The signing key is read from `WALLET_PRIVATE_KEY` if set; without it
    /// the provider exists but reports `Unavailable` on account access, the
    /// same way a missing wallet extension would.
    pub fn connect(descriptor: &NetworkDescriptor, rpc_timeout_secs: u64) -> ProviderResult<Self> {
        let signer = signer_from_env()?;
        match &signer {
            Some(signer) => tracing::info!(address = %signer.address(), "signing key loaded"),
            None => tracing::warn!(
                env_var = PRIVATE_KEY_ENV_VAR,
                "no signing key in environment, connect will fail"
            ),
        }

        let endpoint = build_endpoint(descriptor, signer.as_ref())?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            endpoint: ArcSwap::from_pointee(endpoint),
            signer,
            events,
            timeout_duration: Duration::from_secs(rpc_timeout_secs),
        })
    }
}

/// Read and parse the signing key from the environment.
fn signer_from_env() -> ProviderResult<Option<PrivateKeySigner>> {
    let Ok(raw) = std::env::var(PRIVATE_KEY_ENV_VAR) else {
        return Ok(None);
    };
    let key_hex = raw.strip_prefix("0x").unwrap_or(&raw);
    let signer = key_hex
        .parse::<PrivateKeySigner>()
        .map_err(|e| ProviderError::Wallet(format!("invalid private key format: {}", e)))?;
    Ok(Some(signer))
}

/// Build an endpoint from the descriptor's preferred RPC URL.
fn build_endpoint(
    descriptor: &NetworkDescriptor,
    signer: Option<&PrivateKeySigner>,
) -> ProviderResult<Endpoint> {
    let url_str = descriptor
        .rpc_urls
        .first()
        .ok_or_else(|| ProviderError::Rpc("network descriptor has no RPC URL".to_string()))?;
    let url: url::Url = url_str
        .parse()
        .map_err(|e| ProviderError::Rpc(format!("invalid RPC URL '{}': {}", url_str, e)))?;

    let provider: Arc<dyn Provider + Send + Sync> = match signer {
        Some(signer) => {
            let wallet = EthereumWallet::from(signer.clone());
            Arc::new(ProviderBuilder::new().wallet(wallet).connect_http(url))
        }
        None => Arc::new(ProviderBuilder::new().connect_http(url)),
    };

    Ok(Endpoint {
        provider,
        chain_id: descriptor.chain_id,
    })
}

#[async_trait::async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        match &self.signer {
            Some(signer) => Ok(vec![signer.address()]),
            None => Err(ProviderError::Unavailable),
        }
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        let endpoint = self.endpoint.load_full();
        match timeout(self.timeout_duration, endpoint.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(ProviderError::Rpc(e.to_string())),
            Err(_) => Err(ProviderError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()> {
        let endpoint = self.endpoint.load_full();
        if endpoint.chain_id == chain_id {
            return Ok(());
        }
        // A fixed RPC endpoint cannot move to another chain. Report the
        // chain as unknown so the caller falls back to add_chain.
        Err(ProviderError::UnknownChain(chain_id))
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> ProviderResult<()> {
        let endpoint = build_endpoint(descriptor, self.signer.as_ref())?;

        // The new endpoint must actually serve the chain the descriptor
        // declares before we accept it.
        let reported = match timeout(self.timeout_duration, endpoint.provider.get_chain_id()).await
        {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => return Err(ProviderError::Rpc(e.to_string())),
            Err(_) => return Err(ProviderError::Timeout(self.timeout_duration.as_secs())),
        };
        if reported != descriptor.chain_id {
            return Err(ProviderError::Rpc(format!(
                "endpoint serves chain {}, descriptor declares {}",
                reported, descriptor.chain_id
            )));
        }

        self.endpoint.store(Arc::new(endpoint));
        tracing::info!(chain_id = descriptor.chain_id, "switched to added chain");
        let _ = self
            .events
            .send(ProviderEvent::ChainChanged(descriptor.chain_id));
        Ok(())
    }

    async fn get_balance(&self, address: Address) -> ProviderResult<U256> {
        let endpoint = self.endpoint.load_full();
        match timeout(self.timeout_duration, endpoint.provider.get_balance(address)).await {
            Ok(Ok(balance)) => Ok(balance),
            Ok(Err(e)) => Err(ProviderError::Rpc(e.to_string())),
            Err(_) => Err(ProviderError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    async fn send_transfer(&self, to: Address, value: U256) -> ProviderResult<TxHash> {
        if self.signer.is_none() {
            return Err(ProviderError::Unavailable);
        }
        let endpoint = self.endpoint.load_full();
        let tx = TransactionRequest::default().with_to(to).with_value(value);

        let pending = endpoint
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> ProviderResult<u64> {
        let endpoint = self.endpoint.load_full();
        let mut ticker = interval(CONFIRMATION_POLL_INTERVAL);

        loop {
            ticker.tick().await;

            let receipt = match endpoint.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => receipt,
                Ok(None) => {
                    tracing::debug!(tx = %hash, "transaction pending");
                    continue;
                }
                Err(e) => return Err(ProviderError::Rpc(e.to_string())),
            };

            if !receipt.status() {
                return Err(ProviderError::Rpc("transaction reverted".to_string()));
            }
            return Ok(receipt.block_number.unwrap_or_default());
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for RpcWalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWalletProvider")
            .field("chain_id", &self.endpoint.load().chain_id)
            .field("has_signer", &self.signer.is_some())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_build_endpoint_requires_rpc_url() {
        let mut descriptor = NetworkDescriptor::default();
        descriptor.rpc_urls.clear();
        let result = build_endpoint(&descriptor, None);
        assert!(matches!(result, Err(ProviderError::Rpc(_))));
    }

    #[test]
    fn test_build_endpoint_rejects_bad_url() {
        let mut descriptor = NetworkDescriptor::default();
        descriptor.rpc_urls = vec!["not a url".to_string()];
        let result = build_endpoint(&descriptor, None);
        assert!(matches!(result, Err(ProviderError::Rpc(_))));
    }

    #[test]
    fn test_signer_parse_with_and_without_prefix() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );

        let prefixed = format!("0x{TEST_PRIVATE_KEY}");
        let stripped = prefixed.strip_prefix("0x").unwrap_or(&prefixed);
        let same: PrivateKeySigner = stripped.parse().unwrap();
        assert_eq!(same.address(), signer.address());
    }

    #[tokio::test]
    async fn test_request_accounts_without_signer_is_unavailable() {
        let descriptor = NetworkDescriptor::default();
        let endpoint = build_endpoint(&descriptor, None).unwrap();
        let (events, _) = broadcast::channel(4);
        let provider = RpcWalletProvider {
            endpoint: ArcSwap::from_pointee(endpoint),
            signer: None,
            events,
            timeout_duration: Duration::from_secs(1),
        };
        assert!(matches!(
            provider.request_accounts().await,
            Err(ProviderError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_switch_chain_to_configured_chain_is_noop() {
        let descriptor = NetworkDescriptor::default();
        let endpoint = build_endpoint(&descriptor, None).unwrap();
        let (events, _) = broadcast::channel(4);
        let provider = RpcWalletProvider {
            endpoint: ArcSwap::from_pointee(endpoint),
            signer: None,
            events,
            timeout_duration: Duration::from_secs(1),
        };
        assert!(provider.switch_chain(descriptor.chain_id).await.is_ok());
        assert!(matches!(
            provider.switch_chain(1).await,
            Err(ProviderError::UnknownChain(1))
        ));
    }
}
