//! Wallet session lifecycle.
//!
//! # Responsibilities
//! - Connect to the wallet provider and take the first account
//! - Ensure the provider operates on the configured chain (switch, then
//!   add-if-unknown; any other switch failure is fatal to connect)
//! - Track the active address and its display balance
//! - React to passive provider events (account change, chain change)

use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::schema::NetworkDescriptor;
use crate::error::{WalletError, WalletResult};
use crate::provider::{ProviderError, ProviderEvent, WalletProvider};

/// Fixed number of fraction digits in the displayed balance.
const BALANCE_DISPLAY_DECIMALS: usize = 4;

/// Outcome of handling a passive provider event, telling the caller what
/// follow-up the session needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// The active account moved; the caller should refresh the balance.
    AccountSwitched(Address),
    /// The provider reported zero accounts; the session was torn down.
    Disconnected,
    /// The active chain moved mid-session; the session was torn down and
    /// should be re-established against the configured network.
    NetworkChanged(u64),
}

/// Connection state against one wallet provider and one configured network.
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    network: NetworkDescriptor,
    address: Option<Address>,
    balance: Option<String>,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>, network: NetworkDescriptor) -> Self {
        Self {
            provider,
            network,
            address: None,
            balance: None,
        }
    }

    /// Request account access and bind the session to the first account.
    ///
    /// Corrective chain handling: on a chain mismatch one switch is
    /// attempted; if the provider does not know the chain, one add follows.
    /// Any other failure aborts the connect. The initial balance fetch is
    /// not part of the contract; if it fails the session stays connected
    /// with no display balance until the next refresh.
    pub async fn connect(&mut self) -> WalletResult<Address> {
        let accounts = self.provider.request_accounts().await?;
        let address = *accounts.first().ok_or(WalletError::UserRejected)?;

        self.ensure_network().await?;

        self.address = Some(address);
        tracing::info!(address = %address, chain = %self.network.chain_name, "wallet connected");

        if let Err(err) = self.refresh_balance().await {
            tracing::warn!(error = %err, "initial balance fetch failed");
        }
        Ok(address)
    }

    async fn ensure_network(&self) -> WalletResult<()> {
        let active = self.provider.chain_id().await?;
        if active == self.network.chain_id {
            return Ok(());
        }

        tracing::info!(
            active,
            wanted = self.network.chain_id,
            "active chain mismatch, requesting switch"
        );
        match self.provider.switch_chain(self.network.chain_id).await {
            Ok(()) => Ok(()),
            Err(ProviderError::UnknownChain(_)) => {
                tracing::info!(chain_id = self.network.chain_id, "chain unknown, requesting add");
                self.provider
                    .add_chain(&self.network)
                    .await
                    .map_err(Into::into)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Clear session state. Idempotent.
    pub fn disconnect(&mut self) {
        if self.address.take().is_some() {
            tracing::info!("wallet disconnected");
        }
        self.balance = None;
    }

    /// Re-query the active account's balance and refresh the display value.
    /// No-op when no address is set.
    pub async fn refresh_balance(&mut self) -> WalletResult<()> {
        let Some(address) = self.address else {
            return Ok(());
        };
        let raw = self.provider.get_balance(address).await?;
        self.balance = Some(format_balance(raw, self.network.native_currency.decimals));
        Ok(())
    }

    /// Apply a passive provider event to the session state.
    pub fn handle_event(&mut self, event: ProviderEvent) -> SessionChange {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    self.disconnect();
                    SessionChange::Disconnected
                }
                Some(address) => {
                    self.address = Some(*address);
                    self.balance = None;
                    SessionChange::AccountSwitched(*address)
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                // The session was established against one chain; a move
                // invalidates it. The caller re-establishes it against the
                // configured network.
                self.disconnect();
                SessionChange::NetworkChanged(chain_id)
            }
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn balance(&self) -> Option<&str> {
        self.balance.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    pub fn provider(&self) -> Arc<dyn WalletProvider> {
        Arc::clone(&self.provider)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.provider.subscribe()
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .field("chain_id", &self.network.chain_id)
            .finish()
    }
}

/// Format a smallest-unit amount as a display value with a fixed number of
/// fraction digits.
pub fn format_balance(raw: U256, decimals: u8) -> String {
    let text = format_units(raw, decimals).unwrap_or_else(|_| "0".to_string());
    match text.split_once('.') {
        Some((whole, frac)) => {
            let frac = &frac[..frac.len().min(BALANCE_DISPLAY_DECIMALS)];
            format!("{whole}.{frac:0<width$}", width = BALANCE_DISPLAY_DECIMALS)
        }
        None => format!("{text}.{:0<width$}", "", width = BALANCE_DISPLAY_DECIMALS),
    }
}
