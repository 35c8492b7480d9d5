//! Transfer validation, submission, and confirmation tracking.
//!
//! # Responsibilities
//! - Validate recipient and amount before touching the provider
//! - Convert display amounts to the chain's smallest unit exactly
//! - Drive one submission through its status sequence:
//!   `Idle → Submitting → Submitted(hash) → Confirmed(block) | Failed(reason)`
//! - Record confirmed transfers and trigger a balance refresh
//!
//! The status machine is per-call and linear; the single console loop
//! guarantees at most one submission in flight.

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::schema::NetworkDescriptor;
use crate::error::{WalletError, WalletResult};
use crate::history::{TransactionLog, TransferRecord};
use crate::provider::WalletProvider;
use crate::session::WalletSession;

/// Lifecycle of one transfer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    /// The signer has been asked to submit.
    Submitting,
    /// The provider returned a hash; confirmation is outstanding. Observers
    /// may link to the transaction already.
    Submitted { hash: TxHash },
    /// The network confirmed inclusion.
    Confirmed { hash: TxHash, block_number: u64 },
    /// The signer rejected or the provider errored.
    Failed { reason: String },
}

impl std::fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitStatus::Idle => write!(f, "idle"),
            SubmitStatus::Submitting => write!(f, "submitting"),
            SubmitStatus::Submitted { hash } => write!(f, "submitted ({hash})"),
            SubmitStatus::Confirmed { block_number, .. } => {
                write!(f, "confirmed in block {block_number}")
            }
            SubmitStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// A transfer the network has confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedTransfer {
    pub hash: TxHash,
    pub block_number: u64,
}

/// Check that the recipient input is a well-formed account address.
pub fn validate_recipient(input: &str) -> WalletResult<Address> {
    let trimmed = input.trim();
    trimmed
        .parse::<Address>()
        .map_err(|_| WalletError::InvalidRecipient(trimmed.to_string()))
}

/// Parse a strictly positive decimal amount and convert it to the chain's
/// smallest unit, exactly, using the currency's declared precision.
pub fn parse_amount(input: &str, decimals: u8) -> WalletResult<U256> {
    let trimmed = input.trim();
    let numeric: f64 = trimmed
        .parse()
        .map_err(|_| WalletError::InvalidAmount(trimmed.to_string()))?;
    if !numeric.is_finite() || numeric <= 0.0 {
        return Err(WalletError::InvalidAmount(trimmed.to_string()));
    }

    // The f64 check above only gates sign and shape; the exact conversion
    // happens on the decimal text.
    let parsed =
        parse_units(trimmed, decimals).map_err(|e| WalletError::AmountConversion(e.to_string()))?;
    Ok(parsed.get_absolute())
}

/// Drives native-currency transfers through submission and confirmation.
pub struct TransferSubmitter {
    provider: Arc<dyn WalletProvider>,
    network: NetworkDescriptor,
    status: watch::Sender<SubmitStatus>,
}

impl TransferSubmitter {
    pub fn new(session: &WalletSession) -> Self {
        let (status, _) = watch::channel(SubmitStatus::Idle);
        Self {
            provider: session.provider(),
            network: session.network().clone(),
            status,
        }
    }

    /// Observe status transitions of the submission in flight.
    pub fn status(&self) -> watch::Receiver<SubmitStatus> {
        self.status.subscribe()
    }

    /// Validate, submit, and confirm one transfer.
    ///
    /// Validation failures return before any provider call and leave the
    /// status untouched. The hash becomes observable on the status channel
    /// before the confirmation wait starts; that wait has no timeout, so
    /// the caller may abandon this future while the submission stays valid
    /// on-chain. On confirmation the transfer is appended to `log` and the
    /// session balance is refreshed.
    pub async fn submit(
        &self,
        session: &mut WalletSession,
        log: &mut TransactionLog,
        recipient: &str,
        amount_text: &str,
    ) -> WalletResult<ConfirmedTransfer> {
        if !session.is_connected() {
            return Err(WalletError::NoActiveAddress);
        }
        let to = validate_recipient(recipient)?;
        let value = parse_amount(amount_text, self.network.native_currency.decimals)?;

        self.status.send_replace(SubmitStatus::Submitting);

        let hash = match self.provider.send_transfer(to, value).await {
            Ok(hash) => hash,
            Err(err) => return Err(self.fail(err.to_string())),
        };
        self.status.send_replace(SubmitStatus::Submitted { hash });
        tracing::info!(tx = %hash, to = %to, amount = amount_text.trim(), "transfer submitted");

        let block_number = match self.provider.wait_for_confirmation(hash).await {
            Ok(block_number) => block_number,
            Err(err) => return Err(self.fail(err.to_string())),
        };
        self.status
            .send_replace(SubmitStatus::Confirmed { hash, block_number });
        tracing::info!(tx = %hash, block_number, "transfer confirmed");

        if let Err(err) = log.append(TransferRecord::new(hash, to, amount_text.trim())) {
            tracing::warn!(error = %err, "failed to persist transfer record");
        }
        if let Err(err) = session.refresh_balance().await {
            tracing::warn!(error = %err, "balance refresh after confirmation failed");
        }

        Ok(ConfirmedTransfer { hash, block_number })
    }

    fn fail(&self, reason: String) -> WalletError {
        self.status.send_replace(SubmitStatus::Failed {
            reason: reason.clone(),
        });
        WalletError::Submission(reason)
    }
}
